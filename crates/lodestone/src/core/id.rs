use std::fmt;

/// Arena index of a scope in the host's delegation chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// Arena index of a registry node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryId(u32);

impl ScopeId {
	pub const fn new(raw: u32) -> Self {
		Self(raw)
	}

	pub const fn from_index(index: usize) -> Self {
		Self(index as u32)
	}

	/// Returns the arena slot this id points at.
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

impl RegistryId {
	pub const fn new(raw: u32) -> Self {
		Self(raw)
	}

	pub const fn from_index(index: usize) -> Self {
		Self(index as u32)
	}

	/// Returns the arena slot this id points at.
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Debug for ScopeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ScopeId({})", self.0)
	}
}

impl fmt::Debug for RegistryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RegistryId({})", self.0)
	}
}

impl fmt::Display for ScopeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "scope#{}", self.0)
	}
}

impl fmt::Display for RegistryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "registry#{}", self.0)
	}
}
