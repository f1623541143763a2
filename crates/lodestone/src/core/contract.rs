use super::id::RegistryId;

/// Identity of the capability a loader searches providers for.
///
/// Immutable for the lifetime of an engine. When the contract was itself
/// declared by a structured registry, that registry's id gates discovery:
/// declarations whose owning registry cannot read it are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contract {
	name: Box<str>,
	defining_registry: Option<RegistryId>,
}

impl Contract {
	/// A contract with no defining registry; every declaration is visible.
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self { name: name.into(), defining_registry: None }
	}

	/// A contract defined by `registry`; declarations are filtered through
	/// [`VisibilityOracle::can_read`](super::VisibilityOracle::can_read).
	pub fn in_registry(name: impl Into<Box<str>>, registry: RegistryId) -> Self {
		Self { name: name.into(), defining_registry: Some(registry) }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn defining_registry(&self) -> Option<RegistryId> {
		self.defining_registry
	}
}
