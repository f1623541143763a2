use super::id::RegistryId;

/// A raw provider declaration read out of a structured registry, not yet
/// resolved to a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDeclaration {
	/// The registry that owns this declaration.
	pub registry: RegistryId,
	/// The declared provider name.
	pub provider: Box<str>,
}

impl ProviderDeclaration {
	pub fn new(registry: RegistryId, provider: impl Into<Box<str>>) -> Self {
		Self { registry, provider: provider.into() }
	}
}
