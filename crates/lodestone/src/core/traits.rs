//! The narrow collaborator seams the engine calls through.
//!
//! The engine never loads code or touches the filesystem directly; the host
//! supplies these four collaborators plus [`LoadableType`] handles. The
//! in-memory [`World`](crate::host::World) implements all of them.

use std::io;
use std::rc::Rc;

use super::contract::Contract;
use super::decl::ProviderDeclaration;
use super::descriptor::{InstantiationFault, ProviderFactory, ProviderInstance};
use super::id::{RegistryId, ScopeId};

/// A name resolved to a loadable type.
///
/// Stands in for runtime reflection: the host backs each type with an
/// explicit table of constructor/factory closures.
pub trait LoadableType {
	fn name(&self) -> &str;

	fn is_public(&self) -> bool;

	/// Zero-argument static factories matching the
	/// [`FACTORY_METHOD`](super::FACTORY_METHOD) convention, in declaration
	/// order. More than one is an ambiguity error during resolution.
	fn factories(&self) -> Vec<ProviderFactory>;

	fn has_default_constructor(&self) -> bool;

	/// Invokes the public zero-argument constructor.
	fn construct(&self) -> Result<ProviderInstance, InstantiationFault>;
}

/// Resolves provider names to loadable types.
pub trait TypeResolver {
	/// `scope` is the traversal position the name was discovered at; `None`
	/// for registry-only traversals, where the host resolves globally.
	fn resolve_type(&self, name: &str, scope: Option<ScopeId>) -> Option<Rc<dyn LoadableType>>;
}

/// Answers visibility and assignability questions the engine must not decide
/// itself.
pub trait VisibilityOracle {
	/// Whether registry `from` can see registry `to`. Gates declarations
	/// against the contract's defining registry.
	fn can_read(&self, from: RegistryId, to: RegistryId) -> bool;

	/// Whether values of `ty` satisfy the contract.
	fn is_assignable(&self, ty: &dyn LoadableType, contract: &Contract) -> bool;

	fn is_public(&self, ty: &dyn LoadableType) -> bool {
		ty.is_public()
	}

	/// One-time precondition checked at engine construction. `scope` is
	/// `None` for registry-only engines.
	fn may_search(&self, scope: Option<ScopeId>, contract: &Contract) -> bool {
		let _ = (scope, contract);
		true
	}
}

/// A readable listing resource. Re-reading re-opens the resource.
pub trait ListingSource {
	/// Stable location string used in diagnostics and error values.
	fn location(&self) -> &str;

	fn read(&self) -> io::Result<String>;
}

/// Finds the listing resources conventionally associated with a contract at
/// one scope.
pub trait ResourceLocator {
	fn listing_resources_for(&self, contract: &Contract, scope: ScopeId) -> Vec<Rc<dyn ListingSource>>;
}

/// Structured view over scopes, registries and their declarations.
pub trait RegistryCatalog {
	/// Registries directly attached to `scope`, in attachment order.
	fn registries_attached_to(&self, scope: ScopeId) -> Vec<RegistryId>;

	/// Parent registries of `registry`, in declared order.
	fn parents_of(&self, registry: RegistryId) -> Vec<RegistryId>;

	/// Declarations owned by `registry`, in declared order.
	fn declarations_in(&self, registry: RegistryId) -> Vec<ProviderDeclaration>;

	/// Next scope in the delegation chain; `None` at the root sentinel.
	fn parent_scope(&self, scope: ScopeId) -> Option<ScopeId>;

	/// Additional scopes reachable from structures associated with `scope`
	/// (their attached registries join the structured pass of the chain
	/// traversal, deduplicated chain-wide).
	fn linked_scopes(&self, scope: ScopeId) -> Vec<ScopeId> {
		let _ = scope;
		Vec::new()
	}
}

/// Umbrella over the four collaborators; blanket-implemented.
pub trait Host: TypeResolver + VisibilityOracle + ResourceLocator + RegistryCatalog {}

impl<H> Host for H where H: TypeResolver + VisibilityOracle + ResourceLocator + RegistryCatalog + ?Sized {}
