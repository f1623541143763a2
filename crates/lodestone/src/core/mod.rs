//! Shared data model: identities, contracts, declarations, descriptors and
//! the collaborator traits the engine is generic over.

mod contract;
mod decl;
mod descriptor;
mod id;
mod traits;

pub use contract::Contract;
pub use decl::ProviderDeclaration;
pub use descriptor::{
	FACTORY_METHOD, InstantiationFault, InstantiationStrategy, ProviderDescriptor, ProviderFactory,
	ProviderInstance,
};
pub use id::{RegistryId, ScopeId};
pub use traits::{
	Host, ListingSource, LoadableType, RegistryCatalog, ResourceLocator, TypeResolver,
	VisibilityOracle,
};
