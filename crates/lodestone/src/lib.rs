//! Lazy provider discovery and instantiation for plugin hosts.
//!
//! Given a [`Contract`] (the capability being searched for), a [`ServiceLoader`]
//! discovers concrete providers across two kinds of sources — structured
//! registry DAGs and per-scope listing resources — without loading or
//! constructing anything until a value is actually pulled. Discovery order is
//! stable, duplicates collapse to their first occurrence, and everything
//! discovered is cached so repeated drains are cheap.
//!
//! # Consumption modes
//!
//! - [`ServiceLoader::providers`] yields instantiated providers.
//! - [`ServiceLoader::descriptors`] yields resolved [`ProviderDescriptor`]s
//!   and leaves instantiation to the caller.
//!
//! The two modes are independent: each owns its cache and its lookup
//! iterator. [`ServiceLoader::reload`] drops both and invalidates every
//! previously issued handle.
//!
//! # Hosts
//!
//! The engine calls through four narrow collaborator traits ([`TypeResolver`],
//! [`VisibilityOracle`], [`ResourceLocator`], [`RegistryCatalog`]); the
//! [`host`] module ships an in-memory, arena-backed implementation
//! ([`host::World`]) for programmatic registration and tests.
//!
//! Engines and their handles are single-threaded by design: no locks, no
//! internal threads, side effects happen synchronously at the pull.

pub mod core;
pub mod error;
pub mod host;
pub mod listing;
mod loader;
mod lookup;
mod resolve;

pub use crate::core::{
	Contract, FACTORY_METHOD, Host, InstantiationFault, InstantiationStrategy, ListingSource,
	LoadableType, ProviderDeclaration, ProviderDescriptor, ProviderFactory, ProviderInstance,
	RegistryCatalog, RegistryId, ResourceLocator, ScopeId, TypeResolver, VisibilityOracle,
};
pub use crate::error::{LoadError, ResolutionFault, SyntaxFault};
pub use crate::loader::{Descriptors, Providers, ServiceLoader};

#[cfg(test)]
mod tests;
