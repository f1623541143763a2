//! In-memory reference host.
//!
//! [`World`] implements all four collaborator traits over `slab` arenas:
//! scopes form the delegation chain, registries form the DAG, the type table
//! holds constructor/factory closures, and listing resources are registered
//! per scope under the conventional `<prefix><contract-name>` path.
//!
//! It is the host the test suite runs against and a ready-made starting
//! point for programs that register providers programmatically. Hosts with
//! their own class-loading or module machinery implement the core traits
//! directly instead.

mod sources;
mod types;

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slab::Slab;

use crate::core::{
	Contract, ListingSource, LoadableType, ProviderDeclaration, RegistryCatalog, RegistryId,
	ResourceLocator, ScopeId, TypeResolver, VisibilityOracle,
};

pub use sources::{FsListing, MemListing};
pub use types::TypeDef;

use types::TypeRecord;

/// Derives the conventional listing-resource path for a contract.
#[derive(Debug, Clone)]
pub struct ListingConvention {
	prefix: Box<str>,
}

impl ListingConvention {
	pub fn new(prefix: impl Into<Box<str>>) -> Self {
		Self { prefix: prefix.into() }
	}

	pub fn path_for(&self, contract_name: &str) -> String {
		format!("{}{}", self.prefix, contract_name)
	}
}

impl Default for ListingConvention {
	fn default() -> Self {
		Self::new("providers/")
	}
}

struct ScopeData {
	parent: Option<ScopeId>,
	links: Vec<ScopeId>,
	registries: Vec<RegistryId>,
}

struct RegistryData {
	parents: Vec<RegistryId>,
	reads: Vec<RegistryId>,
	declarations: Vec<Box<str>>,
}

type SearchGuard = Box<dyn Fn(Option<ScopeId>, &Contract) -> bool>;

/// Arena-backed host: scopes, registries, types and listing resources.
pub struct World {
	scopes: Slab<ScopeData>,
	registries: Slab<RegistryData>,
	types: FxHashMap<Box<str>, Rc<TypeRecord>>,
	/// Types visible only from one scope (and its children via delegation).
	scoped_types: FxHashMap<Box<str>, ScopeId>,
	listings: FxHashMap<(ScopeId, Box<str>), Vec<Rc<dyn ListingSource>>>,
	convention: ListingConvention,
	search_guard: Option<SearchGuard>,
	listing_reads: Rc<Cell<usize>>,
}

impl World {
	pub fn new() -> Self {
		Self {
			scopes: Slab::new(),
			registries: Slab::new(),
			types: FxHashMap::default(),
			scoped_types: FxHashMap::default(),
			listings: FxHashMap::default(),
			convention: ListingConvention::default(),
			search_guard: None,
			listing_reads: Rc::new(Cell::new(0)),
		}
	}

	pub fn with_convention(convention: ListingConvention) -> Self {
		Self { convention, ..Self::new() }
	}

	/// Adds a scope delegating to `parent` (`None` makes it a chain root).
	pub fn add_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
		let index = self.scopes.insert(ScopeData { parent, links: Vec::new(), registries: Vec::new() });
		ScopeId::from_index(index)
	}

	/// Makes `linked`'s attached registries join `scope`'s structured pass.
	pub fn link_scopes(&mut self, scope: ScopeId, linked: ScopeId) {
		self.scopes[scope.index()].links.push(linked);
	}

	/// Adds a registry with the given parent edges, in declared order.
	pub fn add_registry(&mut self, parents: &[RegistryId]) -> RegistryId {
		let index = self.registries.insert(RegistryData {
			parents: parents.to_vec(),
			reads: Vec::new(),
			declarations: Vec::new(),
		});
		RegistryId::from_index(index)
	}

	pub fn attach_registry(&mut self, scope: ScopeId, registry: RegistryId) {
		self.scopes[scope.index()].registries.push(registry);
	}

	/// Grants `from` read access to `to` (used when a contract has a
	/// defining registry).
	pub fn allow_read(&mut self, from: RegistryId, to: RegistryId) {
		self.registries[from.index()].reads.push(to);
	}

	/// Appends a provider declaration to `registry`.
	pub fn declare(&mut self, registry: RegistryId, provider: impl Into<Box<str>>) {
		self.registries[registry.index()].declarations.push(provider.into());
	}

	/// Defines a type resolvable from every scope (and from registry-only
	/// traversals).
	pub fn define_global_type(&mut self, def: TypeDef) {
		let record: TypeRecord = def.into();
		self.types.insert(record.name.clone(), Rc::new(record));
	}

	/// Defines a type resolvable only from `scope` and scopes delegating to
	/// it.
	pub fn define_type(&mut self, scope: ScopeId, def: TypeDef) {
		let record: TypeRecord = def.into();
		self.scoped_types.insert(record.name.clone(), scope);
		self.types.insert(record.name.clone(), Rc::new(record));
	}

	/// Registers an in-memory listing resource for `contract_name` at
	/// `scope`, under the conventional path.
	pub fn add_listing(&mut self, scope: ScopeId, contract_name: &str, text: &str) {
		let path: Box<str> = self.convention.path_for(contract_name).into();
		let entries = self.listings.entry((scope, path.clone())).or_default();
		let location = format!("{path}@{scope}#{}", entries.len());
		entries.push(Rc::new(MemListing::new(location, text, self.listing_reads.clone())));
	}

	/// Registers a filesystem-backed listing resource.
	pub fn add_listing_file(&mut self, scope: ScopeId, contract_name: &str, path: impl Into<PathBuf>) {
		let key: Box<str> = self.convention.path_for(contract_name).into();
		let source = Rc::new(FsListing::new(path, self.listing_reads.clone()));
		self.listings.entry((scope, key)).or_default().push(source);
	}

	/// Gates engine construction; absent guard means every search is allowed.
	pub fn set_search_guard(&mut self, guard: impl Fn(Option<ScopeId>, &Contract) -> bool + 'static) {
		self.search_guard = Some(Box::new(guard));
	}

	/// Total listing-source reads performed so far (all sources this world
	/// handed out).
	pub fn listing_reads(&self) -> usize {
		self.listing_reads.get()
	}

	fn scope_chain_contains(&self, mut from: Option<ScopeId>, target: ScopeId) -> bool {
		while let Some(scope) = from {
			if scope == target {
				return true;
			}
			from = self.scopes.get(scope.index()).and_then(|s| s.parent);
		}
		false
	}
}

impl Default for World {
	fn default() -> Self {
		Self::new()
	}
}

impl TypeResolver for World {
	fn resolve_type(&self, name: &str, scope: Option<ScopeId>) -> Option<Rc<dyn LoadableType>> {
		let record = self.types.get(name)?;
		if let Some(&defining) = self.scoped_types.get(name) {
			if !self.scope_chain_contains(scope, defining) {
				return None;
			}
		}
		Some(record.clone() as Rc<dyn LoadableType>)
	}
}

impl VisibilityOracle for World {
	fn can_read(&self, from: RegistryId, to: RegistryId) -> bool {
		from == to
			|| self.registries.get(from.index()).is_some_and(|r| r.reads.contains(&to))
	}

	fn is_assignable(&self, ty: &dyn LoadableType, contract: &Contract) -> bool {
		if ty.name() == contract.name() {
			return true;
		}
		self.types.get(ty.name()).is_some_and(|r| r.implements.contains(contract.name()))
	}

	fn may_search(&self, scope: Option<ScopeId>, contract: &Contract) -> bool {
		self.search_guard.as_ref().is_none_or(|guard| guard(scope, contract))
	}
}

impl ResourceLocator for World {
	fn listing_resources_for(&self, contract: &Contract, scope: ScopeId) -> Vec<Rc<dyn ListingSource>> {
		let path: Box<str> = self.convention.path_for(contract.name()).into();
		self.listings.get(&(scope, path)).cloned().unwrap_or_default()
	}
}

impl RegistryCatalog for World {
	fn registries_attached_to(&self, scope: ScopeId) -> Vec<RegistryId> {
		self.scopes.get(scope.index()).map(|s| s.registries.clone()).unwrap_or_default()
	}

	fn parents_of(&self, registry: RegistryId) -> Vec<RegistryId> {
		self.registries.get(registry.index()).map(|r| r.parents.clone()).unwrap_or_default()
	}

	fn declarations_in(&self, registry: RegistryId) -> Vec<ProviderDeclaration> {
		self.registries
			.get(registry.index())
			.map(|r| {
				r.declarations
					.iter()
					.map(|name| ProviderDeclaration::new(registry, name.clone()))
					.collect()
			})
			.unwrap_or_default()
	}

	fn parent_scope(&self, scope: ScopeId) -> Option<ScopeId> {
		self.scopes.get(scope.index()).and_then(|s| s.parent)
	}

	fn linked_scopes(&self, scope: ScopeId) -> Vec<ScopeId> {
		self.scopes.get(scope.index()).map(|s| s.links.clone()).unwrap_or_default()
	}
}
