//! The engine: one contract, one starting point, two independently cached
//! consumption modes.
//!
//! # Mental model
//!
//! 1. Construction binds contract + start point and checks the capability
//!    precondition. Nothing is discovered yet.
//! 2. Each consumption mode owns a lane: an append-only item cache plus a
//!    private lookup iterator, created on first pull. Handles drain the cache
//!    first, then advance the live iterator, appending as they go.
//! 3. `reload()` clears both lanes and bumps the generation. Handles carry
//!    the generation they were issued under and fail fast on mismatch.
//!
//! Single-threaded by contract: lanes live behind `RefCell`, instances are
//! `Rc`. Callers needing concurrency create one engine per thread.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::core::{Contract, Host, ProviderDescriptor, ProviderInstance, RegistryId, ScopeId};
use crate::error::LoadError;
use crate::lookup::Discovery;

/// Where discovery starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Start {
	Scope(ScopeId),
	Registry(RegistryId),
}

/// One consumption mode's state: cached items in discovery order plus the
/// live iterator that extends them.
struct Lane<'h, H: Host + ?Sized, T> {
	items: Vec<Result<T, LoadError>>,
	live: Option<Discovery<'h, H>>,
	exhausted: bool,
}

impl<'h, H: Host + ?Sized, T> Lane<'h, H, T> {
	fn new() -> Self {
		Self { items: Vec::new(), live: None, exhausted: false }
	}
}

/// Lazy provider discovery engine for one contract.
///
/// See the module docs for the lane/generation model. Construction performs
/// no discovery and no IO; everything happens at the pull.
pub struct ServiceLoader<'h, H: Host + ?Sized> {
	host: &'h H,
	contract: Rc<Contract>,
	start: Start,
	generation: Cell<u64>,
	instances: RefCell<Lane<'h, H, ProviderInstance>>,
	descriptors: RefCell<Lane<'h, H, Rc<ProviderDescriptor>>>,
}

impl<'h, H: Host + ?Sized> ServiceLoader<'h, H> {
	/// Engine over a scope delegation chain (structured registries first at
	/// each scope, then listing resources).
	pub fn for_scope(host: &'h H, contract: Contract, scope: ScopeId) -> Result<Self, LoadError> {
		Self::build(host, contract, Some(scope), Start::Scope(scope))
	}

	/// Engine over a single structured registry tree; no listing discovery.
	pub fn for_registry(
		host: &'h H,
		contract: Contract,
		registry: RegistryId,
	) -> Result<Self, LoadError> {
		Self::build(host, contract, None, Start::Registry(registry))
	}

	fn build(
		host: &'h H,
		contract: Contract,
		scope: Option<ScopeId>,
		start: Start,
	) -> Result<Self, LoadError> {
		if !host.may_search(scope, &contract) {
			return Err(LoadError::Capability { contract: contract.name().into() });
		}
		tracing::debug!(contract = contract.name(), ?start, "service loader created");
		Ok(Self {
			host,
			contract: Rc::new(contract),
			start,
			generation: Cell::new(0),
			instances: RefCell::new(Lane::new()),
			descriptors: RefCell::new(Lane::new()),
		})
	}

	pub fn contract(&self) -> &Contract {
		&self.contract
	}

	/// Current reload generation; bumped by [`ServiceLoader::reload`].
	pub fn generation(&self) -> u64 {
		self.generation.get()
	}

	/// Lazy sequence of instantiated providers in discovery order.
	///
	/// Instantiation happens at the pull that first reaches each provider;
	/// later drains replay the cache, returning the same `Rc` instances and
	/// the same errors at the same positions. After an error the caller may
	/// keep pulling.
	pub fn providers(&self) -> Providers<'_, 'h, H> {
		Providers { cursor: Cursor::new(self) }
	}

	/// Lazy sequence of resolved-but-not-instantiated descriptors. Uses its
	/// own lookup iterator and cache: consuming this mode never instantiates
	/// anything and does not advance [`ServiceLoader::providers`].
	pub fn descriptors(&self) -> Descriptors<'_, 'h, H> {
		Descriptors { cursor: Cursor::new(self) }
	}

	/// First provider, if any.
	pub fn find_first(&self) -> Result<Option<ProviderInstance>, LoadError> {
		match self.providers().next() {
			Some(Ok(instance)) => Ok(Some(instance)),
			Some(Err(err)) => Err(err),
			None => Ok(None),
		}
	}

	/// Drops both caches and live iterators and bumps the generation. Every
	/// previously issued handle fails with [`LoadError::StaleTraversal`] on
	/// its next pull.
	pub fn reload(&self) {
		self.instances.replace(Lane::new());
		self.descriptors.replace(Lane::new());
		self.generation.set(self.generation.get() + 1);
		tracing::debug!(
			contract = self.contract.name(),
			generation = self.generation.get(),
			"service loader reloaded"
		);
	}

	fn discovery(&self) -> Discovery<'h, H> {
		match self.start {
			Start::Scope(scope) => Discovery::over_scope_chain(self.host, self.contract.clone(), scope),
			Start::Registry(root) => Discovery::over_registry(self.host, self.contract.clone(), root),
		}
	}
}

impl<'h, H: Host + ?Sized> fmt::Debug for ServiceLoader<'h, H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("ServiceLoader");
		s.field("contract", &self.contract.name())
			.field("start", &self.start)
			.field("generation", &self.generation.get());
		if let Ok(lane) = self.instances.try_borrow() {
			s.field("cached_instances", &lane.items.len());
		}
		if let Ok(lane) = self.descriptors.try_borrow() {
			s.field("cached_descriptors", &lane.items.len());
		}
		s.finish()
	}
}

/// Shared handle bookkeeping: position in the lane plus the generation the
/// handle was issued under.
struct Cursor<'l, 'h, H: Host + ?Sized> {
	loader: &'l ServiceLoader<'h, H>,
	generation: u64,
	position: usize,
	fused: bool,
}

impl<'l, 'h, H: Host + ?Sized> Cursor<'l, 'h, H> {
	fn new(loader: &'l ServiceLoader<'h, H>) -> Self {
		Self { loader, generation: loader.generation.get(), position: 0, fused: false }
	}

	/// `Ok(())` while fresh. The first stale pull gets `Err(Some(..))`; the
	/// handle then fuses and every later pull gets `Err(None)`.
	fn check_generation(&mut self) -> Result<(), Option<LoadError>> {
		let current = self.loader.generation.get();
		if current == self.generation && !self.fused {
			return Ok(());
		}
		if self.fused {
			return Err(None);
		}
		self.fused = true;
		Err(Some(LoadError::StaleTraversal { observed: self.generation, current }))
	}
}

/// Handle returned by [`ServiceLoader::providers`].
pub struct Providers<'l, 'h, H: Host + ?Sized> {
	cursor: Cursor<'l, 'h, H>,
}

impl<'l, 'h, H: Host + ?Sized> Iterator for Providers<'l, 'h, H> {
	type Item = Result<ProviderInstance, LoadError>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.cursor.check_generation() {
			Ok(()) => {}
			Err(Some(err)) => return Some(Err(err)),
			Err(None) => return None,
		}
		let loader = self.cursor.loader;
		let mut lane = loader.instances.borrow_mut();
		if self.cursor.position < lane.items.len() {
			let item = lane.items[self.cursor.position].clone();
			self.cursor.position += 1;
			return Some(item);
		}
		if lane.exhausted {
			return None;
		}
		let live = lane.live.get_or_insert_with(|| loader.discovery());
		match live.next() {
			Some(Ok(descriptor)) => {
				let item = descriptor.instantiate();
				lane.items.push(item.clone());
				self.cursor.position += 1;
				Some(item)
			}
			Some(Err(err)) => {
				lane.items.push(Err(err.clone()));
				self.cursor.position += 1;
				Some(Err(err))
			}
			None => {
				lane.exhausted = true;
				lane.live = None;
				None
			}
		}
	}
}

/// Handle returned by [`ServiceLoader::descriptors`].
pub struct Descriptors<'l, 'h, H: Host + ?Sized> {
	cursor: Cursor<'l, 'h, H>,
}

impl<'l, 'h, H: Host + ?Sized> Iterator for Descriptors<'l, 'h, H> {
	type Item = Result<Rc<ProviderDescriptor>, LoadError>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.cursor.check_generation() {
			Ok(()) => {}
			Err(Some(err)) => return Some(Err(err)),
			Err(None) => return None,
		}
		let loader = self.cursor.loader;
		let mut lane = loader.descriptors.borrow_mut();
		if self.cursor.position < lane.items.len() {
			let item = lane.items[self.cursor.position].clone();
			self.cursor.position += 1;
			return Some(item);
		}
		if lane.exhausted {
			return None;
		}
		let live = lane.live.get_or_insert_with(|| loader.discovery());
		match live.next() {
			Some(Ok(descriptor)) => {
				lane.items.push(Ok(descriptor.clone()));
				self.cursor.position += 1;
				Some(Ok(descriptor))
			}
			Some(Err(err)) => {
				lane.items.push(Err(err.clone()));
				self.cursor.position += 1;
				Some(Err(err))
			}
			None => {
				lane.exhausted = true;
				lane.live = None;
				None
			}
		}
	}
}
