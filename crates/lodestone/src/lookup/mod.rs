//! Lookup pipeline: raw traversal events in, deduplicated resolved
//! descriptors out.

mod registry;
mod scope;

use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::core::{Contract, Host, ProviderDescriptor, RegistryId, ScopeId};
use crate::error::LoadError;
use crate::resolve::resolve_provider;

pub(crate) use registry::RegistryWalk;
pub(crate) use scope::{ScopeChainWalk, ScopeEvent};

enum Walk<'h, H: Host + ?Sized> {
	Registry(RegistryWalk<'h, H>),
	Scope(ScopeChainWalk<'h, H>),
}

/// One consumption mode's private lookup iterator.
///
/// Dedup happens in two layers: provider names before resolution (a repeated
/// name is silently skipped, so resolution runs once per declaration), and
/// resolved type names after (two names landing on one type keep only the
/// first). Resolution failures come out as items, once, and the traversal
/// carries on.
pub(crate) struct Discovery<'h, H: Host + ?Sized> {
	host: &'h H,
	contract: Rc<Contract>,
	scope: Option<ScopeId>,
	walk: Walk<'h, H>,
	seen_names: FxHashSet<Box<str>>,
	seen_types: FxHashSet<Box<str>>,
}

impl<'h, H: Host + ?Sized> Discovery<'h, H> {
	pub fn over_scope_chain(host: &'h H, contract: Rc<Contract>, start: ScopeId) -> Self {
		let walk = Walk::Scope(ScopeChainWalk::new(host, contract.clone(), start));
		Self {
			host,
			contract,
			scope: Some(start),
			walk,
			seen_names: FxHashSet::default(),
			seen_types: FxHashSet::default(),
		}
	}

	pub fn over_registry(host: &'h H, contract: Rc<Contract>, root: RegistryId) -> Self {
		let walk = Walk::Registry(RegistryWalk::new(host, contract.defining_registry(), vec![root]));
		Self {
			host,
			contract,
			scope: None,
			walk,
			seen_names: FxHashSet::default(),
			seen_types: FxHashSet::default(),
		}
	}

	pub fn next(&mut self) -> Option<Result<Rc<ProviderDescriptor>, LoadError>> {
		loop {
			let (name, factory_allowed) = match &mut self.walk {
				Walk::Registry(walk) => match walk.next_declaration() {
					Some(decl) => (decl.provider, true),
					None => return None,
				},
				Walk::Scope(walk) => match walk.next_event() {
					Some(ScopeEvent::Declaration(decl)) => (decl.provider, true),
					Some(ScopeEvent::ListingName { name }) => (name, false),
					Some(ScopeEvent::Fault(err)) => return Some(Err(err)),
					None => return None,
				},
			};

			if !self.seen_names.insert(name.clone()) {
				tracing::trace!(provider = &*name, "duplicate provider name suppressed");
				continue;
			}

			match resolve_provider(self.host, &self.contract, self.scope, &name, factory_allowed) {
				Ok(descriptor) => {
					if !self.seen_types.insert(descriptor.type_name().into()) {
						tracing::trace!(
							provider = &*name,
							ty = descriptor.type_name(),
							"duplicate provider type suppressed"
						);
						continue;
					}
					tracing::debug!(
						provider = &*name,
						ty = descriptor.type_name(),
						factory = descriptor.strategy().is_factory(),
						"provider discovered"
					);
					return Some(Ok(Rc::new(descriptor)));
				}
				Err(err) => return Some(Err(err)),
			}
		}
	}
}
