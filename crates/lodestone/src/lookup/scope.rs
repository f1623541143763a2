//! Traversal of the linear scope delegation chain.
//!
//! Per chain position: structured registries first (the current scope's own
//! attachments plus those of its linked scopes), then the scope's listing
//! resources, then advance to the parent scope. Registry dedup spans the
//! whole chain: the visited set is threaded from scope to scope.

use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::core::{Contract, Host, ListingSource, ProviderDeclaration, RegistryId, ScopeId};
use crate::error::LoadError;
use crate::listing;

use super::registry::RegistryWalk;

/// One discovery event out of the chain traversal.
pub(crate) enum ScopeEvent {
	/// A declaration from the structured pass; the factory convention applies.
	Declaration(ProviderDeclaration),
	/// A name from a listing resource; constructor path only.
	ListingName { name: Box<str> },
	/// A whole listing resource dropped out (syntax or IO). Surfaced once,
	/// then the traversal continues with the next resource.
	Fault(LoadError),
}

enum Phase<'h, H: Host + ?Sized> {
	Enter,
	Registries(RegistryWalk<'h, H>),
	Listings { queue: VecDeque<Rc<dyn ListingSource>>, names: VecDeque<Box<str>> },
	Advance,
}

pub(crate) struct ScopeChainWalk<'h, H: Host + ?Sized> {
	host: &'h H,
	contract: Rc<Contract>,
	scope: Option<ScopeId>,
	phase: Phase<'h, H>,
	visited: FxHashSet<RegistryId>,
}

impl<'h, H: Host + ?Sized> ScopeChainWalk<'h, H> {
	pub fn new(host: &'h H, contract: Rc<Contract>, start: ScopeId) -> Self {
		Self {
			host,
			contract,
			scope: Some(start),
			phase: Phase::Enter,
			visited: FxHashSet::default(),
		}
	}

	pub fn next_event(&mut self) -> Option<ScopeEvent> {
		loop {
			match &mut self.phase {
				Phase::Enter => {
					let scope = self.scope?;
					let mut roots = self.host.registries_attached_to(scope);
					for linked in self.host.linked_scopes(scope) {
						roots.extend(self.host.registries_attached_to(linked));
					}
					tracing::trace!(%scope, roots = roots.len(), "entering scope");
					let visited = std::mem::take(&mut self.visited);
					self.phase = Phase::Registries(RegistryWalk::with_visited(
						self.host,
						self.contract.defining_registry(),
						roots,
						visited,
					));
				}
				Phase::Registries(walk) => {
					if let Some(decl) = walk.next_declaration() {
						return Some(ScopeEvent::Declaration(decl));
					}
					self.visited = walk.take_visited();
					let scope = self.scope?;
					let queue: VecDeque<_> =
						self.host.listing_resources_for(&self.contract, scope).into();
					self.phase = Phase::Listings { queue, names: VecDeque::new() };
				}
				Phase::Listings { queue, names } => {
					if let Some(name) = names.pop_front() {
						return Some(ScopeEvent::ListingName { name });
					}
					match queue.pop_front() {
						Some(source) => match listing::parse_listing(&*source) {
							Ok(parsed) => {
								tracing::debug!(
									resource = source.location(),
									providers = parsed.len(),
									"listing resource scanned"
								);
								names.extend(parsed);
							}
							Err(err) => {
								tracing::warn!(
									resource = source.location(),
									error = %err,
									"listing resource dropped"
								);
								return Some(ScopeEvent::Fault(err));
							}
						},
						None => self.phase = Phase::Advance,
					}
				}
				Phase::Advance => {
					let current = self.scope?;
					self.scope = self.host.parent_scope(current);
					self.phase = Phase::Enter;
					if self.scope.is_none() {
						// Root sentinel exhausted.
						return None;
					}
				}
			}
		}
	}
}
