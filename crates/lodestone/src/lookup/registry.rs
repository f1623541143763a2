//! Depth-first traversal of the structured registry DAG.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::core::{Host, ProviderDeclaration, RegistryId};

/// Walks a registry tree/DAG depth-first from one or more roots, yielding raw
/// provider declarations.
///
/// Parents are pushed in reverse declared order so popping restores the
/// author's order; a registry reachable twice (diamond) is entered once. The
/// visited set can be threaded across walks so a whole scope-chain traversal
/// shares one dedup domain.
pub(crate) struct RegistryWalk<'h, H: Host + ?Sized> {
	host: &'h H,
	contract_registry: Option<RegistryId>,
	stack: Vec<RegistryId>,
	visited: FxHashSet<RegistryId>,
	pending: VecDeque<ProviderDeclaration>,
}

impl<'h, H: Host + ?Sized> RegistryWalk<'h, H> {
	pub fn new(
		host: &'h H,
		contract_registry: Option<RegistryId>,
		roots: Vec<RegistryId>,
	) -> Self {
		Self::with_visited(host, contract_registry, roots, FxHashSet::default())
	}

	/// Starts a walk that continues an earlier walk's dedup domain.
	pub fn with_visited(
		host: &'h H,
		contract_registry: Option<RegistryId>,
		roots: Vec<RegistryId>,
		visited: FxHashSet<RegistryId>,
	) -> Self {
		let stack: Vec<RegistryId> = roots.into_iter().rev().collect();
		Self { host, contract_registry, stack, visited, pending: VecDeque::new() }
	}

	/// Hands the visited set back for the next walk in the chain.
	pub fn take_visited(&mut self) -> FxHashSet<RegistryId> {
		std::mem::take(&mut self.visited)
	}

	pub fn next_declaration(&mut self) -> Option<ProviderDeclaration> {
		loop {
			if let Some(decl) = self.pending.pop_front() {
				return Some(decl);
			}
			let registry = self.stack.pop()?;
			if !self.visited.insert(registry) {
				continue;
			}
			tracing::trace!(%registry, "visiting registry");

			let parents = self.host.parents_of(registry);
			self.stack.extend(parents.into_iter().rev());

			for decl in self.host.declarations_in(registry) {
				if self.readable(&decl) {
					self.pending.push_back(decl);
				} else {
					tracing::debug!(
						registry = %decl.registry,
						provider = &*decl.provider,
						"declaration skipped: owning registry cannot read the contract's registry"
					);
				}
			}
		}
	}

	fn readable(&self, decl: &ProviderDeclaration) -> bool {
		match self.contract_registry {
			None => true,
			Some(target) => self.host.can_read(decl.registry, target),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::core::Contract;
	use crate::host::World;

	fn drain<H: Host + ?Sized>(mut walk: RegistryWalk<'_, H>) -> Vec<String> {
		let mut out = Vec::new();
		while let Some(decl) = walk.next_declaration() {
			out.push(decl.provider.into());
		}
		out
	}

	#[test]
	fn own_declarations_before_parent_subtrees() {
		let mut world = World::new();
		let p1 = world.add_registry(&[]);
		let p2 = world.add_registry(&[]);
		let root = world.add_registry(&[p1, p2]);
		world.declare(root, "r.A");
		world.declare(root, "r.B");
		world.declare(p1, "p1.A");
		world.declare(p2, "p2.A");

		let walk = RegistryWalk::new(&world, None, vec![root]);
		assert_eq!(drain(walk), ["r.A", "r.B", "p1.A", "p2.A"]);
	}

	#[test]
	fn first_parent_subtree_fully_before_second() {
		let mut world = World::new();
		let gp = world.add_registry(&[]);
		world.declare(gp, "gp.A");
		let p1 = world.add_registry(&[gp]);
		world.declare(p1, "p1.A");
		let p2 = world.add_registry(&[]);
		world.declare(p2, "p2.A");
		let root = world.add_registry(&[p1, p2]);
		world.declare(root, "r.A");

		let walk = RegistryWalk::new(&world, None, vec![root]);
		assert_eq!(drain(walk), ["r.A", "p1.A", "gp.A", "p2.A"]);
	}

	#[test]
	fn diamond_visited_once() {
		let mut world = World::new();
		let shared = world.add_registry(&[]);
		world.declare(shared, "shared.A");
		let left = world.add_registry(&[shared]);
		let right = world.add_registry(&[shared]);
		let root = world.add_registry(&[left, right]);

		let walk = RegistryWalk::new(&world, None, vec![root]);
		assert_eq!(drain(walk), ["shared.A"]);
	}

	#[test]
	fn unreadable_declarations_skipped_silently() {
		let mut world = World::new();
		let contract_reg = world.add_registry(&[]);
		let friendly = world.add_registry(&[]);
		let stranger = world.add_registry(&[]);
		world.allow_read(friendly, contract_reg);
		world.declare(friendly, "ok.A");
		world.declare(stranger, "no.A");
		let root = world.add_registry(&[friendly, stranger]);

		let contract = Contract::in_registry("svc.Codec", contract_reg);
		let walk = RegistryWalk::new(&world, contract.defining_registry(), vec![root]);
		assert_eq!(drain(walk), ["ok.A"]);
	}

	#[test]
	fn visited_set_threads_across_walks() {
		let mut world = World::new();
		let shared = world.add_registry(&[]);
		world.declare(shared, "shared.A");

		let mut first = RegistryWalk::new(&world, None, vec![shared]);
		assert_eq!(first.next_declaration().unwrap().provider.as_ref(), "shared.A");
		assert!(first.next_declaration().is_none());

		let second =
			RegistryWalk::with_visited(&world, None, vec![shared], first.take_visited());
		assert_eq!(drain(second), Vec::<String>::new());
	}
}
