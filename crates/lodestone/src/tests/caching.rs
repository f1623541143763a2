use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::ProviderInstance;
use crate::host::TypeDef;

#[test]
fn second_drain_is_identical_and_touches_no_sources() {
	let (world, scope) = mixed_world();
	let loader = ServiceLoader::for_scope(&world, codec(), scope).unwrap();

	let first = drain_providers(&loader);
	let reads_after_first = world.listing_reads();
	let second = drain_providers(&loader);

	assert_eq!(first, second);
	assert_eq!(world.listing_reads(), reads_after_first);
}

#[test]
fn cached_instances_are_shared() {
	let (world, scope) = mixed_world();
	let loader = ServiceLoader::for_scope(&world, codec(), scope).unwrap();

	let first: Vec<ProviderInstance> = loader.providers().map(Result::unwrap).collect();
	let second: Vec<ProviderInstance> = loader.providers().map(Result::unwrap).collect();

	assert_eq!(first.len(), second.len());
	for (a, b) in first.iter().zip(&second) {
		assert!(Rc::ptr_eq(a, b));
	}
}

#[test]
fn errors_replay_from_cache() {
	let mut world = World::new();
	let scope = world.add_scope(None);
	world.add_listing(scope, CODEC, "a.Missing\na.Good\n");
	define_provider(&mut world, "a.Good", "good");

	let loader = ServiceLoader::for_scope(&world, codec(), scope).unwrap();
	let first = drain_providers(&loader);
	let second = drain_providers(&loader);
	assert_eq!(first, second);
	assert!(first[0].starts_with("err:"));
}

#[test]
fn modes_use_independent_iterators_and_caches() {
	let (world, scope) = mixed_world();
	let loader = ServiceLoader::for_scope(&world, codec(), scope).unwrap();

	assert_eq!(drain_descriptors(&loader), ["a.One", "a.Two", "a.Three"]);
	let reads_after_descriptors = world.listing_reads();

	// The provider mode re-walks every source from scratch.
	assert_eq!(drain_providers(&loader), ["one", "two", "three"]);
	assert!(world.listing_reads() > reads_after_descriptors);
}

#[test]
fn descriptor_mode_never_instantiates() {
	let mut world = World::new();
	let scope = world.add_scope(None);
	world.add_listing(scope, CODEC, "a.Counted\n");

	let built = Rc::new(Cell::new(0usize));
	let hits = built.clone();
	world.define_global_type(TypeDef::new("a.Counted").implements(CODEC).with_constructor(
		move || {
			hits.set(hits.get() + 1);
			Ok(Rc::new("counted") as ProviderInstance)
		},
	));

	let loader = ServiceLoader::for_scope(&world, codec(), scope).unwrap();
	assert_eq!(drain_descriptors(&loader), ["a.Counted"]);
	assert_eq!(built.get(), 0);

	assert_eq!(drain_providers(&loader), ["counted"]);
	assert_eq!(built.get(), 1);

	// Cached re-drain does not construct again.
	assert_eq!(drain_providers(&loader), ["counted"]);
	assert_eq!(built.get(), 1);
}

#[test]
fn instantiation_failure_is_recoverable_and_cached() {
	let mut world = World::new();
	let scope = world.add_scope(None);
	let registry = world.add_registry(&[]);
	world.attach_registry(scope, registry);
	world.declare(registry, "a.NoValue");
	world.declare(registry, "a.Fine");
	world.define_global_type(TypeDef::new(CODEC));
	world.define_global_type(TypeDef::new("a.NoValue").with_factory(CODEC, || Ok(None)));
	define_provider(&mut world, "a.Fine", "fine");

	let loader = ServiceLoader::for_scope(&world, codec(), scope).unwrap();
	let drained = drain_providers(&loader);
	assert_eq!(
		drained,
		["err:provider `a.NoValue` failed to instantiate: factory produced no value", "fine"]
	);
	// The descriptor mode sees both providers without tripping the factory.
	assert_eq!(drain_descriptors(&loader), ["a.NoValue", "a.Fine"]);
	// And the failure replays identically from cache.
	assert_eq!(drain_providers(&loader), drained);
}

#[test]
fn interleaved_handles_share_one_live_walk() {
	let (world, scope) = mixed_world();
	let loader = ServiceLoader::for_scope(&world, codec(), scope).unwrap();

	let mut first = loader.providers();
	let mut second = loader.providers();

	assert_eq!(tag_of(&first.next().unwrap().unwrap()), "one");
	assert_eq!(tag_of(&second.next().unwrap().unwrap()), "one");
	assert_eq!(tag_of(&second.next().unwrap().unwrap()), "two");
	assert_eq!(tag_of(&first.next().unwrap().unwrap()), "two");
	assert_eq!(tag_of(&first.next().unwrap().unwrap()), "three");
	assert!(second.next().is_some());
	assert!(first.next().is_none());
	assert!(second.next().is_none());

	// One walk served both handles: the listing was read exactly once.
	assert_eq!(world.listing_reads(), 1);
}
