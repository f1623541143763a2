//! End-to-end engine tests against the in-memory [`World`] host.

mod caching;

use crate::host::{TypeDef, World};
use crate::{Contract, LoadError, ProviderInstance, ServiceLoader};

const CODEC: &str = "svc.Codec";

fn codec() -> Contract {
	Contract::new(CODEC)
}

/// Defines a public constructor-instantiable provider whose instance is the
/// given tag string.
fn define_provider(world: &mut World, name: &str, tag: &'static str) {
	world.define_global_type(TypeDef::new(name).implements(CODEC).constructing(move || tag));
}

fn tag_of(instance: &ProviderInstance) -> String {
	instance.clone().downcast::<&str>().map(|s| s.to_string()).unwrap_or_else(|_| "<opaque>".into())
}

/// Renders a full drain of `providers()`: tags for values, `err:`-prefixed
/// messages for per-item failures.
fn drain_providers(loader: &ServiceLoader<'_, World>) -> Vec<String> {
	loader
		.providers()
		.map(|item| match item {
			Ok(instance) => tag_of(&instance),
			Err(err) => format!("err:{err}"),
		})
		.collect()
}

/// Renders a full drain of `descriptors()` as provider type names.
fn drain_descriptors(loader: &ServiceLoader<'_, World>) -> Vec<String> {
	loader
		.descriptors()
		.map(|item| match item {
			Ok(descriptor) => descriptor.type_name().to_string(),
			Err(err) => format!("err:{err}"),
		})
		.collect()
}

fn first_error(loader: &ServiceLoader<'_, World>) -> Option<LoadError> {
	loader.providers().find_map(Result::err)
}

/// `unwrap_err` stand-in: `Rc<dyn Any>` has no `Debug` impl.
fn expect_provider_err(item: Option<Result<ProviderInstance, LoadError>>) -> LoadError {
	match item {
		Some(Err(err)) => err,
		Some(Ok(_)) => panic!("expected an error item, got a provider"),
		None => panic!("expected an error item, sequence ended"),
	}
}

/// A world with one scope, providers `a.One`/`a.Two` declared through an
/// attached registry and `a.Three` through a listing resource.
fn mixed_world() -> (World, crate::ScopeId) {
	let mut world = World::new();
	let scope = world.add_scope(None);
	let registry = world.add_registry(&[]);
	world.attach_registry(scope, registry);
	world.declare(registry, "a.One");
	world.declare(registry, "a.Two");
	world.add_listing(scope, CODEC, "a.Three\n");
	define_provider(&mut world, "a.One", "one");
	define_provider(&mut world, "a.Two", "two");
	define_provider(&mut world, "a.Three", "three");
	(world, scope)
}
