//! The host-side type table: explicit constructor/factory closures standing
//! in for runtime reflection.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::core::{InstantiationFault, LoadableType, ProviderFactory, ProviderInstance};

pub(super) type ConstructorFn = Rc<dyn Fn() -> Result<ProviderInstance, InstantiationFault>>;
pub(super) type FactoryFn = Rc<dyn Fn() -> Result<Option<ProviderInstance>, InstantiationFault>>;

/// Builder for one entry in the [`World`](super::World) type table.
///
/// Types are public unless [`TypeDef::private`] is called. A type with no
/// constructor and no factories is still definable — contracts themselves
/// are usually registered that way so factory return types can resolve.
pub struct TypeDef {
	pub(super) name: Box<str>,
	pub(super) public: bool,
	pub(super) implements: FxHashSet<Box<str>>,
	pub(super) constructor: Option<ConstructorFn>,
	pub(super) factories: Vec<FactoryDef>,
}

pub(super) struct FactoryDef {
	pub returns: Box<str>,
	pub invoke: FactoryFn,
}

impl TypeDef {
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			public: true,
			implements: FxHashSet::default(),
			constructor: None,
			factories: Vec::new(),
		}
	}

	pub fn private(mut self) -> Self {
		self.public = false;
		self
	}

	/// Declares the type assignable to `contract`.
	pub fn implements(mut self, contract: impl Into<Box<str>>) -> Self {
		self.implements.insert(contract.into());
		self
	}

	/// Registers the public zero-argument constructor.
	pub fn with_constructor(
		mut self,
		constructor: impl Fn() -> Result<ProviderInstance, InstantiationFault> + 'static,
	) -> Self {
		self.constructor = Some(Rc::new(constructor));
		self
	}

	/// Infallible constructor convenience: wraps the produced value in `Rc`.
	pub fn constructing<T: 'static>(self, make: impl Fn() -> T + 'static) -> Self {
		self.with_constructor(move || Ok(Rc::new(make()) as ProviderInstance))
	}

	/// Registers a zero-argument static factory under the
	/// [`FACTORY_METHOD`](crate::core::FACTORY_METHOD) convention. Call twice
	/// to model an ambiguous factory.
	pub fn with_factory(
		mut self,
		returns: impl Into<Box<str>>,
		invoke: impl Fn() -> Result<Option<ProviderInstance>, InstantiationFault> + 'static,
	) -> Self {
		self.factories.push(FactoryDef { returns: returns.into(), invoke: Rc::new(invoke) });
		self
	}
}

impl fmt::Debug for TypeDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeDef")
			.field("name", &self.name)
			.field("public", &self.public)
			.field("implements", &self.implements)
			.field("has_constructor", &self.constructor.is_some())
			.field("factories", &self.factories.len())
			.finish()
	}
}

/// Immutable table entry; what [`TypeResolver`](crate::core::TypeResolver)
/// hands to the engine.
pub(super) struct TypeRecord {
	pub name: Box<str>,
	pub public: bool,
	pub implements: FxHashSet<Box<str>>,
	pub constructor: Option<ConstructorFn>,
	pub factories: Vec<FactoryDef>,
}

impl From<TypeDef> for TypeRecord {
	fn from(def: TypeDef) -> Self {
		Self {
			name: def.name,
			public: def.public,
			implements: def.implements,
			constructor: def.constructor,
			factories: def.factories,
		}
	}
}

impl LoadableType for TypeRecord {
	fn name(&self) -> &str {
		&self.name
	}

	fn is_public(&self) -> bool {
		self.public
	}

	fn factories(&self) -> Vec<ProviderFactory> {
		self.factories
			.iter()
			.map(|f| ProviderFactory { returns: f.returns.clone(), invoke: f.invoke.clone() })
			.collect()
	}

	fn has_default_constructor(&self) -> bool {
		self.constructor.is_some()
	}

	fn construct(&self) -> Result<ProviderInstance, InstantiationFault> {
		match &self.constructor {
			Some(constructor) => constructor(),
			None => Err(InstantiationFault::new("no constructor registered")),
		}
	}
}
