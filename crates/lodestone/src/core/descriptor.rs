use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::LoadError;

use super::traits::LoadableType;

/// Conventional name of the zero-argument static factory accessor looked up
/// on provider types declared through structured registries.
pub const FACTORY_METHOD: &str = "provider";

/// An instantiated provider, type-erased. Downcast with
/// [`Rc::downcast`] once the caller knows the contract's Rust type.
pub type ProviderInstance = Rc<dyn Any>;

/// Failure raised by a factory or constructor closure while producing an
/// instance. Carried into [`LoadError::Instantiation`] with the provider name
/// attached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InstantiationFault {
	message: Box<str>,
}

impl InstantiationFault {
	pub fn new(message: impl Into<Box<str>>) -> Self {
		Self { message: message.into() }
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// A zero-argument static factory found on a provider type under the
/// [`FACTORY_METHOD`] convention.
///
/// `Ok(None)` from `invoke` means the factory ran but produced no value,
/// which surfaces as an instantiation error at the consuming pull.
#[derive(Clone)]
pub struct ProviderFactory {
	/// Declared return type name, checked for contract assignability during
	/// resolution.
	pub returns: Box<str>,
	pub invoke: Rc<dyn Fn() -> Result<Option<ProviderInstance>, InstantiationFault>>,
}

impl fmt::Debug for ProviderFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderFactory").field("returns", &self.returns).finish_non_exhaustive()
	}
}

/// How a resolved provider is materialized. Fixed once resolution succeeds.
#[derive(Debug, Clone)]
pub enum InstantiationStrategy {
	/// Invoke the conventional static factory.
	Factory(ProviderFactory),
	/// Invoke the public zero-argument constructor of the provider type.
	Constructor,
}

impl InstantiationStrategy {
	pub fn is_factory(&self) -> bool {
		matches!(self, Self::Factory(_))
	}
}

/// A resolved, not-yet-instantiated provider.
///
/// Identity for deduplication purposes is the declared type name; within one
/// engine a given type appears at most once across the whole discovery order.
#[derive(Clone)]
pub struct ProviderDescriptor {
	name: Box<str>,
	ty: Rc<dyn LoadableType>,
	strategy: InstantiationStrategy,
}

impl ProviderDescriptor {
	pub(crate) fn new(
		name: impl Into<Box<str>>,
		ty: Rc<dyn LoadableType>,
		strategy: InstantiationStrategy,
	) -> Self {
		Self { name: name.into(), ty, strategy }
	}

	/// The provider name as it was declared or listed.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Name of the resolved backing type.
	pub fn type_name(&self) -> &str {
		self.ty.name()
	}

	pub fn strategy(&self) -> &InstantiationStrategy {
		&self.strategy
	}

	/// Materializes the provider. Runs the factory or constructor closure
	/// synchronously on the calling thread; never cached here — the engine's
	/// instantiated-provider lane owns memoization.
	pub fn instantiate(&self) -> Result<ProviderInstance, LoadError> {
		match &self.strategy {
			InstantiationStrategy::Factory(factory) => match (factory.invoke)() {
				Ok(Some(instance)) => Ok(instance),
				Ok(None) => Err(LoadError::Instantiation {
					provider: self.name.clone(),
					message: "factory produced no value".into(),
				}),
				Err(fault) => Err(LoadError::Instantiation {
					provider: self.name.clone(),
					message: fault.message().into(),
				}),
			},
			InstantiationStrategy::Constructor => {
				self.ty.construct().map_err(|fault| LoadError::Instantiation {
					provider: self.name.clone(),
					message: fault.message().into(),
				})
			}
		}
	}
}

impl fmt::Debug for ProviderDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderDescriptor")
			.field("name", &self.name)
			.field("type", &self.ty.name())
			.field("strategy", &self.strategy)
			.finish()
	}
}
