//! Resolution of a discovered provider name into a [`ProviderDescriptor`].
//!
//! The factory convention is only honored for names that came out of a
//! structured registry declaration; listing-file names must satisfy the
//! constructor path. That asymmetry is deliberate and load-bearing: a listing
//! can be planted anywhere, so it never gets to pick an instantiation
//! strategy the contract's registry did not sanction.

use crate::core::{Contract, Host, InstantiationStrategy, ProviderDescriptor, ScopeId};
use crate::error::{LoadError, ResolutionFault};

/// Resolves `name` against the host, selecting the instantiation strategy.
/// No instantiation happens here.
pub(crate) fn resolve_provider<H: Host + ?Sized>(
	host: &H,
	contract: &Contract,
	scope: Option<ScopeId>,
	name: &str,
	factory_allowed: bool,
) -> Result<ProviderDescriptor, LoadError> {
	let ty = host
		.resolve_type(name, scope)
		.ok_or_else(|| LoadError::resolution(name, ResolutionFault::NotFound))?;

	if !host.is_public(&*ty) {
		return Err(LoadError::resolution(name, ResolutionFault::NotPublic));
	}

	if factory_allowed {
		let mut factories = ty.factories();
		match factories.len() {
			// No factory: fall through to the constructor path.
			0 => {}
			1 => {
				let factory = factories.remove(0);
				let assignable = host
					.resolve_type(&factory.returns, scope)
					.is_some_and(|ret| host.is_assignable(&*ret, contract));
				if !assignable {
					return Err(LoadError::resolution(name, ResolutionFault::FactoryReturnNotAssignable));
				}
				tracing::trace!(provider = name, returns = %factory.returns, "resolved via factory");
				return Ok(ProviderDescriptor::new(name, ty, InstantiationStrategy::Factory(factory)));
			}
			_ => return Err(LoadError::resolution(name, ResolutionFault::AmbiguousFactory)),
		}
	}

	if !host.is_assignable(&*ty, contract) {
		return Err(LoadError::resolution(name, ResolutionFault::NotAssignable));
	}
	if !ty.has_default_constructor() {
		return Err(LoadError::resolution(name, ResolutionFault::NoDefaultConstructor));
	}

	tracing::trace!(provider = name, "resolved via constructor");
	Ok(ProviderDescriptor::new(name, ty, InstantiationStrategy::Constructor))
}
