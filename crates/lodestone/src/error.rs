//! Error taxonomy for discovery, resolution and instantiation.
//!
//! Every variant is local to one pulled element except [`LoadError::Capability`],
//! which is raised once at engine construction. Errors are `Clone` because the
//! engine caches per-item failures and replays them on re-drains.

/// Why a listing line failed the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxFault {
	/// The line still contains a space or tab after trimming.
	#[error("embedded whitespace in provider name")]
	EmbeddedWhitespace,
	/// First code point is not a valid identifier start.
	#[error("invalid identifier start")]
	BadIdentifierStart,
	/// A later code point is neither identifier-continue nor `.`.
	#[error("invalid identifier character")]
	BadIdentifierPart,
}

/// Why a discovered provider name could not be resolved to a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFault {
	#[error("provider type not found")]
	NotFound,
	#[error("provider type is not public")]
	NotPublic,
	#[error("provider type is not a subtype of the contract")]
	NotAssignable,
	#[error("no public zero-argument constructor")]
	NoDefaultConstructor,
	#[error("more than one factory method")]
	AmbiguousFactory,
	#[error("factory return type is not assignable to the contract")]
	FactoryReturnNotAssignable,
}

/// Everything the engine can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
	/// A malformed listing line. Drops the whole resource's contribution.
	#[error("{resource}:{line}: {fault}")]
	Syntax { resource: Box<str>, line: u32, fault: SyntaxFault },

	/// The listing resource could not be opened or read. Same blast radius
	/// as [`LoadError::Syntax`].
	#[error("failed to read listing {resource}: {message}")]
	ResourceIo { resource: Box<str>, message: Box<str> },

	/// A discovered name failed to resolve; surfaced at the pull that would
	/// have yielded it, then traversal continues.
	#[error("provider `{provider}`: {fault}")]
	Resolution { provider: Box<str>, fault: ResolutionFault },

	/// Factory/constructor failed, or the factory produced no value. Only
	/// the instantiating mode raises this.
	#[error("provider `{provider}` failed to instantiate: {message}")]
	Instantiation { provider: Box<str>, message: Box<str> },

	/// The engine was reloaded after this handle was obtained.
	#[error("traversal handle invalidated by reload (held generation {observed}, engine at {current})")]
	StaleTraversal { observed: u64, current: u64 },

	/// The caller's scope may not search for this contract. Fatal to engine
	/// construction.
	#[error("scope may not search for contract `{contract}`")]
	Capability { contract: Box<str> },
}

impl LoadError {
	pub(crate) fn resolution(provider: &str, fault: ResolutionFault) -> Self {
		Self::Resolution { provider: provider.into(), fault }
	}

	/// True for the reload-invalidation error.
	pub fn is_stale(&self) -> bool {
		matches!(self, Self::StaleTraversal { .. })
	}
}
