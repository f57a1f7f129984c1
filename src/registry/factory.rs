//! # Provider Factory Contracts
//!
//! Traits implemented by externally supplied factories.
//!
//! ## The Three Contracts
//!
//! | Trait | Purpose | Consumed by |
//! |-------|---------|-------------|
//! | `RegisteredFactory` | Name and advertised identifiers | `ProviderRegistry` |
//! | `ProviderFactory` | Confidence scoring and provider creation | `ScoredResolver` |
//! | `EnrichmentFactory` | Acceptance test and subject transform | `ChainResolver` |
//!
//! The registry never constructs factories. Discovery code builds them and
//! hands them over as `Arc`s; the registry tracks them by pointer identity.
//!
//! ## Example: Validator Factory
//!
//! ```rust
//! use capability_registry::registry::{ProviderFactory, RegisteredFactory};
//! use capability_registry::CreationError;
//!
//! #[derive(Debug)]
//! struct PefValidatorFactory;
//!
//! #[derive(Debug)]
//! struct PefValidator;
//!
//! impl RegisteredFactory for PefValidatorFactory {
//!     fn factory_name(&self) -> &str {
//!         "pef-validator"
//!     }
//!
//!     fn identifiers(&self) -> Vec<String> {
//!         vec!["application/x-pef+xml".to_string(), "pef".to_string()]
//!     }
//! }
//!
//! impl ProviderFactory for PefValidatorFactory {
//!     type Probe = str;
//!     type Provider = PefValidator;
//!
//!     fn supports(&self, extension: &str) -> Option<f64> {
//!         (extension == "pef").then_some(0.8)
//!     }
//!
//!     fn create(&self, _identifier: &str) -> Result<PefValidator, CreationError> {
//!         Ok(PefValidator)
//!     }
//!
//!     fn create_for_probe(&self, _extension: &str) -> Result<PefValidator, CreationError> {
//!         Ok(PefValidator)
//!     }
//! }
//! ```

use crate::error::{CreationError, StepError};
use std::fmt;

/// Common surface of every factory that can live in a [`super::ProviderRegistry`].
///
/// All factories must be `Send + Sync` since registries are shared across
/// threads.
pub trait RegisteredFactory: Send + Sync + fmt::Debug {
    /// Factory name for logging and diagnostics.
    fn factory_name(&self) -> &str;

    /// Identifiers this factory claims to handle.
    ///
    /// Read once when the factory is registered. Factories that are only
    /// reachable through probe scoring or chain acceptance may return an
    /// empty list (the default).
    fn identifiers(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Factory that builds providers on request, either for a fixed identifier or
/// for an arbitrary probe it has scored.
pub trait ProviderFactory: RegisteredFactory {
    /// Input used to ask "can you handle this?"
    type Probe: ?Sized;

    /// The provider instance handed back to callers.
    type Provider;

    /// Confidence that this factory can handle `probe`.
    ///
    /// `None` means "not applicable". Higher scores win. The default
    /// implementation reports every probe as not applicable.
    fn supports(&self, probe: &Self::Probe) -> Option<f64> {
        let _ = probe;
        None
    }

    /// Create a provider for one of the advertised identifiers.
    fn create(&self, identifier: &str) -> Result<Self::Provider, CreationError>;

    /// Create a provider for a probe previously scored by [`Self::supports`].
    fn create_for_probe(&self, probe: &Self::Probe) -> Result<Self::Provider, CreationError> {
        let _ = probe;
        Err(CreationError::new(
            self.factory_name(),
            "<probe>",
            "probe-based creation is not supported by this factory",
        ))
    }
}

/// Factory that contributes one transformation step to a chained enrichment.
pub trait EnrichmentFactory: RegisteredFactory {
    /// The value being progressively refined.
    type Subject;

    /// Whether this factory wants to process the subject in its current state.
    fn accepts(&self, subject: &Self::Subject) -> bool;

    /// Produce the next state of the subject.
    ///
    /// On failure the caller keeps the previous state, so implementations
    /// never need to roll anything back.
    fn enrich(&self, subject: &Self::Subject) -> Result<Self::Subject, StepError>;
}

/// Trait object for a provider factory with fixed probe and provider types.
pub type DynProviderFactory<P, T> = dyn ProviderFactory<Probe = P, Provider = T>;

/// Trait object for an enrichment factory over subject type `S`.
pub type DynEnrichmentFactory<S> = dyn EnrichmentFactory<Subject = S>;
