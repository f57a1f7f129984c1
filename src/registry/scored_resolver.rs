//! # Scored Resolver
//!
//! Picks a provider either by identifier or by asking every registered
//! factory how confident it is about a probe.
//!
//! ## Resolution Flow
//!
//! ```text
//! identifier ──► registry.lookup() ──► factory.create(identifier)
//!
//! probe ──► snapshot ──► supports(probe) per factory ──► best score
//!                                                          │
//!                                            factory.create_for_probe(probe)
//! ```
//!
//! Only the single best factory is asked to create a provider. If it fails,
//! the failure is handled by the configured [`CreationFailurePolicy`]; the
//! runner-up is never tried.

use super::factory::ProviderFactory;
use super::provider_registry::ProviderRegistry;
use crate::config::{CreationFailurePolicy, ResolutionOptions, TieBreak};
use crate::error::CreationError;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// The factory chosen for a probe and the score it reported.
pub struct ScoredCandidate<F: ?Sized> {
    pub factory: Arc<F>,
    pub score: f64,
}

impl<F: ?Sized> Clone for ScoredCandidate<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            score: self.score,
        }
    }
}

impl<F: ?Sized + fmt::Debug> fmt::Debug for ScoredCandidate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoredCandidate")
            .field("factory", &self.factory)
            .field("score", &self.score)
            .finish()
    }
}

/// Resolves providers from a shared [`ProviderRegistry`].
///
/// ## Thread Safety
///
/// `ScoredResolver` only holds an `Arc` to the registry and a copy of its
/// options, so it is `Send + Sync` whenever the registry is. Every call works
/// on its own snapshot.
pub struct ScoredResolver<F: ?Sized> {
    registry: Arc<ProviderRegistry<F>>,
    options: ResolutionOptions,
}

impl<F: ?Sized + ProviderFactory> ScoredResolver<F> {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry<F>>) -> Self {
        Self {
            registry,
            options: ResolutionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ResolutionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> ResolutionOptions {
        self.options
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry<F>> {
        &self.registry
    }

    /// Create a provider from the factory that claimed `identifier`.
    ///
    /// Returns `Ok(None)` when nobody claimed the identifier.
    #[instrument(skip(self), fields(registry = %self.registry.name()))]
    pub fn resolve_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<F::Provider>, CreationError> {
        let Some(factory) = self.registry.lookup(identifier) else {
            debug!(identifier = %identifier, "No factory registered for identifier");
            return Ok(None);
        };

        match factory.create(identifier) {
            Ok(provider) => {
                debug!(
                    factory = factory.factory_name(),
                    identifier = %identifier,
                    "Created provider for identifier"
                );
                Ok(Some(provider))
            }
            Err(error) => self.handle_creation_failure(error),
        }
    }

    /// Create a provider from the factory most confident about `probe`.
    ///
    /// An absent probe resolves to `Ok(None)` without consulting any factory.
    #[instrument(
        skip(self, probe),
        fields(registry = %self.registry.name(), has_probe = probe.is_some())
    )]
    pub fn resolve_by_probe(
        &self,
        probe: Option<&F::Probe>,
    ) -> Result<Option<F::Provider>, CreationError> {
        let Some(probe) = probe else {
            return Ok(None);
        };

        let Some(candidate) = self.select(probe) else {
            debug!("No factory reported support for probe");
            return Ok(None);
        };

        match candidate.factory.create_for_probe(probe) {
            Ok(provider) => {
                debug!(
                    factory = candidate.factory.factory_name(),
                    score = candidate.score,
                    "Created provider for probe"
                );
                Ok(Some(provider))
            }
            Err(error) => self.handle_creation_failure(error),
        }
    }

    /// Score every registered factory once and return the best one.
    ///
    /// Factories reporting "not applicable" or a NaN score are skipped. Ties
    /// go to the earliest or latest registration depending on
    /// [`ResolutionOptions::tie_break`].
    pub fn select(&self, probe: &F::Probe) -> Option<ScoredCandidate<F>> {
        let mut best: Option<ScoredCandidate<F>> = None;

        for factory in self.registry.snapshot() {
            let score = match factory.supports(probe) {
                Some(score) if !score.is_nan() => score,
                _ => {
                    trace!(
                        factory = factory.factory_name(),
                        "Factory does not support probe"
                    );
                    continue;
                }
            };

            trace!(factory = factory.factory_name(), score, "Factory scored probe");

            let replaces = match &best {
                None => true,
                Some(current) => match self.options.tie_break {
                    TieBreak::FirstRegistered => score > current.score,
                    TieBreak::LastRegistered => score >= current.score,
                },
            };

            if replaces {
                best = Some(ScoredCandidate { factory, score });
            }
        }

        best
    }

    fn handle_creation_failure(
        &self,
        error: CreationError,
    ) -> Result<Option<F::Provider>, CreationError> {
        match self.options.creation_failure {
            CreationFailurePolicy::Propagate => Err(error),
            CreationFailurePolicy::LogAndSkip => {
                warn!(
                    factory = %error.factory,
                    target = %error.target,
                    reason = %error.reason,
                    "Provider creation failed, reporting no provider"
                );
                Ok(None)
            }
        }
    }
}

impl<F: ?Sized> fmt::Debug for ScoredResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoredResolver")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}
