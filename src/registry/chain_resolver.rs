//! # Chain Resolver
//!
//! Progressively refines a subject by letting each registered enrichment
//! factory contribute at most once.
//!
//! ## Resolution Flow
//!
//! ```text
//!          ┌──────────────────────────────────────────┐
//!          │                                          │
//! subject ─▼─► scan candidates in registration order  │
//!              │                                      │
//!              ├─ accepts? no ──► next candidate      │
//!              ├─ enrich fails ─► record, next        │
//!              └─ enrich ok ────► replace subject, ───┘
//!                                 drop factory from candidates
//!
//! scan finds nothing ─► return current subject
//! ```
//!
//! Failures only matter for the attempt that ended the run. Earlier attempts
//! that eventually advanced discard theirs.

use super::factory::EnrichmentFactory;
use super::provider_registry::ProviderRegistry;
use crate::error::{RegistryError, StepError, StepFailures};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Result of a chain run with the bookkeeping `enrich` throws away.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome<S> {
    /// The last successfully produced subject (or the initial one).
    pub subject: S,
    /// Names of the factories that were applied, in application order.
    pub applied: Vec<String>,
    /// Failures recorded by the final, exhausted attempt.
    pub last_failures: StepFailures,
}

impl<S> ChainOutcome<S> {
    /// Whether any factory changed the subject.
    #[must_use]
    pub fn was_enriched(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Treat an exhausted run whose final attempt only produced failures as
    /// an error.
    ///
    /// A run that ended because nobody accepted the subject is still `Ok`.
    pub fn into_result(self) -> Result<S, RegistryError> {
        if self.last_failures.is_empty() {
            Ok(self.subject)
        } else {
            Err(RegistryError::EnrichmentExhausted(self.last_failures))
        }
    }
}

/// Runs chained enrichment over a shared [`ProviderRegistry`].
pub struct ChainResolver<F: ?Sized> {
    registry: Arc<ProviderRegistry<F>>,
}

impl<F: ?Sized + EnrichmentFactory> ChainResolver<F> {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry<F>>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry<F>> {
        &self.registry
    }

    /// Enrich `initial` until no remaining factory accepts and succeeds.
    ///
    /// Never fails: step failures are logged and the best subject reached so
    /// far is returned.
    pub fn enrich(&self, initial: F::Subject) -> F::Subject {
        self.enrich_with_report(initial).subject
    }

    /// Like [`Self::enrich`], but also reports which factories applied and
    /// what went wrong in the final attempt.
    #[instrument(skip(self, initial), fields(registry = %self.registry.name()))]
    pub fn enrich_with_report(&self, initial: F::Subject) -> ChainOutcome<F::Subject> {
        let mut candidates = Self::distinct(self.registry.snapshot());
        let mut subject = initial;
        let mut applied = Vec::new();

        loop {
            let (advanced, failures) = Self::attempt(&candidates, &subject);

            match advanced {
                Some((position, next)) => {
                    let factory = candidates.remove(position);
                    trace!(
                        factory = factory.factory_name(),
                        discarded_failures = failures.len(),
                        "Enrichment step applied"
                    );
                    applied.push(factory.factory_name().to_string());
                    subject = next;
                }
                None => {
                    if !failures.is_empty() {
                        debug!(
                            failed = ?failures.factory_names(),
                            "Enrichment stopped after failed steps: {}",
                            failures
                        );
                    }
                    debug!(
                        applied = applied.len(),
                        remaining = candidates.len(),
                        "Enrichment chain exhausted"
                    );
                    return ChainOutcome {
                        subject,
                        applied,
                        last_failures: failures,
                    };
                }
            }
        }
    }

    /// Drop repeat registrations of the same handle, keeping the first.
    fn distinct(snapshot: Vec<Arc<F>>) -> Vec<Arc<F>> {
        let mut candidates: Vec<Arc<F>> = Vec::with_capacity(snapshot.len());
        for factory in snapshot {
            if !candidates.iter().any(|seen| Arc::ptr_eq(seen, &factory)) {
                candidates.push(factory);
            }
        }
        candidates
    }

    /// One scan over the candidates. Returns the position and output of the
    /// first factory that accepted and succeeded, plus the failures seen
    /// before it.
    fn attempt(
        candidates: &[Arc<F>],
        subject: &F::Subject,
    ) -> (Option<(usize, F::Subject)>, StepFailures) {
        let mut failures = StepFailures::default();

        for (position, factory) in candidates.iter().enumerate() {
            if !factory.accepts(subject) {
                continue;
            }

            match factory.enrich(subject) {
                Ok(next) => return (Some((position, next)), failures),
                Err(error) => {
                    trace!(
                        factory = factory.factory_name(),
                        reason = %error.reason,
                        "Enrichment step failed"
                    );
                    failures.push(Self::attributed(factory.as_ref(), error));
                }
            }
        }

        (None, failures)
    }

    /// Make sure a step failure names the factory that produced it.
    fn attributed(factory: &F, error: StepError) -> StepError {
        if error.factory.is_empty() {
            StepError::new(factory.factory_name(), error.reason)
        } else {
            error
        }
    }
}

impl<F: ?Sized> fmt::Debug for ChainResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainResolver")
            .field("registry", &self.registry)
            .finish()
    }
}
