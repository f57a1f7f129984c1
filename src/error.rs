//! Error types for the capability registry.
//!
//! Lookups that find nothing are not errors and surface as `None`. The types
//! here cover the three failure kinds that remain: a factory that accepted a
//! request but could not build a provider, an enrichment step that failed
//! mid-chain, and bad configuration.

use std::fmt;
use thiserror::Error;

/// A factory accepted an identifier or probe but failed to build a provider.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Factory '{factory}' failed to create provider for '{target}': {reason}")]
pub struct CreationError {
    /// Name of the factory that failed
    pub factory: String,
    /// The identifier (or a probe description) the provider was requested for
    pub target: String,
    /// Human-readable cause
    pub reason: String,
}

impl CreationError {
    /// Create a new creation error.
    #[must_use]
    pub fn new(
        factory: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            factory: factory.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// A factory accepted the current chain subject but its transform failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Enrichment step '{factory}' failed: {reason}")]
pub struct StepError {
    pub factory: String,
    pub reason: String,
}

impl StepError {
    #[must_use]
    pub fn new(factory: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            factory: factory.into(),
            reason: reason.into(),
        }
    }
}

/// Step failures collected during a single chain attempt.
///
/// Every accepted-but-failed step is recorded, not just the last one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepFailures {
    failures: Vec<StepError>,
}

impl StepFailures {
    pub fn push(&mut self, failure: StepError) {
        self.failures.push(failure);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepError> {
        self.failures.iter()
    }

    /// Names of the factories that failed, in the order they were tried.
    #[must_use]
    pub fn factory_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.factory.as_str()).collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<StepError> {
        self.failures
    }
}

impl fmt::Display for StepFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} step failure(s)", self.failures.len())?;
        for (position, failure) in self.failures.iter().enumerate() {
            let separator = if position == 0 { ": " } else { "; " };
            write!(f, "{separator}{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StepFailures {}

impl FromIterator<StepError> for StepFailures {
    fn from_iter<I: IntoIterator<Item = StepError>>(iter: I) -> Self {
        Self {
            failures: iter.into_iter().collect(),
        }
    }
}

/// Crate-level error for callers that want a single error type with `?`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Creation(#[from] CreationError),
    #[error("Enrichment exhausted: {0}")]
    EnrichmentExhausted(StepFailures),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<config::ConfigError> for RegistryError {
    fn from(error: config::ConfigError) -> Self {
        RegistryError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
