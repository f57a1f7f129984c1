#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Capability Registry
//!
//! Pluggable provider registry and resolution engine.
//!
//! ## Overview
//!
//! Providers (validators, file identifiers, metadata enrichers) are built by
//! factories that register at runtime and are discovered by capability rather
//! than by static reference. A conversion pipeline can pick up new
//! identification or validation logic without the core knowing about it.
//!
//! ## Key Features
//!
//! - **Concurrent registration**: register and unregister from any thread
//! - **Identifier lookup**: cached index that survives concurrent removal
//! - **Confidence scoring**: the most confident factory builds the provider
//! - **Chained enrichment**: each factory refines a subject at most once per run
//!
//! ## Module Organization
//!
//! - [`registry`] - Factory contracts, the registry and both resolvers
//! - [`config`] - Resolution policy and logging configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use capability_registry::config::RegistryConfig;
//! use capability_registry::logging::init_structured_logging;
//! use capability_registry::registry::{DynProviderFactory, ProviderRegistry, ScoredResolver};
//! use std::sync::Arc;
//!
//! # fn main() -> capability_registry::Result<()> {
//! let config = RegistryConfig::load()?;
//! init_structured_logging(&config.logging);
//!
//! let registry: Arc<ProviderRegistry<DynProviderFactory<str, String>>> =
//!     Arc::new(ProviderRegistry::new("validators"));
//! let resolver = ScoredResolver::new(Arc::clone(&registry)).with_options(config.resolution);
//!
//! // Factories register as they are discovered...
//! let validator = resolver.resolve_by_identifier("application/x-pef+xml")?;
//! println!("found validator: {}", validator.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Unit tests live beside each module; registry invariants, concurrency and
//! configuration loading are covered under `tests/`.

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use config::{CreationFailurePolicy, RegistryConfig, ResolutionOptions, TieBreak};
pub use error::{CreationError, RegistryError, Result, StepError, StepFailures};
pub use registry::{
    ChainOutcome, ChainResolver, EnrichmentFactory, ProviderFactory, ProviderRegistry,
    RegisteredFactory, RegistryStats, ScoredResolver,
};
