//! # Registry Infrastructure
//!
//! Runtime registration and capability-based discovery of provider factories.
//!
//! ## Overview
//!
//! Independently developed factories register themselves with a
//! `ProviderRegistry` at startup (or whenever they appear) and are found later
//! by the identifiers they advertise or by how confident they are about a
//! given input. Resolvers never mutate the registry; they work on snapshots.
//!
//! ## Available Components
//!
//! - **ProviderRegistry**: Ordered factory set with an identifier index
//! - **ScoredResolver**: Identifier lookup and best-score probe selection
//! - **ChainResolver**: Removal-based chained enrichment of a subject
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── factory               (RegisteredFactory / ProviderFactory / EnrichmentFactory)
//! ├── ProviderRegistry      (Registration, identity removal, index cache)
//! ├── ScoredResolver        (Identifier & probe resolution)
//! └── ChainResolver         (Progressive enrichment)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use capability_registry::registry::{
//!     DynProviderFactory, ProviderFactory, ProviderRegistry, RegisteredFactory, ScoredResolver,
//! };
//! use capability_registry::CreationError;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct ZipIdentifierFactory;
//!
//! impl RegisteredFactory for ZipIdentifierFactory {
//!     fn factory_name(&self) -> &str {
//!         "zip"
//!     }
//! }
//!
//! impl ProviderFactory for ZipIdentifierFactory {
//!     type Probe = str;
//!     type Provider = &'static str;
//!
//!     fn supports(&self, file_name: &str) -> Option<f64> {
//!         file_name.ends_with(".zip").then_some(0.9)
//!     }
//!
//!     fn create(&self, _identifier: &str) -> Result<&'static str, CreationError> {
//!         Ok("zip identifier")
//!     }
//!
//!     fn create_for_probe(&self, _file_name: &str) -> Result<&'static str, CreationError> {
//!         Ok("zip identifier")
//!     }
//! }
//!
//! let registry: Arc<ProviderRegistry<DynProviderFactory<str, &'static str>>> =
//!     Arc::new(ProviderRegistry::new("identifiers"));
//! registry.register(Arc::new(ZipIdentifierFactory));
//!
//! let resolver = ScoredResolver::new(Arc::clone(&registry));
//! assert_eq!(resolver.resolve_by_probe(Some("book.zip")).unwrap(), Some("zip identifier"));
//! assert_eq!(resolver.resolve_by_probe(Some("book.xml")).unwrap(), None);
//! ```

pub mod chain_resolver;
pub mod factory;
pub mod provider_registry;
pub mod scored_resolver;

// Re-export main types for easy access
pub use chain_resolver::{ChainOutcome, ChainResolver};
pub use factory::{
    DynEnrichmentFactory, DynProviderFactory, EnrichmentFactory, ProviderFactory,
    RegisteredFactory,
};
pub use provider_registry::{ProviderRegistry, RegistryStats};
pub use scored_resolver::{ScoredCandidate, ScoredResolver};
