//! # Provider Registry
//!
//! Thread-safe set of provider factories with an identifier-keyed cache.
//!
//! ## Overview
//!
//! A `ProviderRegistry` keeps factories in registration order and maintains a
//! derived `identifier -> factory` index for fast lookup. The ordered list is
//! the source of truth; the index is a cache that every removal discards and
//! the next lookup or registration rebuilds.
//!
//! ## Key Features
//!
//! - **Last registration wins** when two factories claim the same identifier
//! - **Identity-based removal** (`Arc::ptr_eq`), so value-equal duplicates are
//!   tracked independently
//! - **Lock-free factory calls**: identifiers are captured once at
//!   registration, so no factory code runs under the registry lock
//! - **Snapshots** for resolvers that need to iterate without holding the lock
//!
//! ## Usage
//!
//! ```rust
//! use capability_registry::registry::{ProviderRegistry, RegisteredFactory};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct DtbookValidatorFactory;
//!
//! impl RegisteredFactory for DtbookValidatorFactory {
//!     fn factory_name(&self) -> &str {
//!         "dtbook-validator"
//!     }
//!
//!     fn identifiers(&self) -> Vec<String> {
//!         vec!["application/x-dtbook+xml".to_string()]
//!     }
//! }
//!
//! let registry: ProviderRegistry<dyn RegisteredFactory> = ProviderRegistry::new("validators");
//! let factory: Arc<dyn RegisteredFactory> = Arc::new(DtbookValidatorFactory);
//! registry.register(Arc::clone(&factory));
//!
//! assert!(registry.lookup("application/x-dtbook+xml").is_some());
//! assert!(registry.unregister(&factory));
//! assert!(registry.lookup("application/x-dtbook+xml").is_none());
//! ```

use super::factory::RegisteredFactory;
use crate::logging::log_registry_operation;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A registered factory together with the name and identifiers it reported
/// at registration time.
struct Registration<F: ?Sized> {
    factory: Arc<F>,
    name: String,
    identifiers: Vec<String>,
}

struct RegistryState<F: ?Sized> {
    providers: Vec<Registration<F>>,
    index: HashMap<String, Arc<F>>,
}

impl<F: ?Sized> RegistryState<F> {
    fn new() -> Self {
        Self {
            providers: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// An empty index over a non-empty provider list has not been built yet
    /// (or was discarded by a removal).
    fn is_stale(&self) -> bool {
        self.index.is_empty() && !self.providers.is_empty()
    }

    /// Name recorded for the most recent registration of `factory`.
    fn registered_name(&self, factory: &Arc<F>) -> &str {
        self.providers
            .iter()
            .rev()
            .find(|registration| Arc::ptr_eq(&registration.factory, factory))
            .map_or("<unregistered>", |registration| registration.name.as_str())
    }

    fn rebuild_if_stale(&mut self, registry: &str) {
        if !self.is_stale() {
            return;
        }

        for registration in &self.providers {
            for identifier in &registration.identifiers {
                self.index
                    .insert(identifier.clone(), Arc::clone(&registration.factory));
            }
        }

        debug!(
            registry = %registry,
            factories = self.providers.len(),
            identifiers = self.index.len(),
            "Rebuilt identifier index"
        );
    }
}

/// Statistics about a registry's current state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub registry: String,
    pub factory_count: usize,
    /// Entries currently held by the identifier index. Zero right after a
    /// removal until the next lookup or registration rebuilds it.
    pub cached_identifiers: usize,
    pub advertised_identifiers: usize,
    pub factory_names: Vec<String>,
}

/// Registry of provider factories keyed by advertised identifiers.
pub struct ProviderRegistry<F: ?Sized> {
    name: String,
    state: Mutex<RegistryState<F>>,
}

impl<F: ?Sized + RegisteredFactory> ProviderRegistry<F> {
    /// Create an empty registry. The name only appears in logs and stats.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(RegistryState::new()),
        }
    }

    /// Create a registry pre-populated with `factories`, in iteration order.
    pub fn from_factories<I>(name: impl Into<String>, factories: I) -> Self
    where
        I: IntoIterator<Item = Arc<F>>,
    {
        let registry = Self::new(name);
        for factory in factories {
            registry.register(factory);
        }
        registry
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a factory.
    ///
    /// Duplicate registrations of the same handle are kept as separate
    /// entries. Each advertised identifier now maps to this factory, replacing
    /// any earlier claim.
    pub fn register(&self, factory: Arc<F>) {
        let identifiers = factory.identifiers();
        let factory_name = factory.factory_name().to_string();
        let claimed = identifiers.len();

        {
            let mut state = self.state.lock();
            state.rebuild_if_stale(&self.name);
            for identifier in &identifiers {
                let previous = state
                    .index
                    .insert(identifier.clone(), Arc::clone(&factory));
                if let Some(previous) = previous {
                    trace!(
                        registry = %self.name,
                        identifier = %identifier,
                        previous = %state.registered_name(&previous),
                        replacement = %factory_name,
                        "Identifier claimed by a newer registration"
                    );
                }
            }
            state.providers.push(Registration {
                factory,
                name: factory_name.clone(),
                identifiers,
            });
        }

        let details = format!("{claimed} identifier(s)");
        log_registry_operation(
            "register",
            &self.name,
            Some(&factory_name),
            "success",
            Some(&details),
        );
    }

    /// Remove the first registration of this exact handle.
    ///
    /// Returns `false` when the handle was not registered. The identifier
    /// index is discarded either way.
    pub fn unregister(&self, factory: &Arc<F>) -> bool {
        let removed = {
            let mut state = self.state.lock();
            let position = state
                .providers
                .iter()
                .position(|registration| Arc::ptr_eq(&registration.factory, factory));
            let removed = position.map(|position| state.providers.remove(position));
            state.index.clear();
            removed
        };

        let status = if removed.is_some() { "success" } else { "not_registered" };
        log_registry_operation(
            "unregister",
            &self.name,
            Some(factory.factory_name()),
            status,
            None,
        );
        removed.is_some()
    }

    /// Find the factory that most recently claimed `identifier`.
    pub fn lookup(&self, identifier: &str) -> Option<Arc<F>> {
        if identifier.is_empty() {
            return None;
        }

        let mut state = self.state.lock();
        state.rebuild_if_stale(&self.name);
        let found = state.index.get(identifier).cloned();

        trace!(
            registry = %self.name,
            identifier = %identifier,
            found = found.is_some(),
            "Identifier lookup"
        );
        found
    }

    /// Union of identifiers advertised by the registered factories.
    ///
    /// Computed from the provider list, so it is correct even while the
    /// index is stale.
    pub fn list_identifiers(&self) -> BTreeSet<String> {
        let state = self.state.lock();
        state
            .providers
            .iter()
            .flat_map(|registration| registration.identifiers.iter().cloned())
            .collect()
    }

    /// Copy of the registered factories in registration order.
    pub fn snapshot(&self) -> Vec<Arc<F>> {
        let state = self.state.lock();
        state
            .providers
            .iter()
            .map(|registration| Arc::clone(&registration.factory))
            .collect()
    }

    /// Number of registrations, duplicates included.
    pub fn len(&self) -> usize {
        self.state.lock().providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().providers.is_empty()
    }

    /// Whether this exact handle is registered.
    pub fn contains(&self, factory: &Arc<F>) -> bool {
        self.state
            .lock()
            .providers
            .iter()
            .any(|registration| Arc::ptr_eq(&registration.factory, factory))
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        let state = self.state.lock();
        let advertised: BTreeSet<&str> = state
            .providers
            .iter()
            .flat_map(|registration| registration.identifiers.iter().map(String::as_str))
            .collect();

        RegistryStats {
            registry: self.name.clone(),
            factory_count: state.providers.len(),
            cached_identifiers: state.index.len(),
            advertised_identifiers: advertised.len(),
            factory_names: state
                .providers
                .iter()
                .map(|registration| registration.name.clone())
                .collect(),
        }
    }
}

impl<F: ?Sized> fmt::Debug for ProviderRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ProviderRegistry")
            .field("name", &self.name)
            .field("factory_count", &state.providers.len())
            .field("cached_identifiers", &state.index.len())
            .finish()
    }
}
