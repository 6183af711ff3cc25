//! Default container implementation.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::container::{Container, Factory, Service};

struct Singleton {
    factory: Factory,
    instance: OnceLock<Service>,
}

/// Thread-safe container of lazily built singletons.
#[derive(Default)]
pub struct ServiceContainer {
    bindings: DashMap<String, Arc<Singleton>>,
    aliases: DashMap<String, String>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` (or the binding it aliases) is bound.
    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains_key(&self.resolve_alias(name))
    }

    /// Binding name an alias points to, or `name` itself.
    pub fn resolve_alias(&self, name: &str) -> String {
        self.aliases
            .get(name)
            .map(|target| target.value().clone())
            .unwrap_or_else(|| name.to_string())
    }

    /// Resolve and downcast in one step.
    pub fn make<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.lookup(name)?.downcast::<T>().ok()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Container for ServiceContainer {
    fn singleton(&self, name: &str, factory: Factory) {
        tracing::debug!(binding = name, "Binding singleton");
        self.bindings.insert(
            name.to_string(),
            Arc::new(Singleton {
                factory,
                instance: OnceLock::new(),
            }),
        );
    }

    fn alias(&self, name: &str, alias: &str) {
        tracing::debug!(binding = name, alias = alias, "Defining alias");
        self.aliases.insert(alias.to_string(), name.to_string());
    }

    fn lookup(&self, name: &str) -> Option<Service> {
        let name = self.resolve_alias(name);
        // Clone out of the map so the factory runs without holding a shard lock.
        let binding = self.bindings.get(&name)?.value().clone();
        Some(
            binding
                .instance
                .get_or_init(|| (binding.factory)(self))
                .clone(),
        )
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("bindings", &self.bindings.len())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}
