//! Catalog-backed provider registrar.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::future::try_join_all;
use indexmap::IndexMap;

use crate::container::Container;
use crate::providers::{ProviderError, Registrar, ServiceProvider};

/// Providers available to an application, by name.
#[derive(Clone, Default)]
pub struct ProviderCatalog {
    providers: IndexMap<String, Arc<dyn ServiceProvider>>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, name: &str, provider: impl ServiceProvider + 'static) -> Self {
        self.providers.insert(name.to_string(), Arc::new(provider));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ServiceProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

impl fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

type Active = Vec<(String, Arc<dyn ServiceProvider>)>;

/// Registers providers from a [`ProviderCatalog`] into a container.
pub struct ProviderRegistrar {
    container: Arc<dyn Container>,
    catalog: ProviderCatalog,
    pending: Mutex<Vec<String>>,
    active: Mutex<Active>,
}

impl ProviderRegistrar {
    pub fn new(container: Arc<dyn Container>, catalog: ProviderCatalog) -> Self {
        Self {
            container,
            catalog,
            pending: Mutex::new(Vec::new()),
            active: Mutex::new(Vec::new()),
        }
    }

    /// Names of providers that went through `register`, in order.
    pub fn registered(&self) -> Vec<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl Registrar for ProviderRegistrar {
    fn set_providers(&self, providers: Vec<String>) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = providers;
    }

    fn register(&self) -> Result<(), ProviderError> {
        let names = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let provider = self
                .catalog
                .get(&name)
                .ok_or_else(|| ProviderError::Unknown { name: name.clone() })?;
            resolved.push((name, provider));
        }

        for (name, provider) in &resolved {
            provider
                .register(self.container.as_ref())
                .map_err(|source| ProviderError::Register {
                    name: name.clone(),
                    source,
                })?;
            tracing::debug!(provider = %name, "Provider registered");
        }

        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = resolved;
        Ok(())
    }

    async fn boot(&self) -> Result<(), ProviderError> {
        let active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let container = self.container.as_ref();

        try_join_all(active.iter().map(|(name, provider)| async move {
            provider
                .boot(container)
                .await
                .map_err(|source| ProviderError::Boot {
                    name: name.clone(),
                    source,
                })?;
            tracing::debug!(provider = %name, "Provider booted");
            Ok::<_, ProviderError>(())
        }))
        .await?;
        Ok(())
    }
}

impl fmt::Debug for ProviderRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistrar")
            .field("catalog", &self.catalog)
            .field("registered", &self.registered())
            .finish()
    }
}
