//! Hook registry keyed by lifecycle and boundary.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::error::BoxError;

/// A lifecycle observed by hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Providers handed to the registrar.
    ProvidersRegistered,
    /// Providers finished their async boot.
    ProvidersBooted,
    /// Preload files executed.
    Preloading,
    /// Ace commands registered with the runner.
    RegisterCommands,
    /// HTTP server started listening.
    HttpServer,
}

impl Lifecycle {
    /// Name used in logs and hook files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::ProvidersRegistered => "providersRegistered",
            Lifecycle::ProvidersBooted => "providersBooted",
            Lifecycle::Preloading => "preloading",
            Lifecycle::RegisterCommands => "registerCommands",
            Lifecycle::HttpServer => "httpServer",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a lifecycle a hook is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Before,
    After,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::Before => "before",
            Boundary::After => "after",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zero-argument hook callback.
pub type Hook = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

/// A hook callback failed.
#[derive(Debug, Error)]
#[error("{boundary} {lifecycle} hook failed: {source}")]
pub struct HookError {
    pub lifecycle: Lifecycle,
    pub boundary: Boundary,
    #[source]
    pub source: BoxError,
}

/// Process-wide registry of lifecycle hooks.
///
/// Owned by the composition root and shared with the [`Ignitor`](crate::Ignitor)
/// through an `Arc`. The ignitor only reads it.
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<HashMap<(Lifecycle, Boundary), Vec<Hook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to run before `lifecycle`.
    pub fn before<F>(&self, lifecycle: Lifecycle, callback: F) -> &Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.register(lifecycle, Boundary::Before, callback)
    }

    /// Register a callback to run after `lifecycle`.
    pub fn after<F>(&self, lifecycle: Lifecycle, callback: F) -> &Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.register(lifecycle, Boundary::After, callback)
    }

    /// Register a callback for an explicit boundary.
    pub fn register<F>(&self, lifecycle: Lifecycle, boundary: Boundary, callback: F) -> &Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((lifecycle, boundary))
            .or_default()
            .push(Arc::new(callback));
        self
    }

    /// Number of callbacks bound to a lifecycle boundary.
    pub fn len(&self, lifecycle: Lifecycle, boundary: Boundary) -> usize {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(lifecycle, boundary))
            .map_or(0, Vec::len)
    }

    /// Run every callback bound to `(lifecycle, boundary)` in registration order.
    ///
    /// Stops at the first failing callback.
    pub fn fire(&self, lifecycle: Lifecycle, boundary: Boundary) -> Result<(), HookError> {
        let hooks: Vec<Hook> = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(lifecycle, boundary))
            .cloned()
            .unwrap_or_default();

        if hooks.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            lifecycle = %lifecycle,
            boundary = %boundary,
            count = hooks.len(),
            "Firing hooks"
        );

        for hook in hooks {
            hook().map_err(|source| HookError {
                lifecycle,
                boundary,
                source,
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_map();
        for ((lifecycle, boundary), callbacks) in hooks.iter() {
            map.entry(&format_args!("{boundary} {lifecycle}"), &callbacks.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_fire_runs_in_registration_order() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            registry.before(Lifecycle::Preloading, move || {
                calls.lock().unwrap().push(name);
                Ok(())
            });
        }

        registry.fire(Lifecycle::Preloading, Boundary::Before).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_fire_without_hooks_is_noop() {
        let registry = HookRegistry::new();
        assert!(registry.fire(Lifecycle::HttpServer, Boundary::After).is_ok());
        assert_eq!(registry.len(Lifecycle::HttpServer, Boundary::After), 0);
    }

    #[test]
    fn test_boundaries_are_separate() {
        let registry = HookRegistry::new();
        let calls = Arc::new(Mutex::new(0));
        let c = calls.clone();
        registry.after(Lifecycle::ProvidersBooted, move || {
            *c.lock().unwrap() += 1;
            Ok(())
        });

        registry.fire(Lifecycle::ProvidersBooted, Boundary::Before).unwrap();
        assert_eq!(*calls.lock().unwrap(), 0);

        registry.fire(Lifecycle::ProvidersBooted, Boundary::After).unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_failing_hook_stops_the_chain() {
        let registry = HookRegistry::new();
        let reached = Arc::new(Mutex::new(false));
        let r = reached.clone();

        registry
            .before(Lifecycle::RegisterCommands, || Err("boom".into()))
            .before(Lifecycle::RegisterCommands, move || {
                *r.lock().unwrap() = true;
                Ok(())
            });

        let err = registry
            .fire(Lifecycle::RegisterCommands, Boundary::Before)
            .unwrap_err();
        assert_eq!(err.lifecycle, Lifecycle::RegisterCommands);
        assert_eq!(err.boundary, Boundary::Before);
        assert_eq!(err.source.to_string(), "boom");
        assert!(!*reached.lock().unwrap());
    }

    #[test]
    fn test_hook_may_register_another_hook() {
        let registry = Arc::new(HookRegistry::new());
        let inner = registry.clone();
        registry.before(Lifecycle::Preloading, move || {
            inner.after(Lifecycle::Preloading, || Ok(()));
            Ok(())
        });

        registry.fire(Lifecycle::Preloading, Boundary::Before).unwrap();
        assert_eq!(registry.len(Lifecycle::Preloading, Boundary::After), 1);
    }
}
