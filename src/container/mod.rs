//! Dependency-injection subsystem.
//!
//! # Data Flow
//! ```text
//! Providers / Ignitor
//!     → Container::singleton(name, factory)   lazily built on first lookup
//!     → Container::alias(name, alias)         short names from start/app.toml
//!     → Container::lookup(name | alias)       Arc<dyn Any>
//!     → make::<T>()                           typed handle
//!
//! Resolver   → namespace + folder table for the application's own code
//! Helpers    → application paths, registered as a singleton during boot
//! Exceptions → catch-all handler binding
//! ```
//!
//! # Design Decisions
//! - Services are `Arc<dyn Any + Send + Sync>`; typing happens at the call site
//! - Singletons are built outside map locks so factories may look up other services

pub mod exceptions;
pub mod helpers;
pub mod resolver;
pub mod services;

use std::any::Any;
use std::sync::Arc;

pub use exceptions::{ExceptionBinder, ExceptionHandlers, BASE_EXCEPTION_HANDLER, WILDCARD};
pub use helpers::{Helpers, HELPERS_ALIAS, HELPERS_BINDING};
pub use resolver::{NamespaceResolver, Resolver};
pub use services::ServiceContainer;

/// A resolved service.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Builds a singleton the first time it is looked up.
pub type Factory = Box<dyn Fn(&dyn Container) -> Service + Send + Sync>;

/// The container contract the ignitor and providers rely on.
pub trait Container: Send + Sync {
    /// Bind `name` to a lazily constructed singleton.
    fn singleton(&self, name: &str, factory: Factory);

    /// Make `alias` resolve to the binding `name`.
    fn alias(&self, name: &str, alias: &str);

    /// Resolve a binding or alias.
    fn lookup(&self, name: &str) -> Option<Service>;
}

/// Wrap a typed constructor into a [`Factory`].
pub fn factory<T, F>(build: F) -> Factory
where
    T: Any + Send + Sync,
    F: Fn(&dyn Container) -> Arc<T> + Send + Sync + 'static,
{
    Box::new(move |container: &dyn Container| -> Service { build(container) })
}

impl<'a> dyn Container + 'a {
    /// Resolve a binding and downcast it to `T`.
    pub fn make<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.lookup(name)?.downcast::<T>().ok()
    }
}
