//! Service provider subsystem.
//!
//! # Data Flow
//! ```text
//! start/app.toml providers (+ ace_providers in commands mode)
//!     → Registrar::set_providers(ordered names)
//!     → Registrar::register()   each provider binds services, in order
//!     → Registrar::boot()       all providers boot, awaited as one unit
//! ```
//!
//! # Design Decisions
//! - Providers are looked up by name in a catalog linked into the binary
//! - Unknown provider names fail registration instead of being skipped
//! - Boot runs concurrently; the first failure wins

pub mod registrar;

use async_trait::async_trait;
use thiserror::Error;

use crate::container::Container;
use crate::error::BoxError;

pub use registrar::{ProviderCatalog, ProviderRegistrar};

/// A unit of application startup logic.
#[async_trait]
pub trait ServiceProvider: Send + Sync {
    /// Declare services on the container.
    fn register(&self, _container: &dyn Container) -> Result<(), BoxError> {
        Ok(())
    }

    /// Initialise services once every provider has registered.
    async fn boot(&self, _container: &dyn Container) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Hands providers to the container and boots them.
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Replace the ordered provider list.
    fn set_providers(&self, providers: Vec<String>);

    /// Run `register` on every provider, in order.
    fn register(&self) -> Result<(), ProviderError>;

    /// Boot every registered provider.
    async fn boot(&self) -> Result<(), ProviderError>;
}

/// Error raised while registering or booting providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {name}")]
    Unknown { name: String },

    #[error("provider {name} failed to register: {source}")]
    Register {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("provider {name} failed to boot: {source}")]
    Boot {
        name: String,
        #[source]
        source: BoxError,
    },
}
