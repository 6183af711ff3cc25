//! Module loading subsystem.
//!
//! # Data Flow
//! ```text
//! Ignitor asks for <root>/start/routes
//!     → ModuleLoader::load(absolute path)
//!     → Ok(())                  module ran for its side effects
//!     → Err(LoadError::NotFound) nothing registered at that path
//!     → Err(LoadError::Failed)   module ran and failed
//! ```
//!
//! # Design Decisions
//! - Missing vs broken is a tagged error, never a string match
//! - Application start files are linked into the binary and registered by path

pub mod table;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::BoxError;

pub use table::{Module, ModuleTable};

/// Conventional source suffix of start files.
pub const SOURCE_EXTENSION: &str = "rs";

/// Error loading a module.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No module exists at the path.
    #[error("module not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The module exists but failed while running.
    #[error("module {} failed: {source}", path.display())]
    Failed {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

/// Loads application modules by absolute path.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<(), LoadError>;
}

/// Strip the conventional `.rs` suffix from an identifier.
pub fn strip_source_extension(identifier: &str) -> &str {
    identifier
        .strip_suffix(SOURCE_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(identifier)
}
