//! Ace command subsystem.
//!
//! # Data Flow
//! ```text
//! start/app.toml commands
//!     → CommandRunner::register(names)    resolved against the CommandCatalog
//!     → CommandRunner::invoke(package)    clap command named after the package
//!     → argv parsed, matching Command::handle awaited
//! ```
//!
//! # Design Decisions
//! - Commands describe their arguments with the clap builder API
//! - Help and version requests print and succeed; parse errors are `CommandError::Usage`

pub mod kernel;

use async_trait::async_trait;
use clap::ArgMatches;
use thiserror::Error;

use crate::config::PackageMetadata;
use crate::error::BoxError;

pub use kernel::{AceKernel, CommandCatalog};

/// A command-line task.
#[async_trait]
pub trait Command: Send + Sync {
    /// Name, arguments and help text.
    fn signature(&self) -> clap::Command;

    /// Run the command with parsed arguments.
    async fn handle(&self, matches: &ArgMatches) -> Result<(), BoxError>;
}

/// Registers and runs commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    fn register(&self, commands: &[String]) -> Result<(), CommandError>;

    async fn invoke(&self, package: &PackageMetadata) -> Result<(), CommandError>;
}

/// Error registering or running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {name}")]
    Unknown { name: String },

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("failed to write command output: {0}")]
    Output(#[from] std::io::Error),

    #[error("command {name} failed: {source}")]
    Failed {
        name: String,
        #[source]
        source: BoxError,
    },
}
