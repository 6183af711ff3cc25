//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! <root>/Cargo.toml   → loader.rs → PackageMetadata (name, version, autoload)
//! <root>/start/app.toml → loader.rs → AppMetadata (providers, aliases, commands)
//! directories.rs      → fixed folder tables for helpers and the resolver
//! env.rs              → HOST / PORT and other process values
//! ```
//!
//! # Design Decisions
//! - The application file is re-read by every phase that needs it
//! - A missing `aliases` table is kept distinct from an empty one
//! - All fields have defaults to allow minimal manifests

pub mod directories;
pub mod env;
pub mod loader;
pub mod schema;

pub use directories::{Directories, APP_DIRECTORIES};
pub use env::{Env, MapEnv, ProcessEnv};
pub use loader::ConfigError;
pub use schema::{AppMetadata, PackageMetadata, ServerConfig};
