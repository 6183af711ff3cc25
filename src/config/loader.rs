//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::schema::{AppMetadata, Manifest, PackageMetadata, ServerConfig};

/// Manifest file read from the application root.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{} has no [package] table", path.display())]
    MissingPackage { path: PathBuf },
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load package metadata from `<root>/Cargo.toml`.
pub fn load_package(app_root: &Path) -> Result<PackageMetadata, ConfigError> {
    let path = app_root.join(MANIFEST_FILE);
    let manifest: Manifest = read_toml(&path)?;
    let package = manifest
        .package
        .ok_or(ConfigError::MissingPackage { path })?;
    Ok(package.into())
}

/// Resolve the application file identifier to a path under `app_root`.
///
/// `.toml` is appended when the identifier carries no extension.
pub fn app_file_path(app_root: &Path, app_file: &str) -> PathBuf {
    let path = app_root.join(app_file);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("toml")
    }
}

/// Load the application file. Every call re-reads the file.
pub fn load_app_metadata(path: &Path) -> Result<AppMetadata, ConfigError> {
    read_toml(path)
}

/// Load HTTP server settings from a TOML file.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    read_toml(path)
}
