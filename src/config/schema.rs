//! Configuration schema definitions.
//!
//! Three documents feed a boot:
//! - the package manifest (`Cargo.toml`, `[package.metadata.ignitor]` table)
//! - the application file (`start/app.toml`) listing providers, aliases and commands
//! - optional HTTP server settings
//!
//! All types derive Serde traits for deserialization from TOML.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Namespace used when the manifest declares no autoload mapping.
pub const DEFAULT_NAMESPACE: &str = "App";

/// Source directory used when the manifest declares no autoload mapping.
pub const DEFAULT_AUTOLOAD_DIR: &str = "./app";

/// Package metadata read from the application's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PackageMetadata {
    /// Package name.
    pub name: String,

    /// Package version, when declared as a plain string.
    pub version: Option<String>,

    /// Package description.
    pub description: Option<String>,

    /// Autoload mappings (namespace → directory) in declaration order.
    pub autoload: IndexMap<String, String>,
}

impl PackageMetadata {
    /// The first declared autoload mapping, or `App` → `./app`.
    pub fn autoload_namespace(&self) -> (&str, &str) {
        self.autoload
            .first()
            .map(|(namespace, dir)| (namespace.as_str(), dir.as_str()))
            .unwrap_or((DEFAULT_NAMESPACE, DEFAULT_AUTOLOAD_DIR))
    }
}

/// Raw `Cargo.toml` shape. Only the fields the ignitor reads.
#[derive(Debug, Deserialize)]
pub(crate) struct Manifest {
    pub package: Option<ManifestPackage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ManifestPackage {
    pub name: String,

    /// Either `"1.0.0"` or `{ workspace = true }`.
    #[serde(default)]
    pub version: Option<toml::Value>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub metadata: ManifestMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ManifestMetadata {
    #[serde(default)]
    pub ignitor: IgnitorSection,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IgnitorSection {
    #[serde(default)]
    pub autoload: IndexMap<String, String>,
}

impl From<ManifestPackage> for PackageMetadata {
    fn from(package: ManifestPackage) -> Self {
        Self {
            name: package.name,
            version: package
                .version
                .and_then(|v| v.as_str().map(str::to_string)),
            description: package.description,
            autoload: package.metadata.ignitor.autoload,
        }
    }
}

/// Application file: providers, aliases and commands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AppMetadata {
    /// Providers registered on every boot.
    #[serde(default)]
    pub providers: Vec<String>,

    /// Providers registered only when commands are loaded.
    #[serde(default)]
    pub ace_providers: Vec<String>,

    /// Alias → binding name. `None` when the file omits the table.
    #[serde(default)]
    pub aliases: Option<IndexMap<String, String>>,

    /// Commands handed to the command runner.
    #[serde(default)]
    pub commands: Vec<String>,
}

impl AppMetadata {
    /// Providers to register, with ace providers appended when `with_ace` is set.
    pub fn provider_list(&self, with_ace: bool) -> Vec<String> {
        let mut providers = self.providers.clone();
        if with_ace {
            providers.extend(self.ace_providers.iter().cloned());
        }
        providers
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}
