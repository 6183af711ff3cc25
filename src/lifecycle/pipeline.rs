//! The ordered boot phases.
//!
//! # Phases
//! ```text
//! package → autoload → helpers → hooks file → register providers
//!     → boot providers → aliases → exception handler → preload
//!     → register commands (commands mode only)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential; the provider boot is the only await point
//! - Any failure aborts the boot; collaborators clean up after themselves
//! - The preload list is only borrowed, so firing never reorders it

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::loader::{load_app_metadata, load_package};
use crate::config::{AppMetadata, Directories, PackageMetadata, APP_DIRECTORIES};
use crate::container::{
    factory, Helpers, BASE_EXCEPTION_HANDLER, HELPERS_ALIAS, HELPERS_BINDING, WILDCARD,
};
use crate::error::{IgnitorError, IgnitorResult};
use crate::hooks::{Boundary, Lifecycle};
use crate::lifecycle::ignitor::BootDependencies;
use crate::lifecycle::preload::PreloadList;
use crate::modules::LoadError;

/// Optional file expected to populate the hook registry.
pub const HOOKS_FILE: &str = "start/hooks";

/// Application exception handler, relative to the autoload directory.
pub const EXCEPTION_HANDLER_FILE: &str = "Exceptions/Handler";

/// A boot phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    LoadPackage,
    Autoload,
    RegisterHelpers,
    LoadHooks,
    RegisterProviders,
    BootProviders,
    DefineAliases,
    ExceptionHandler,
    Preload,
    RegisterCommands,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::LoadPackage => "loadPackage",
            Phase::Autoload => "autoload",
            Phase::RegisterHelpers => "registerHelpers",
            Phase::LoadHooks => "loadHooks",
            Phase::RegisterProviders => "registerProviders",
            Phase::BootProviders => "bootProviders",
            Phase::DefineAliases => "defineAliases",
            Phase::ExceptionHandler => "exceptionHandler",
            Phase::Preload => "preload",
            Phase::RegisterCommands => "registerCommands",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a completed pipeline leaves behind.
#[derive(Debug, Clone)]
pub struct BootOutcome {
    pub package: PackageMetadata,
    pub namespace: String,
}

/// One run of the boot phases against a set of collaborators.
pub(crate) struct Pipeline<'a> {
    pub deps: &'a BootDependencies,
    pub root: &'a Path,
    pub app_file: PathBuf,
    pub preload: &'a PreloadList,
    pub load_commands: bool,
}

impl Pipeline<'_> {
    pub async fn run(self) -> IgnitorResult<BootOutcome> {
        let package = self.load_package()?;
        let (namespace, autoload_dir) = self.setup_resolver(&package);
        self.register_helpers();
        self.load_hooks_file()?;
        self.register_providers()?;
        self.boot_providers().await?;
        self.define_aliases()?;
        self.setup_exception_handler(&namespace, &autoload_dir)?;
        self.preload_files()?;
        if self.load_commands {
            self.register_commands()?;
        }
        Ok(BootOutcome { package, namespace })
    }

    fn load_package(&self) -> IgnitorResult<PackageMetadata> {
        let package = load_package(self.root)?;
        tracing::info!(
            phase = %Phase::LoadPackage,
            package = %package.name,
            version = package.version.as_deref().unwrap_or("-"),
            "Package metadata loaded"
        );
        Ok(package)
    }

    /// Returns the namespace and the absolute autoload directory.
    fn setup_resolver(&self, package: &PackageMetadata) -> (String, PathBuf) {
        if package.autoload.is_empty() {
            tracing::warn!(
                phase = %Phase::Autoload,
                package = %package.name,
                "No autoload mapping declared, using defaults"
            );
        }
        let (namespace, dir) = package.autoload_namespace();
        let autoload_dir = self.root.join(dir.trim_start_matches("./"));

        let resolver = &self.deps.resolver;
        resolver.set_namespace(namespace);
        resolver.set_autoload_root(&autoload_dir, namespace);
        resolver.set_directories(APP_DIRECTORIES);

        tracing::info!(
            phase = %Phase::Autoload,
            namespace = namespace,
            directory = %autoload_dir.display(),
            "Autoload configured"
        );
        (namespace.to_string(), autoload_dir)
    }

    fn register_helpers(&self) {
        let root = self.root.to_path_buf();
        let container = &self.deps.container;
        container.singleton(
            HELPERS_BINDING,
            factory(move |_| Arc::new(Helpers::new(root.clone(), Directories::default()))),
        );
        container.alias(HELPERS_BINDING, HELPERS_ALIAS);
        tracing::debug!(
            phase = %Phase::RegisterHelpers,
            binding = HELPERS_BINDING,
            "Helpers registered"
        );
    }

    fn load_hooks_file(&self) -> IgnitorResult<()> {
        match self.deps.loader.load(&self.root.join(HOOKS_FILE)) {
            Ok(()) => {
                tracing::debug!(phase = %Phase::LoadHooks, "Hooks file loaded");
                Ok(())
            }
            Err(LoadError::NotFound { .. }) => {
                tracing::debug!(phase = %Phase::LoadHooks, "No hooks file");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn app_metadata(&self) -> IgnitorResult<AppMetadata> {
        Ok(load_app_metadata(&self.app_file)?)
    }

    fn fire(&self, lifecycle: Lifecycle, boundary: Boundary) -> IgnitorResult<()> {
        Ok(self.deps.hooks.fire(lifecycle, boundary)?)
    }

    fn register_providers(&self) -> IgnitorResult<()> {
        self.fire(Lifecycle::ProvidersRegistered, Boundary::Before)?;

        let providers = self.app_metadata()?.provider_list(self.load_commands);
        tracing::info!(
            phase = %Phase::RegisterProviders,
            count = providers.len(),
            ace = self.load_commands,
            "Registering providers"
        );
        let registrar = &self.deps.registrar;
        registrar.set_providers(providers);
        registrar.register()?;

        self.fire(Lifecycle::ProvidersRegistered, Boundary::After)
    }

    async fn boot_providers(&self) -> IgnitorResult<()> {
        self.fire(Lifecycle::ProvidersBooted, Boundary::Before)?;
        tracing::info!(phase = %Phase::BootProviders, "Booting providers");
        self.deps.registrar.boot().await?;
        self.fire(Lifecycle::ProvidersBooted, Boundary::After)
    }

    fn define_aliases(&self) -> IgnitorResult<()> {
        let aliases = self
            .app_metadata()?
            .aliases
            .ok_or_else(|| IgnitorError::MissingAliases {
                path: self.app_file.clone(),
            })?;

        for (alias, binding) in &aliases {
            self.deps.container.alias(binding, alias);
        }
        tracing::info!(phase = %Phase::DefineAliases, count = aliases.len(), "Aliases defined");
        Ok(())
    }

    fn setup_exception_handler(&self, namespace: &str, autoload_dir: &Path) -> IgnitorResult<()> {
        let path = autoload_dir.join(EXCEPTION_HANDLER_FILE);
        let handler = match self.deps.loader.load(&path) {
            Ok(()) => format!("{namespace}/{EXCEPTION_HANDLER_FILE}"),
            Err(LoadError::NotFound { .. }) => BASE_EXCEPTION_HANDLER.to_string(),
            Err(e) => return Err(e.into()),
        };
        self.deps.exceptions.bind(WILDCARD, &handler);
        tracing::info!(
            phase = %Phase::ExceptionHandler,
            handler = %handler,
            "Exception handler bound"
        );
        Ok(())
    }

    fn preload_files(&self) -> IgnitorResult<()> {
        self.fire(Lifecycle::Preloading, Boundary::Before)?;

        for entry in self.preload {
            match self.deps.loader.load(&self.root.join(&entry.path)) {
                Ok(()) => tracing::debug!(phase = %Phase::Preload, file = %entry.path, "Preloaded"),
                Err(LoadError::NotFound { .. }) if entry.optional => {
                    tracing::debug!(
                        phase = %Phase::Preload,
                        file = %entry.path,
                        "Optional preload missing"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        tracing::info!(phase = %Phase::Preload, files = self.preload.len(), "Preload complete");

        self.fire(Lifecycle::Preloading, Boundary::After)
    }

    fn register_commands(&self) -> IgnitorResult<()> {
        self.fire(Lifecycle::RegisterCommands, Boundary::Before)?;

        let commands = self.app_metadata()?.commands;
        tracing::info!(
            phase = %Phase::RegisterCommands,
            count = commands.len(),
            "Registering commands"
        );
        self.deps.commands.register(&commands)?;

        self.fire(Lifecycle::RegisterCommands, Boundary::After)
    }
}
