//! Boot entry points.
//!
//! # Responsibilities
//! - Collect configuration (root, app file, preload list, commands mode)
//! - Run the boot pipeline exactly once
//! - Run the mode-specific tail after a successful boot
//!
//! # Design Decisions
//! - Firing takes `&mut self`, so overlapping boots of one ignitor cannot compile
//! - A second fire is rejected instead of re-running the pipeline
//! - The root is checked before any collaborator is touched

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::ace::CommandRunner;
use crate::config::loader::app_file_path;
use crate::config::{Env, PackageMetadata};
use crate::container::{Container, ExceptionBinder, Resolver};
use crate::error::{IgnitorError, IgnitorResult};
use crate::hooks::{Boundary, HookRegistry, Lifecycle};
use crate::http::Server;
use crate::lifecycle::pipeline::Pipeline;
use crate::lifecycle::preload::PreloadList;
use crate::modules::ModuleLoader;
use crate::providers::Registrar;

/// Application file used when none is configured.
pub const DEFAULT_APP_FILE: &str = "start/app";

/// Host used when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3333;

/// Collaborators the ignitor drives.
#[derive(Clone)]
pub struct BootDependencies {
    pub resolver: Arc<dyn Resolver>,
    pub container: Arc<dyn Container>,
    pub registrar: Arc<dyn Registrar>,
    pub loader: Arc<dyn ModuleLoader>,
    pub exceptions: Arc<dyn ExceptionBinder>,
    pub env: Arc<dyn Env>,
    pub server: Arc<dyn Server>,
    pub commands: Arc<dyn CommandRunner>,
    pub hooks: Arc<HookRegistry>,
}

impl fmt::Debug for BootDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootDependencies")
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Where an ignitor is in its single boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Idle,
    Booting,
    Booted,
    Failed,
}

/// Boots one application.
#[derive(Debug)]
pub struct Ignitor {
    deps: BootDependencies,
    app_root: Option<PathBuf>,
    app_file: String,
    preload: PreloadList,
    load_commands: bool,
    namespace: Option<String>,
    package: Option<PackageMetadata>,
    state: BootState,
}

impl Ignitor {
    pub fn new(deps: BootDependencies) -> Self {
        Self {
            deps,
            app_root: None,
            app_file: DEFAULT_APP_FILE.to_string(),
            preload: PreloadList::default(),
            load_commands: false,
            namespace: None,
            package: None,
            state: BootState::Idle,
        }
    }

    /// Set the application root. Required before firing.
    pub fn app_root(&mut self, root: impl Into<PathBuf>) -> &mut Self {
        self.app_root = Some(root.into());
        self
    }

    /// Set the application file, relative to the root. Defaults to `start/app`.
    pub fn app_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.app_file = file.into();
        self
    }

    /// Register ace providers and commands during boot.
    pub fn load_commands(&mut self) -> &mut Self {
        self.load_commands = true;
        self
    }

    /// Append a required preload file.
    pub fn preload(&mut self, path: impl Into<String>) -> &mut Self {
        self.preload.append(path);
        self
    }

    /// Insert a required preload file after `anchor`.
    pub fn preload_after(&mut self, anchor: &str, path: impl Into<String>) -> &mut Self {
        self.preload.insert_after(anchor, path);
        self
    }

    /// Insert a required preload file before `anchor`.
    pub fn preload_before(&mut self, anchor: &str, path: impl Into<String>) -> &mut Self {
        self.preload.insert_before(anchor, path);
        self
    }

    pub fn preload_list(&self) -> &PreloadList {
        &self.preload
    }

    pub fn root(&self) -> Option<&Path> {
        self.app_root.as_deref()
    }

    /// Namespace resolved by the autoload phase.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Package metadata loaded by the pipeline.
    pub fn package(&self) -> Option<&PackageMetadata> {
        self.package.as_ref()
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn commands_enabled(&self) -> bool {
        self.load_commands
    }

    pub fn hooks(&self) -> &Arc<HookRegistry> {
        &self.deps.hooks
    }

    /// Boot the application.
    pub async fn fire(&mut self) -> IgnitorResult<()> {
        let root = self.app_root.clone().ok_or(IgnitorError::MissingAppRoot)?;
        if self.state != BootState::Idle {
            return Err(IgnitorError::AlreadyFired);
        }
        self.state = BootState::Booting;

        tracing::info!(
            root = %root.display(),
            app_file = %self.app_file,
            commands = self.load_commands,
            "Firing application"
        );

        let pipeline = Pipeline {
            deps: &self.deps,
            root: &root,
            app_file: app_file_path(&root, &self.app_file),
            preload: &self.preload,
            load_commands: self.load_commands,
        };

        match pipeline.run().await {
            Ok(outcome) => {
                self.namespace = Some(outcome.namespace);
                self.package = Some(outcome.package);
                self.state = BootState::Booted;
                tracing::info!("Application booted");
                Ok(())
            }
            Err(e) => {
                self.state = BootState::Failed;
                tracing::error!(error = %e, "Application boot failed");
                Err(e)
            }
        }
    }

    /// Boot, then serve HTTP until the server stops.
    ///
    /// `listener` replaces the socket bound from `HOST`/`PORT`.
    pub async fn fire_http_server(&mut self, listener: Option<TcpListener>) -> IgnitorResult<()> {
        self.fire().await?;

        let hooks = self.deps.hooks.clone();
        hooks.fire(Lifecycle::HttpServer, Boundary::Before)?;

        let server = self.deps.server.clone();
        if let Some(listener) = listener {
            server.set_listener(listener);
        }

        let host = self
            .deps
            .env
            .get("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match self.deps.env.get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| IgnitorError::InvalidEnv {
                    key: "PORT",
                    value: raw.clone(),
                })?,
            None => DEFAULT_PORT,
        };

        let addr = server.listen(&host, port).await?;
        tracing::info!(address = %addr, "Serving application");
        hooks.fire(Lifecycle::HttpServer, Boundary::After)?;

        server.wait().await?;
        Ok(())
    }

    /// Boot in commands mode, then run the command named on the command line.
    pub async fn fire_ace(&mut self) -> IgnitorResult<()> {
        self.load_commands();
        self.fire().await?;

        let package = self.package.clone().unwrap_or_default();
        self.deps.commands.invoke(&package).await?;
        Ok(())
    }
}
