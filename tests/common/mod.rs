//! Shared fixtures for boot integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clap::ArgMatches;
use tempfile::TempDir;

use ignitor::ace::{AceKernel, Command, CommandCatalog};
use ignitor::config::{MapEnv, ServerConfig};
use ignitor::container::{
    factory, Container, ExceptionHandlers, NamespaceResolver, ServiceContainer,
};
use ignitor::modules::ModuleTable;
use ignitor::providers::{ProviderCatalog, ProviderRegistrar, ServiceProvider};
use ignitor::{BootDependencies, Boundary, BoxError, HookRegistry, HttpServer, Ignitor, Lifecycle};

pub const MINIMAL_MANIFEST: &str = r#"
[package]
name = "blog"
version = "0.1.0"
"#;

pub const MINIMAL_APP: &str = r#"
providers = []

[aliases]
"#;

/// Ordered log of what happened during a boot.
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<String>>>);

impl Events {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.all().iter().position(|e| e == event)
    }

    pub fn contains(&self, event: &str) -> bool {
        self.position(event).is_some()
    }

    pub fn count(&self, event: &str) -> usize {
        self.all().iter().filter(|e| *e == event).count()
    }
}

/// Provider that logs its register and boot steps.
pub struct RecordingProvider {
    pub name: &'static str,
    pub events: Events,
}

#[async_trait]
impl ServiceProvider for RecordingProvider {
    fn register(&self, container: &dyn Container) -> Result<(), BoxError> {
        self.events.push(format!("register:{}", self.name));
        let name = self.name.to_string();
        container.singleton(
            &format!("App/{}", self.name),
            factory(move |_| Arc::new(name.clone())),
        );
        Ok(())
    }

    async fn boot(&self, _container: &dyn Container) -> Result<(), BoxError> {
        tokio::task::yield_now().await;
        self.events.push(format!("boot:{}", self.name));
        Ok(())
    }
}

/// Provider whose boot always fails.
pub struct FailingProvider;

#[async_trait]
impl ServiceProvider for FailingProvider {
    async fn boot(&self, _container: &dyn Container) -> Result<(), BoxError> {
        Err("connection refused".into())
    }
}

/// Command that logs its positional argument.
pub struct GreetCommand {
    pub events: Events,
}

#[async_trait]
impl Command for GreetCommand {
    fn signature(&self) -> clap::Command {
        clap::Command::new("greet").arg(clap::Arg::new("name").required(true))
    }

    async fn handle(&self, matches: &ArgMatches) -> Result<(), BoxError> {
        let name = matches.get_one::<String>("name").cloned().unwrap_or_default();
        self.events.push(format!("greet:{name}"));
        Ok(())
    }
}

/// An application root on disk plus the collaborators to boot it.
pub struct Fixture {
    pub dir: TempDir,
    pub events: Events,
    pub hooks: Arc<HookRegistry>,
    pub container: Arc<ServiceContainer>,
    pub resolver: Arc<NamespaceResolver>,
    pub exceptions: Arc<ExceptionHandlers>,
    pub server: Arc<HttpServer>,
    pub modules: ModuleTable,
    pub providers: ProviderCatalog,
    pub commands: CommandCatalog,
    pub args: Vec<String>,
    pub env: MapEnv,
}

impl Fixture {
    /// Minimal application: manifest, empty app file, a routes module.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let modules = ModuleTable::new(dir.path());
        let mut fixture = Self {
            dir,
            events: Events::default(),
            hooks: Arc::new(HookRegistry::new()),
            container: Arc::new(ServiceContainer::new()),
            resolver: Arc::new(NamespaceResolver::new()),
            exceptions: Arc::new(ExceptionHandlers::new()),
            server: Arc::new(HttpServer::new(ServerConfig::default())),
            modules,
            providers: ProviderCatalog::new(),
            commands: CommandCatalog::new(),
            args: vec!["ace".to_string()],
            env: MapEnv::new(),
        };
        fixture.write("Cargo.toml", MINIMAL_MANIFEST);
        fixture.write("start/app.toml", MINIMAL_APP);
        fixture.recording_module("start/routes");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Module that logs `load:<path>` when run.
    pub fn recording_module(&mut self, path: &str) {
        let events = self.events.clone();
        let label = format!("load:{path}");
        self.modules.insert(path, move || {
            events.push(label.clone());
            Ok(())
        });
    }

    /// Module that fails when run.
    pub fn failing_module(&mut self, path: &str) {
        let message = format!("{path} is broken");
        self.modules.insert(path, move || Err(message.clone().into()));
    }

    /// Log `<boundary>:<lifecycle>` for every lifecycle boundary.
    pub fn record_all_hooks(&self) {
        for lifecycle in [
            Lifecycle::ProvidersRegistered,
            Lifecycle::ProvidersBooted,
            Lifecycle::Preloading,
            Lifecycle::RegisterCommands,
            Lifecycle::HttpServer,
        ] {
            for boundary in [Boundary::Before, Boundary::After] {
                let events = self.events.clone();
                self.hooks.register(lifecycle, boundary, move || {
                    events.push(format!("{boundary}:{lifecycle}"));
                    Ok(())
                });
            }
        }
    }

    pub fn recording_provider(&mut self, name: &'static str) {
        let provider = RecordingProvider {
            name,
            events: self.events.clone(),
        };
        self.providers = std::mem::take(&mut self.providers)
            .provider(&format!("App/Providers/{name}"), provider);
    }

    pub fn greet_command(&mut self) {
        let command = GreetCommand {
            events: self.events.clone(),
        };
        self.commands =
            std::mem::take(&mut self.commands).command("App/Commands/Greet", command);
    }

    /// Wire the collaborators. The returned ignitor has no root set.
    pub fn harness(&self) -> Harness {
        let registrar = Arc::new(ProviderRegistrar::new(
            self.container.clone(),
            self.providers.clone(),
        ));
        let kernel = Arc::new(AceKernel::new(self.commands.clone(), self.args.clone()));
        let deps = BootDependencies {
            resolver: self.resolver.clone(),
            container: self.container.clone(),
            registrar: registrar.clone(),
            loader: Arc::new(self.modules.clone()),
            exceptions: self.exceptions.clone(),
            env: Arc::new(self.env.clone()),
            server: self.server.clone(),
            commands: kernel.clone(),
            hooks: self.hooks.clone(),
        };
        Harness {
            ignitor: Ignitor::new(deps),
            registrar,
            kernel,
        }
    }

    /// Harness with the application root set.
    pub fn ignitor(&self) -> Harness {
        let mut harness = self.harness();
        harness.ignitor.app_root(self.root());
        harness
    }
}

pub struct Harness {
    pub ignitor: Ignitor,
    pub registrar: Arc<ProviderRegistrar>,
    pub kernel: Arc<AceKernel>,
}
