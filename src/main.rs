//! ignitor binary.
//!
//! Boots the built-in welcome application found at `--root`:
//!
//! ```text
//! ignitor --root ./blog boot            run the boot pipeline and exit
//! ignitor --root ./blog serve           boot, then serve HTTP on HOST:PORT
//! ignitor --root ./blog ace paths       boot in commands mode, run `paths`
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{http::HeaderMap, routing::get, Json};
use clap::{ArgMatches, Parser, Subcommand};
use serde_json::{json, Value};

use ignitor::ace::{AceKernel, Command, CommandCatalog, CommandError};
use ignitor::config::loader::load_server_config;
use ignitor::config::{ProcessEnv, ServerConfig};
use ignitor::container::{
    ExceptionHandlers, Helpers, NamespaceResolver, ServiceContainer, HELPERS_ALIAS,
};
use ignitor::http::request_id;
use ignitor::lifecycle::ignitor::DEFAULT_APP_FILE;
use ignitor::modules::ModuleTable;
use ignitor::observability::logging::{self, LogFormat};
use ignitor::providers::{ProviderCatalog, ProviderRegistrar};
use ignitor::{BootDependencies, BoxError, HookRegistry, HttpServer, Ignitor, IgnitorError};

#[derive(Parser)]
#[command(name = "ignitor")]
#[command(about = "Boot, serve or run commands for an ignitor application", long_about = None)]
struct Cli {
    /// Application root (directory holding Cargo.toml and start/).
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Application file, relative to the root.
    #[arg(long, default_value = DEFAULT_APP_FILE)]
    app_file: String,

    /// HTTP server settings (TOML).
    #[arg(long)]
    server_config: Option<PathBuf>,

    /// Emit JSON logs.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the boot pipeline and exit
    Boot,
    /// Boot and serve HTTP on HOST:PORT
    Serve,
    /// Boot in commands mode and run one command
    Ace {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Prints the application folders.
struct PathsCommand {
    container: Arc<ServiceContainer>,
}

#[async_trait]
impl Command for PathsCommand {
    fn signature(&self) -> clap::Command {
        clap::Command::new("paths").about("Print application folders")
    }

    async fn handle(&self, _matches: &ArgMatches) -> Result<(), BoxError> {
        let helpers = self
            .container
            .make::<Helpers>(HELPERS_ALIAS)
            .ok_or("helpers are not registered")?;
        println!("root       {}", helpers.app_root().display());
        println!("public     {}", helpers.public_path("").display());
        println!("config     {}", helpers.config_path("").display());
        println!("start      {}", helpers.start_path("").display());
        println!("views      {}", helpers.views_path("").display());
        println!("migrations {}", helpers.migrations_path("").display());
        println!("seeds      {}", helpers.seeds_path("").display());
        println!("tmp        {}", helpers.tmp_path("").display());
        Ok(())
    }
}

async fn welcome(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "message": "Welcome to ignitor",
        "request_id": request_id(&headers),
    }))
}

async fn health() -> &'static str {
    "ok"
}

fn welcome_modules(root: &Path, server: Arc<HttpServer>) -> ModuleTable {
    ModuleTable::new(root).module("start/routes", move || {
        server.routes(|router| {
            router
                .route("/", get(welcome))
                .route("/health", get(health))
        });
        Ok(())
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init(format)?;

    tracing::info!("ignitor v{} starting", env!("CARGO_PKG_VERSION"));

    let root = cli.root.canonicalize()?;
    let server_config = match &cli.server_config {
        Some(path) => load_server_config(path)?,
        None => ServerConfig::default(),
    };

    let container = Arc::new(ServiceContainer::new());
    let server = Arc::new(HttpServer::new(server_config));

    let ace_args: Vec<String> = match &cli.command {
        Commands::Ace { args } => std::iter::once("ace".to_string())
            .chain(args.iter().cloned())
            .collect(),
        _ => vec!["ace".to_string()],
    };
    let commands = CommandCatalog::new().command(
        "Ignitor/Commands/Paths",
        PathsCommand {
            container: container.clone(),
        },
    );

    let deps = BootDependencies {
        resolver: Arc::new(NamespaceResolver::new()),
        container: container.clone(),
        registrar: Arc::new(ProviderRegistrar::new(
            container.clone(),
            ProviderCatalog::new(),
        )),
        loader: Arc::new(welcome_modules(&root, server.clone())),
        exceptions: Arc::new(ExceptionHandlers::new()),
        env: Arc::new(ProcessEnv),
        server,
        commands: Arc::new(AceKernel::new(commands, ace_args)),
        hooks: Arc::new(HookRegistry::new()),
    };

    let mut ignitor = Ignitor::new(deps);
    ignitor.app_root(&root).app_file(cli.app_file.clone());

    match cli.command {
        Commands::Boot => ignitor.fire().await?,
        Commands::Serve => ignitor.fire_http_server(None).await?,
        Commands::Ace { .. } => match ignitor.fire_ace().await {
            Err(IgnitorError::Command(CommandError::Usage(err))) => err.exit(),
            result => result?,
        },
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
