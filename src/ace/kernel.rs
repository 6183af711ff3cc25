//! Catalog-backed command runner.

use std::ffi::OsString;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use clap::error::ErrorKind;
use indexmap::IndexMap;

use crate::ace::{Command, CommandError, CommandRunner};
use crate::config::PackageMetadata;

/// Commands available to an application, by name.
#[derive(Clone, Default)]
pub struct CommandCatalog {
    commands: IndexMap<String, Arc<dyn Command>>,
}

impl CommandCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, name: &str, command: impl Command + 'static) -> Self {
        self.commands.insert(name.to_string(), Arc::new(command));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }
}

impl fmt::Debug for CommandCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.keys()).finish()
    }
}

/// Runs one command per process from the given argv.
pub struct AceKernel {
    catalog: CommandCatalog,
    args: Vec<OsString>,
    registered: Mutex<Vec<(String, Arc<dyn Command>)>>,
}

impl AceKernel {
    /// `args` is a full argv, binary name first.
    pub fn new<I, T>(catalog: CommandCatalog, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            catalog,
            args: args.into_iter().map(Into::into).collect(),
            registered: Mutex::new(Vec::new()),
        }
    }

    /// Names passed to `register`, in order.
    pub fn registered(&self) -> Vec<String> {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn cli(
        &self,
        package: &PackageMetadata,
        commands: &[(String, Arc<dyn Command>)],
    ) -> clap::Command {
        let name = if package.name.is_empty() {
            "ace".to_string()
        } else {
            package.name.clone()
        };
        let mut cli = clap::Command::new(name)
            .subcommand_required(true)
            .arg_required_else_help(true);
        if let Some(version) = &package.version {
            cli = cli.version(version.clone());
        }
        if let Some(about) = &package.description {
            cli = cli.about(about.clone());
        }
        for (_, command) in commands {
            cli = cli.subcommand(command.signature());
        }
        cli
    }
}

/// Help and version requests are output, not failures.
fn is_display(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

#[async_trait]
impl CommandRunner for AceKernel {
    fn register(&self, commands: &[String]) -> Result<(), CommandError> {
        let mut resolved = Vec::with_capacity(commands.len());
        for name in commands {
            let command = self
                .catalog
                .get(name)
                .ok_or_else(|| CommandError::Unknown { name: name.clone() })?;
            resolved.push((name.clone(), command));
        }
        tracing::debug!(count = resolved.len(), "Commands registered");
        *self.registered.lock().unwrap_or_else(PoisonError::into_inner) = resolved;
        Ok(())
    }

    async fn invoke(&self, package: &PackageMetadata) -> Result<(), CommandError> {
        let commands = self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let matches = match self.cli(package, &commands).try_get_matches_from(&self.args) {
            Ok(matches) => matches,
            Err(err) if is_display(err.kind()) => {
                err.print()?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let Some((sub, sub_matches)) = matches.subcommand() else {
            return Err(CommandError::Unknown {
                name: String::new(),
            });
        };

        let (id, command) = commands
            .iter()
            .find(|(_, command)| command.signature().get_name() == sub)
            .ok_or_else(|| CommandError::Unknown {
                name: sub.to_string(),
            })?;

        tracing::info!(command = sub, id = %id, "Running command");
        command
            .handle(sub_matches)
            .await
            .map_err(|source| CommandError::Failed {
                name: sub.to_string(),
                source,
            })
    }
}

impl fmt::Debug for AceKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AceKernel")
            .field("catalog", &self.catalog)
            .field("args", &self.args)
            .field("registered", &self.registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use clap::{Arg, ArgMatches};

    struct Greet(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl Command for Greet {
        fn signature(&self) -> clap::Command {
            clap::Command::new("greet")
                .about("Say hello")
                .arg(Arg::new("name").required(true))
        }

        async fn handle(&self, matches: &ArgMatches) -> Result<(), BoxError> {
            let name = matches
                .get_one::<String>("name")
                .cloned()
                .unwrap_or_default();
            self.0.lock().unwrap().push(name);
            Ok(())
        }
    }

    struct Fail;

    #[async_trait]
    impl Command for Fail {
        fn signature(&self) -> clap::Command {
            clap::Command::new("fail")
        }

        async fn handle(&self, _matches: &ArgMatches) -> Result<(), BoxError> {
            Err("nope".into())
        }
    }

    fn package() -> PackageMetadata {
        PackageMetadata {
            name: "blog".into(),
            version: Some("1.2.0".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invoke_dispatches_registered_command() {
        let greeted = Arc::new(Mutex::new(Vec::new()));
        let catalog = CommandCatalog::new().command("App/Commands/Greet", Greet(greeted.clone()));
        let kernel = AceKernel::new(catalog, ["ace", "greet", "world"]);

        kernel.register(&["App/Commands/Greet".to_string()]).unwrap();
        kernel.invoke(&package()).await.unwrap();

        assert_eq!(*greeted.lock().unwrap(), vec!["world"]);
    }

    #[tokio::test]
    async fn test_unregistered_command_is_usage_error() {
        let greeted = Arc::new(Mutex::new(Vec::new()));
        let catalog = CommandCatalog::new().command("App/Commands/Greet", Greet(greeted));
        let kernel = AceKernel::new(catalog, ["ace", "greet", "world"]);

        kernel.register(&[]).unwrap();
        let err = kernel.invoke(&package()).await.unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }

    #[test]
    fn test_register_unknown_command() {
        let kernel = AceKernel::new(CommandCatalog::new(), ["ace"]);
        let err = kernel.register(&["App/Commands/Missing".to_string()]).unwrap_err();
        assert!(matches!(err, CommandError::Unknown { .. }));
    }

    #[tokio::test]
    async fn test_failing_command() {
        let catalog = CommandCatalog::new().command("App/Commands/Fail", Fail);
        let kernel = AceKernel::new(catalog, ["ace", "fail"]);
        kernel.register(&["App/Commands/Fail".to_string()]).unwrap();
        let err = kernel.invoke(&package()).await.unwrap_err();
        assert_eq!(err.to_string(), "command fail failed: nope");
    }

    #[tokio::test]
    async fn test_version_flag_is_not_an_error() {
        let kernel = AceKernel::new(CommandCatalog::new(), ["ace", "--version"]);
        kernel.register(&[]).unwrap();
        assert!(kernel.invoke(&package()).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_subcommand_prints_help() {
        let greeted = Arc::new(Mutex::new(Vec::new()));
        let catalog = CommandCatalog::new().command("App/Commands/Greet", Greet(greeted.clone()));
        let kernel = AceKernel::new(catalog, ["ace"]);
        kernel.register(&["App/Commands/Greet".to_string()]).unwrap();

        assert!(kernel.invoke(&package()).await.is_ok());
        assert!(greeted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_flag_is_usage_error() {
        let kernel = AceKernel::new(CommandCatalog::new(), ["ace", "--bogus"]);
        kernel.register(&[]).unwrap();
        let err = kernel.invoke(&package()).await.unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }
}
