//! Top-level boot errors.
//!
//! Collaborator errors are carried transparently so callers can still tell a
//! broken preload file from a failing provider.

use std::path::PathBuf;

use thiserror::Error;

use crate::ace::CommandError;
use crate::config::ConfigError;
use crate::hooks::HookError;
use crate::http::ServerError;
use crate::modules::LoadError;
use crate::providers::ProviderError;

/// Boxed error returned by user-supplied callbacks, modules and providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for boot operations.
pub type IgnitorResult<T> = Result<T, IgnitorError>;

/// Error aborting a boot.
#[derive(Debug, Error)]
pub enum IgnitorError {
    /// `app_root` was never configured.
    #[error("application root is not set; call app_root() before firing")]
    MissingAppRoot,

    /// The ignitor already ran its pipeline.
    #[error("ignitor has already been fired")]
    AlreadyFired,

    /// The application file has no `aliases` table.
    #[error("application file {} does not define `aliases`", path.display())]
    MissingAliases { path: PathBuf },

    /// An environment value could not be used.
    #[error("invalid environment value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_transparent_errors_keep_message() {
        let load = LoadError::NotFound {
            path: PathBuf::from("/srv/app/start/routes"),
        };
        let expected = load.to_string();
        let err = IgnitorError::from(load);
        assert_eq!(err.to_string(), expected);
        assert!(matches!(err, IgnitorError::Load(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_missing_aliases_mentions_path() {
        let err = IgnitorError::MissingAliases {
            path: PathBuf::from("start/app.toml"),
        };
        assert!(err.to_string().contains("start/app.toml"));
        assert!(err.source().is_none());
    }
}
