//! Application path helpers.

use std::path::{Path, PathBuf};

use crate::config::Directories;

/// Container binding for [`Helpers`].
pub const HELPERS_BINDING: &str = "Ignitor/Src/Helpers";

/// Short alias for [`HELPERS_BINDING`].
pub const HELPERS_ALIAS: &str = "Helpers";

/// Resolves well-known application folders against the application root.
#[derive(Debug, Clone)]
pub struct Helpers {
    app_root: PathBuf,
    directories: Directories,
}

impl Helpers {
    pub fn new(app_root: impl Into<PathBuf>, directories: Directories) -> Self {
        Self {
            app_root: app_root.into(),
            directories,
        }
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    pub fn public_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.public, to)
    }

    pub fn config_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.config, to)
    }

    pub fn resources_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.resources, to)
    }

    pub fn views_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.views, to)
    }

    pub fn database_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.database, to)
    }

    pub fn migrations_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.migrations, to)
    }

    pub fn seeds_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.seeds, to)
    }

    pub fn tmp_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.tmp, to)
    }

    pub fn start_path(&self, to: &str) -> PathBuf {
        self.under(&self.directories.start, to)
    }

    fn under(&self, dir: &str, to: &str) -> PathBuf {
        let base = self.app_root.join(dir);
        if to.is_empty() {
            base
        } else {
            base.join(to)
        }
    }
}
