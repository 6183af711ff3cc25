//! Table of statically linked modules.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::BoxError;
use crate::modules::{strip_source_extension, LoadError, ModuleLoader};

/// A module body, run for its side effects.
pub type Module = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

/// Modules registered under paths relative to an application root.
///
/// Keys are stored without the `.rs` suffix, so `start/routes` and
/// `start/routes.rs` address the same module.
#[derive(Clone)]
pub struct ModuleTable {
    root: PathBuf,
    modules: HashMap<PathBuf, Module>,
}

impl ModuleTable {
    /// Create an empty table rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            modules: HashMap::new(),
        }
    }

    /// Register a module at `identifier`, relative to the table root.
    pub fn module<F>(mut self, identifier: &str, body: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.insert(identifier, body);
        self
    }

    /// Register a module at `identifier`, relative to the table root.
    pub fn insert<F>(&mut self, identifier: &str, body: F)
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let key = self.root.join(strip_source_extension(identifier));
        self.modules.insert(key, Arc::new(body));
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn lookup(&self, path: &Path) -> Option<&Module> {
        self.modules.get(path).or_else(|| {
            let raw = path.to_str()?;
            self.modules.get(Path::new(strip_source_extension(raw)))
        })
    }
}

impl ModuleLoader for ModuleTable {
    fn load(&self, path: &Path) -> Result<(), LoadError> {
        let module = self.lookup(path).ok_or_else(|| LoadError::NotFound {
            path: path.to_path_buf(),
        })?;

        tracing::debug!(path = %path.display(), "Loading module");
        module().map_err(|source| LoadError::Failed {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Debug for ModuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleTable")
            .field("root", &self.root)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}
