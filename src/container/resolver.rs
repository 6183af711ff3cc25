//! Namespace resolution for application code.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Receives the autoload configuration computed during boot.
pub trait Resolver: Send + Sync {
    fn set_namespace(&self, namespace: &str);
    fn set_autoload_root(&self, path: &Path, namespace: &str);
    fn set_directories(&self, directories: &[(&str, &str)]);
}

#[derive(Debug, Default)]
struct ResolverState {
    namespace: Option<String>,
    autoload: Option<(PathBuf, String)>,
    directories: HashMap<String, String>,
}

/// Maps short names onto the application namespace and its folders.
#[derive(Debug, Default)]
pub struct NamespaceResolver {
    state: RwLock<ResolverState>,
}

impl NamespaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(&self) -> Option<String> {
        self.read(|state| state.namespace.clone())
    }

    /// Directory and namespace registered for autoloading.
    pub fn autoload_root(&self) -> Option<(PathBuf, String)> {
        self.read(|state| state.autoload.clone())
    }

    pub fn directory(&self, name: &str) -> Option<String> {
        self.read(|state| state.directories.get(name).cloned())
    }

    /// Prefix `name` with the namespace unless it already carries it.
    ///
    /// Returns `name` unchanged when no namespace has been set.
    pub fn translate(&self, name: &str) -> String {
        let name = name.trim_start_matches('/');
        match self.namespace() {
            Some(ns) if !name.starts_with(&format!("{ns}/")) => format!("{ns}/{name}"),
            _ => name.to_string(),
        }
    }

    /// Fully qualified name of `name` inside the logical folder `dir`.
    ///
    /// `for_dir("httpControllers", "UserController")` yields
    /// `App/Controllers/Http/UserController`.
    pub fn for_dir(&self, dir: &str, name: &str) -> Option<String> {
        let folder = self.directory(dir)?;
        Some(self.translate(&format!("{folder}/{name}")))
    }

    /// Source location of a namespaced name, e.g. `App/Models/User` →
    /// `<root>/app/Models/User`.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let (root, namespace) = self.autoload_root()?;
        let rest = name.strip_prefix(&namespace)?.strip_prefix('/')?;
        Some(root.join(rest))
    }

    fn read<T>(&self, f: impl FnOnce(&ResolverState) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self, f: impl FnOnce(&mut ResolverState)) {
        f(&mut self.state.write().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Resolver for NamespaceResolver {
    fn set_namespace(&self, namespace: &str) {
        self.write(|state| state.namespace = Some(namespace.to_string()));
    }

    fn set_autoload_root(&self, path: &Path, namespace: &str) {
        self.write(|state| state.autoload = Some((path.to_path_buf(), namespace.to_string())));
    }

    fn set_directories(&self, directories: &[(&str, &str)]) {
        self.write(|state| {
            state.directories = directories
                .iter()
                .map(|(name, dir)| (name.to_string(), dir.to_string()))
                .collect();
        });
    }
}
