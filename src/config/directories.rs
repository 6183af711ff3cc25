//! Framework directory tables.

/// Folders relative to the application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directories {
    pub public: String,
    pub config: String,
    pub database: String,
    pub migrations: String,
    pub seeds: String,
    pub resources: String,
    pub views: String,
    pub start: String,
    pub tmp: String,
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            public: "public".to_string(),
            config: "config".to_string(),
            database: "database".to_string(),
            migrations: "database/migrations".to_string(),
            seeds: "database/seeds".to_string(),
            resources: "resources".to_string(),
            views: "resources/views".to_string(),
            start: "start".to_string(),
            tmp: "tmp".to_string(),
        }
    }
}

/// Folders relative to the autoloaded namespace, keyed by logical name.
pub const APP_DIRECTORIES: &[(&str, &str)] = &[
    ("httpControllers", "Controllers/Http"),
    ("wsControllers", "Controllers/Ws"),
    ("models", "Models"),
    ("listeners", "Listeners"),
    ("exceptions", "Exceptions"),
    ("exceptionHandlers", "Exceptions/Handlers"),
    ("middleware", "Middleware"),
    ("commands", "Commands"),
    ("validators", "Validators"),
];
