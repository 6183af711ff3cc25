//! Application ignitor.
//!
//! Boots a web application in a fixed order: package metadata, autoloading,
//! service providers, aliases, exception handling and preload files. The
//! booted application can then serve HTTP or run a single command.
//!
//! ```text
//!  Ignitor ──▶ lifecycle::pipeline ──▶ hooks (before/after each lifecycle)
//!     │              │
//!     │              ├──▶ config      (Cargo.toml, start/app.toml)
//!     │              ├──▶ container   (resolver, services, helpers, exceptions)
//!     │              ├──▶ providers   (register, async boot)
//!     │              └──▶ modules     (hooks file, handler, preload files)
//!     │
//!     ├──▶ http   (fire_http_server)
//!     └──▶ ace    (fire_ace)
//! ```

pub mod ace;
pub mod config;
pub mod container;
pub mod error;
pub mod hooks;
pub mod http;
pub mod lifecycle;
pub mod modules;
pub mod observability;
pub mod providers;

pub use error::{BoxError, IgnitorError, IgnitorResult};
pub use hooks::{Boundary, HookRegistry, Lifecycle};
pub use http::HttpServer;
pub use lifecycle::{BootDependencies, Ignitor, PreloadList, Shutdown};
