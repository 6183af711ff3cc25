//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (ignitor.rs → pipeline.rs):
//!     app_root / app_file / preload list configured
//!     → fire: package → autoload → providers → aliases → exceptions → preload
//!     → fire_http_server: listen on HOST:PORT
//!     → fire_ace: run one command
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → server drains → fire_http_server returns
//! ```
//!
//! # Design Decisions
//! - Ordered startup: metadata first, providers next, preload files last
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

pub mod ignitor;
pub mod pipeline;
pub mod preload;
pub mod shutdown;

pub use ignitor::{BootDependencies, BootState, Ignitor};
pub use pipeline::Phase;
pub use preload::{PreloadEntry, PreloadList};
pub use shutdown::Shutdown;
