//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every boot phase produces:
//!     → tracing events with a `phase` field
//!
//! Consumers:
//!     → logging.rs (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Filter from RUST_LOG, with a crate-level default

pub mod logging;
