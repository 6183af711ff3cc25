//! Lifecycle hook subsystem.
//!
//! # Data Flow
//! ```text
//! start/hooks module (or any setup code)
//!     → registry.rs (before/after callbacks per lifecycle)
//!     → shared via Arc with the Ignitor
//!
//! Phase boundary reached:
//!     → HookRegistry::fire(lifecycle, boundary)
//!     → callbacks run in registration order
//!     → first failure aborts the boot
//! ```
//!
//! # Design Decisions
//! - Registry is an explicit object, not an ambient global
//! - Unknown lifecycle/boundary pairs fire nothing
//! - Callbacks are snapshotted before running, so they may register more hooks

pub mod registry;

pub use registry::{Boundary, Hook, HookError, HookRegistry, Lifecycle};
