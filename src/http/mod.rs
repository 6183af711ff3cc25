//! HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! start/routes module
//!     → HttpServer::routes(|router| ...)   application routes
//!
//! Ignitor::fire_http_server
//!     → Server::set_listener (optional pre-bound socket)
//!     → Server::listen(HOST, PORT)         bind, spawn axum::serve
//!     → Server::wait()                     until Ctrl+C or Shutdown::trigger
//! ```
//!
//! # Design Decisions
//! - `listen` returns once the socket is bound, so `after httpServer` hooks see a live server
//! - Request ID set as early as possible and echoed on the response

pub mod request;
pub mod server;

use std::net::SocketAddr;

use async_trait::async_trait;
use thiserror::Error;
use tokio::net::TcpListener;

pub use request::{request_id, X_REQUEST_ID};
pub use server::HttpServer;

/// The server contract used by `fire_http_server`.
#[async_trait]
pub trait Server: Send + Sync {
    /// Use a pre-bound listener instead of binding in `listen`.
    fn set_listener(&self, listener: TcpListener);

    /// Bind (unless a listener was supplied) and start serving.
    async fn listen(&self, host: &str, port: u16) -> Result<SocketAddr, ServerError>;

    /// Wait until the server stops.
    async fn wait(&self) -> Result<(), ServerError>;
}

/// Error starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
