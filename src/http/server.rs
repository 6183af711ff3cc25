//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Collect application routes registered during boot
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind to HOST/PORT or use a pre-built listener
//! - Serve until Ctrl+C or an explicit shutdown

use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::{Server, ServerError};
use crate::lifecycle::shutdown::{self, Shutdown};

type ServeTask = JoinHandle<std::io::Result<()>>;

/// Axum-backed HTTP server.
pub struct HttpServer {
    config: ServerConfig,
    router: Mutex<Router>,
    listener: Mutex<Option<TcpListener>>,
    local_addr: Mutex<Option<SocketAddr>>,
    task: Mutex<Option<ServeTask>>,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: Mutex::new(Router::new()),
            listener: Mutex::new(None),
            local_addr: Mutex::new(None),
            task: Mutex::new(None),
            shutdown: Shutdown::new(),
        }
    }

    /// Add routes. Called by route modules during preload.
    pub fn routes(&self, f: impl FnOnce(Router) -> Router) {
        let mut router = self.router.lock().unwrap_or_else(PoisonError::into_inner);
        let current = std::mem::take(&mut *router);
        *router = f(current);
    }

    /// Address the server is bound to, once listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shutdown coordinator; triggering it stops the server gracefully.
    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, routes: Router) -> Router {
        routes.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                ))),
        )
    }
}

#[async_trait]
impl Server for HttpServer {
    fn set_listener(&self, listener: TcpListener) {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(listener);
    }

    async fn listen(&self, host: &str, port: u16) -> Result<SocketAddr, ServerError> {
        let prebuilt = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let listener = match prebuilt {
            Some(listener) => listener,
            None => TcpListener::bind((host, port))
                .await
                .map_err(|source| ServerError::Bind {
                    address: format!("{host}:{port}"),
                    source,
                })?,
        };
        let addr = listener.local_addr()?;

        let routes = self
            .router
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let app = Self::build_router(&self.config, routes);
        let shutdown = self.shutdown.subscribe();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(shutdown))
                .await
        });

        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
        *self.local_addr.lock().unwrap_or_else(PoisonError::into_inner) = Some(addr);

        tracing::info!(address = %addr, "HTTP server listening");
        Ok(addr)
    }

    async fn wait(&self) -> Result<(), ServerError> {
        let task = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            task.await??;
            tracing::info!("HTTP server stopped");
        }
        Ok(())
    }
}

/// Wait for Ctrl+C or an explicit shutdown.
async fn shutdown_signal(rx: watch::Receiver<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = shutdown::triggered(rx) => {}
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_listen_on_prebuilt_listener_and_stop() {
        let server = HttpServer::new(ServerConfig::default());
        server.routes(|router| router.route("/ping", get(|| async { "pong" })));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let expected = listener.local_addr().unwrap();
        server.set_listener(listener);

        let addr = server.listen("0.0.0.0", 1).await.unwrap();
        assert_eq!(addr, expected);
        assert_eq!(server.local_addr(), Some(expected));

        let body = client()
            .get(format!("http://{addr}/ping"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");

        server.shutdown().trigger();
        server.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let server = HttpServer::new(ServerConfig::default());
        server.routes(|router| router.route("/", get(|| async { "ok" })));

        let addr = server.listen("127.0.0.1", 0).await.unwrap();
        let res = client()
            .get(format!("http://{addr}/"))
            .send()
            .await
            .unwrap();
        assert!(res.headers().get(crate::http::X_REQUEST_ID).is_some());

        server.shutdown().trigger();
        server.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_trigger_before_listen_still_stops() {
        let server = HttpServer::new(ServerConfig::default());
        server.shutdown().trigger();

        server.listen("127.0.0.1", 0).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), server.wait())
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_without_listen_returns() {
        let server = HttpServer::new(ServerConfig::default());
        server.wait().await.unwrap();
    }
}
