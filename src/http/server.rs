//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, metrics, limits, timeouts, request ID)
//! - Bind server to listener
//! - Serve until the shutdown broadcast fires, then drain

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::proxy::UpstreamProxy;
use crate::http::request::{propagate_request_id, set_request_id};
use crate::observability::metrics;
use crate::routing::{build_routes, RedirectFlag};
use crate::store::BodyStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BodyStore>,
    pub proxy: UpstreamProxy,
    pub redirect: RedirectFlag,
    pub static_files: Option<ServeDir>,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn BodyStore>, redirect: RedirectFlag) -> Self {
        Self {
            store,
            proxy: UpstreamProxy::new(config.upstream_origin()),
            redirect,
            static_files: config
                .static_root()
                .map(|dir| ServeDir::new(dir).append_index_html_on_directories(true)),
        }
    }
}

/// HTTP server for the backend.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, store: Arc<dyn BodyStore>, redirect: RedirectFlag) -> Self {
        let state = AppState::new(&config, store, redirect);
        Self::with_state(config, state)
    }

    /// Create a server over prepared state (custom upstream in tests).
    pub fn with_state(config: AppConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        build_routes(state)
            .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(propagate_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id())
    }

    /// The fully layered router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops accepting once `shutdown` fires and returns when in-flight
    /// requests are done; bounding that wait is the caller's job.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            react_port = self.config.react_port,
            static_dir = ?self.config.static_root(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
