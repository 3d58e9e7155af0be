//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Mount the admin API when enabled
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::admin::setup_admin_router;
use crate::config::SiteConfig;
use crate::http::api;
use crate::http::X_REQUEST_ID;
use crate::lifecycle::shutdown;
use crate::store::BackgroundStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BackgroundStore>,
    /// Current configuration; swapped on reload.
    pub settings: Arc<ArcSwap<SiteConfig>>,
}

impl AppState {
    /// Build state with a store seeded from `config`.
    pub fn new(config: SiteConfig) -> Self {
        let store = Arc::new(BackgroundStore::from_config(&config.backgrounds));
        Self {
            store,
            settings: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Apply a reloaded configuration.
    ///
    /// Background records and the admin key take effect immediately. Listener,
    /// timeout and whether the admin API is mounted need a restart.
    pub fn apply_config(&self, config: SiteConfig) {
        self.store.replace_from_config(&config.backgrounds);
        self.settings.store(Arc::new(config));
        tracing::info!("Configuration reloaded");
    }
}

/// HTTP server for the background service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let config = state.settings.load_full();
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        let mut app = Router::new()
            .route("/health", get(api::health))
            .route("/api/background", get(api::get_background));

        if config.admin.enabled {
            app = app.merge(setup_admin_router(state.clone()));
        } else {
            tracing::info!("Admin API disabled");
        }

        app.with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run until the shutdown signal is received.
    pub async fn run(self, listener: TcpListener, shutdown_rx: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
