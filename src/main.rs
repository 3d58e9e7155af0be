//! Page background service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                 PAGE BACKGROUND SERVICE               │
//!                 │                                                       │
//!   Page shell    │  ┌──────────┐   ┌──────────────┐   ┌──────────────┐  │
//!   ──────────────┼─▶│  http    │──▶│    store     │──▶│  background  │  │
//!   GET /api/...  │  │  api     │   │   snapshot   │   │   resolver   │  │
//!                 │  └──────────┘   └──────▲───────┘   └──────┬───────┘  │
//!                 │                        │                  ▼          │
//!   Admin         │  ┌──────────┐          │           ┌──────────────┐  │
//!   ──────────────┼─▶│  admin   │──────────┘           │   viewport   │  │
//!   CRUD          │  └──────────┘                      │    picker    │  │
//!                 │                                    └──────────────┘  │
//!                 │  ┌─────────────────────────────────────────────────┐ │
//!                 │  │ config (TOML + hot reload) │ observability      │ │
//!                 │  └─────────────────────────────────────────────────┘ │
//!                 └──────────────────────────────────────────────────────┘
//! ```
//!
//! The config path is the first argument, or `PAGE_BACKGROUND_CONFIG`.

use std::path::PathBuf;

use tokio::net::TcpListener;

use page_background::config::{load_config, ConfigWatcher, SiteConfig};
use page_background::observability::{logging, metrics};
use page_background::{AppState, HttpServer, Shutdown};

const CONFIG_ENV: &str = "PAGE_BACKGROUND_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from);

    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("page-background v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = ?config_path,
        bind_address = %config.listener.bind_address,
        route_rules = config.backgrounds.routes.len(),
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let state = AppState::new(config);

    // Keep the watcher alive for the lifetime of the server
    let _watcher = match &config_path {
        Some(path) => {
            let (watcher, mut updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            let reload_state = state.clone();
            tokio::spawn(async move {
                while let Some(config) = updates.recv().await {
                    reload_state.apply_config(config);
                }
            });
            Some(handle)
        }
        None => None,
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(state);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
