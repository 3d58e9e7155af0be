//! Shared utilities for integration testing.

use std::net::SocketAddr;

use background_sdk::BackgroundClient;
use page_background::config::SiteConfig;
use page_background::{AppState, HttpServer, Shutdown};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-admin-key";

/// A running server on a loopback port, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    #[allow(dead_code)]
    pub state: AppState,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> BackgroundClient {
        BackgroundClient::new(&self.url())
    }

    #[allow(dead_code)]
    pub fn admin_client(&self) -> BackgroundClient {
        self.client().with_api_key(API_KEY)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server for `config` on an ephemeral port.
pub async fn start_server(config: SiteConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = AppState::new(config);
    let server = HttpServer::new(state.clone());
    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, shutdown_rx).await;
    });

    TestServer { addr, state, shutdown }
}

/// Config with the admin API enabled under [`API_KEY`].
#[allow(dead_code)]
pub fn admin_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.admin.enabled = true;
    config.admin.api_key = API_KEY.to_string();
    config
}

/// A CDN-style image URL for `name`.
pub fn image(name: &str) -> String {
    format!("https://cdn.example.com/{name}.jpg")
}
