//! Metrics collection and exposition.
//!
//! # Metrics
//! - `background_resolutions_total` (counter): resolutions served, by tier
//! - `background_admin_writes_total` (counter): admin mutations, by record kind
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter only when enabled in config

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::background::Tier;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_resolution(tier: Tier) {
    metrics::counter!("background_resolutions_total", "tier" => tier.as_str()).increment(1);
}

pub fn record_admin_write(kind: &'static str) {
    metrics::counter!("background_admin_writes_total", "kind" => kind).increment(1);
}
