//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::background::{BackgroundFields, RouteBackgroundRule, SiteDefaultBackground};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Background records seeded into the store.
    pub backgrounds: BackgroundsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
        }
    }
}

/// Background records managed through the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BackgroundsConfig {
    /// Last-resort fallback for every page.
    pub site_default: Option<SiteDefaultBackground>,

    /// Route rules, in any order.
    pub routes: Vec<RouteBackgroundRule>,

    /// Category backgrounds keyed by slug.
    pub categories: Vec<CategoryConfig>,

    /// Product backgrounds keyed by slug.
    pub products: Vec<ProductConfig>,
}

/// A category's own background.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryConfig {
    pub slug: String,

    #[serde(default)]
    pub desktop_url: Option<String>,

    #[serde(default)]
    pub mobile_url: Option<String>,

    #[serde(default)]
    pub overlay_opacity: Option<f64>,
}

impl CategoryConfig {
    pub fn background(&self) -> BackgroundFields {
        BackgroundFields {
            desktop_url: self.desktop_url.clone(),
            mobile_url: self.mobile_url.clone(),
            overlay_opacity: self.overlay_opacity,
        }
    }
}

/// A product's own background and its parent category.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductConfig {
    pub slug: String,

    /// Slug of the parent category, consulted when the product has no image.
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub desktop_url: Option<String>,

    #[serde(default)]
    pub mobile_url: Option<String>,

    #[serde(default)]
    pub overlay_opacity: Option<f64>,
}

impl ProductConfig {
    pub fn background(&self) -> BackgroundFields {
        BackgroundFields {
            desktop_url: self.desktop_url.clone(),
            mobile_url: self.mobile_url.clone(),
            overlay_opacity: self.overlay_opacity,
        }
    }
}
