//! Page background resolution service.
//!
//! Decides which background image pair and overlay opacity a rendered page
//! shows, from route rules, the page's catalog entity and a site-wide
//! default. The resolver is pure; the store, HTTP API and config reload
//! around it supply its inputs.

pub mod admin;
pub mod background;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod store;

pub use background::{pick_for_width, resolve, ResolvedBackground};
pub use config::SiteConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use store::BackgroundStore;
