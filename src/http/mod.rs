//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, timeout)
//!     → api.rs (GET /api/background: store snapshot → resolver → viewport pick)
//!     → admin (bearer-authenticated CRUD, when enabled)
//!     → error.rs (JSON error bodies)
//! ```

pub mod api;
pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";
