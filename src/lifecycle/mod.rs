//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger() → broadcast → server stops accepting → drains → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
