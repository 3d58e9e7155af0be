//! Background resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Page render
//!     → caller supplies path + entity (category / product)
//!     → store snapshot supplies active route rules + site default
//!     → resolver.rs (tiered precedence, first match wins)
//!     → ResolvedBackground {desktop, mobile, opacity}
//!     → viewport.rs (choose one URL for the current width)
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no hidden state, never fails
//! - Inputs are immutable snapshots fetched by the caller
//! - Missing inputs fall through to the next tier

pub mod resolver;
pub mod types;
pub mod viewport;

pub use resolver::{resolve, resolve_in_rule_set, resolve_with_tier};
pub use types::{
    BackgroundFields, EntityBackground, ResolvedBackground, RouteBackgroundRule, SiteDefaultBackground, Tier,
    DEFAULT_OVERLAY_OPACITY,
};
pub use viewport::{pick_for_width, MOBILE_BREAKPOINT_PX};
