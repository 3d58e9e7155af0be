//! Route rule subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation path
//!     → rules.rs (ordered scan of active rules)
//!     → matcher.rs (exact or `/*` prefix test)
//!     → Return: first matching RouteBackgroundRule or None
//!
//! Rule compilation (on every store snapshot):
//!     RouteBackgroundRule[]
//!     → Drop inactive
//!     → Stable sort by priority descending
//!     → Freeze as immutable RouteRuleSet
//! ```
//!
//! # Design Decisions
//! - First match wins (ordered by priority)
//! - Deterministic: same input always matches same rule

pub mod matcher;
pub mod rules;

pub use matcher::{matches, PathPattern};
pub use rules::RouteRuleSet;
