//! Background record storage.
//!
//! # Data Flow
//! ```text
//! Writers:
//!     config file (seed / reload) → replace_from_config
//!     admin API                   → rule, site default, catalog CRUD
//!
//! Readers:
//!     snapshot() → Arc<BackgroundSnapshot> {rules, site default, catalog}
//!     BackgroundSnapshot::entity_for() → category, or product joined with its parent
//!     → resolver
//! ```
//!
//! # Design Decisions
//! - The resolver never reads the store directly; it receives snapshots
//! - One generation per swap: a reader never sees a product from one
//!   generation and its category from another
//! - Category references are checked inside the write that would break them
//! - Writes are not validated here, callers validate before writing

pub mod memory;

pub use memory::{BackgroundSnapshot, BackgroundStore, EntityRef, ProductBackground, StoreError, StoredRule};
