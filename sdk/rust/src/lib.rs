//! HTTP client for the page background service.

mod client;

pub use client::{BackgroundClient, ResolveParams, ResolvedResponse};
