//! # FPL Dashboard
//!
//! Backend for a Fantasy Premier League league dashboard.
//!
//! ## Architecture
//!
//! - **fetch**: HTTP client for the upstream fantasy API
//! - **fpl**: Upstream endpoint paths and the `FplApi` seam
//! - **models**: Upstream payloads, identifiers and output markers
//! - **aggregate**: Standings, top scorers, tie analysis and other views
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod api;
pub mod config;
pub mod fetch;
pub mod fpl;
pub mod models;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num.checked_mul(multiplier)?))
}
