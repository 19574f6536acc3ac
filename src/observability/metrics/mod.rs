//! # Metrics Module
//!
//! Prometheus metrics for monitoring secret store usage, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup and registration
//! - `store_metrics` - Store-level metrics (upserts, containers created, reads)
//! - `provider_metrics` - Remote API call metrics (per operation)

pub mod provider_metrics;
pub mod registry;
pub mod store_metrics;

pub use provider_metrics::*;
pub use registry::*;
pub use store_metrics::*;
