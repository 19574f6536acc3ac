//! # Store Configuration
//!
//! Client-level configuration loaded from environment variables.
//!
//! All configuration has sensible defaults and can be overridden via environment variables.
//! The `smctl` CLI layers its flags on top of the environment.

mod client;

pub use client::{StoreConfig, TokenSourceConfig};

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the project id environment variables is set
    #[error("no GCP project id configured; set one of {0}")]
    MissingProjectId(String),
    /// The endpoint is not an absolute base URL (e.g. `https://host[:port][/prefix]`)
    #[error("invalid Secret Manager endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    /// The HTTP client could not be built from the configuration
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
