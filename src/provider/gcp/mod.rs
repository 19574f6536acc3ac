//! # GCP Provider
//!
//! Google Cloud Secret Manager provider.
//!
//! Uses a native REST implementation that:
//! - Works directly with the HTTP mock server
//! - Uses reqwest with rustls (no OpenSSL dependencies)
//! - Is easier to troubleshoot and maintain

mod auth;
mod client;
mod error;

pub use client::SecretManagerREST;
pub use error::GcpError;

use crate::config::{ConfigError, StoreConfig};
use tracing::info;

/// Create a GCP Secret Manager client
///
/// Always uses the REST client implementation to avoid SSL/OpenSSL issues.
///
/// # Arguments
/// - `config`: endpoint, paging, timeout and token source settings
pub fn create_gcp_client(config: &StoreConfig) -> Result<SecretManagerREST, ConfigError> {
    info!(
        endpoint = %config.endpoint,
        "Using GCP Secret Manager REST client (native implementation)"
    );
    SecretManagerREST::new(config)
}
