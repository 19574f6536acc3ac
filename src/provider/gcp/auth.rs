//! # GCP Authentication
//!
//! Bearer tokens for the REST client.
//!
//! - Static: a token supplied by configuration, sent as-is
//! - Metadata server: the default service account token from the GCE/GKE
//!   metadata server (Workload Identity), cached until shortly before expiry
//! - Anonymous: no `Authorization` header (mock servers, emulators)

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::error::GcpError;
use crate::config::TokenSourceConfig;
use crate::constants::{METADATA_FLAVOR_HEADER, METADATA_TOKEN_URL, TOKEN_EXPIRY_MARGIN_SECS};

/// Token returned by the metadata server
#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

pub(crate) enum TokenSource {
    Static(String),
    MetadataServer {
        url: String,
        cached: Mutex<Option<CachedToken>>,
    },
    Anonymous,
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static(<redacted>)"),
            Self::MetadataServer { url, .. } => f
                .debug_struct("MetadataServer")
                .field("url", url)
                .finish_non_exhaustive(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

impl TokenSource {
    pub(crate) fn from_config(config: &TokenSourceConfig) -> Self {
        match config {
            TokenSourceConfig::Static(token) => Self::Static(token.clone()),
            TokenSourceConfig::MetadataServer => Self::metadata_server(METADATA_TOKEN_URL),
            TokenSourceConfig::Anonymous => Self::Anonymous,
        }
    }

    pub(crate) fn metadata_server(url: impl Into<String>) -> Self {
        Self::MetadataServer {
            url: url.into(),
            cached: Mutex::new(None),
        }
    }

    /// Current bearer token, or `None` for anonymous access
    pub(crate) async fn token(&self, http: &reqwest::Client) -> Result<Option<String>, GcpError> {
        match self {
            Self::Static(token) => Ok(Some(token.clone())),
            Self::Anonymous => Ok(None),
            Self::MetadataServer { url, cached } => {
                let mut guard = cached.lock().await;
                if let Some(token) = guard.as_ref() {
                    if Instant::now() < token.refresh_at {
                        return Ok(Some(token.access_token.clone()));
                    }
                }

                debug!("Fetching access token from metadata server");
                let fetched = fetch_metadata_token(http, url).await?;
                let lifetime = fetched.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
                let access_token = fetched.access_token;
                *guard = Some(CachedToken {
                    access_token: access_token.clone(),
                    refresh_at: Instant::now() + Duration::from_secs(lifetime),
                });
                Ok(Some(access_token))
            }
        }
    }
}

async fn fetch_metadata_token(
    http: &reqwest::Client,
    url: &str,
) -> Result<MetadataToken, GcpError> {
    let (header, value) = METADATA_FLAVOR_HEADER;
    let response = http
        .get(url)
        .header(header, value)
        .send()
        .await
        .map_err(|e| GcpError::Auth(format!("metadata server unreachable: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(GcpError::Auth(format!(
            "metadata server returned HTTP {status}"
        )));
    }

    response
        .json::<MetadataToken>()
        .await
        .map_err(|e| GcpError::Auth(format!("invalid metadata token response: {e}")))
}
