//! # Client Configuration
//!
//! Secret Manager endpoint, paging, timeout and authentication settings.

use std::time::Duration;

use crate::constants::{
    DEFAULT_LIST_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SECRET_MANAGER_ENDPOINT,
};

/// Where the REST client gets its bearer token from
#[derive(Clone, PartialEq, Eq)]
pub enum TokenSourceConfig {
    /// Fixed OAuth2 access token (e.g. `gcloud auth print-access-token`)
    Static(String),
    /// GCE/GKE metadata server (Workload Identity, default service account)
    MetadataServer,
    /// No `Authorization` header (emulators and mock servers)
    Anonymous,
}

impl std::fmt::Debug for TokenSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static(<redacted>)"),
            Self::MetadataServer => f.write_str("MetadataServer"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Secret Manager client configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the Secret Manager REST API (no trailing slash)
    pub endpoint: String,
    /// `pageSize` sent when listing secrets
    pub list_page_size: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Bearer token source
    pub token_source: TokenSourceConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SECRET_MANAGER_ENDPOINT.to_string(),
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            token_source: TokenSourceConfig::MetadataServer,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults
    ///
    /// - `SECRET_MANAGER_ENDPOINT`: REST endpoint override (mock servers)
    /// - `SECRET_MANAGER_PAGE_SIZE`: list page size
    /// - `SECRET_MANAGER_TIMEOUT_SECS`: request timeout
    /// - `GCP_ACCESS_TOKEN`: static bearer token
    /// - `SECRET_MANAGER_ANONYMOUS`: `true` to send no credentials
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let token_source = if let Some(token) = lookup("GCP_ACCESS_TOKEN").filter(|t| !t.is_empty()) {
            TokenSourceConfig::Static(token)
        } else if var_or_default(&lookup, "SECRET_MANAGER_ANONYMOUS", false) {
            TokenSourceConfig::Anonymous
        } else {
            TokenSourceConfig::MetadataServer
        };

        Self {
            endpoint: lookup("SECRET_MANAGER_ENDPOINT")
                .filter(|e| !e.is_empty())
                .map_or_else(
                    || DEFAULT_SECRET_MANAGER_ENDPOINT.to_string(),
                    |e| e.trim_end_matches('/').to_string(),
                ),
            list_page_size: var_or_default(&lookup, "SECRET_MANAGER_PAGE_SIZE", DEFAULT_LIST_PAGE_SIZE),
            request_timeout: Duration::from_secs(var_or_default(
                &lookup,
                "SECRET_MANAGER_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            token_source,
        }
    }

    /// Point the client at another endpoint, e.g. a local mock server
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_token_source(mut self, token_source: TokenSourceConfig) -> Self {
        self.token_source = token_source;
        self
    }

    #[must_use]
    pub fn with_list_page_size(mut self, list_page_size: u32) -> Self {
        self.list_page_size = list_page_size;
        self
    }
}

/// Read a variable or return the default value if unset or unparseable
fn var_or_default<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = StoreConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.endpoint, DEFAULT_SECRET_MANAGER_ENDPOINT);
        assert_eq!(config.list_page_size, DEFAULT_LIST_PAGE_SIZE);
        assert_eq!(
            config.request_timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(config.token_source, TokenSourceConfig::MetadataServer);
    }

    #[test]
    fn test_environment_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("SECRET_MANAGER_ENDPOINT", "http://localhost:1234/"),
            ("SECRET_MANAGER_PAGE_SIZE", "10"),
            ("SECRET_MANAGER_TIMEOUT_SECS", "5"),
            ("GCP_ACCESS_TOKEN", "ya29.token"),
        ]));
        assert_eq!(config.endpoint, "http://localhost:1234");
        assert_eq!(config.list_page_size, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.token_source,
            TokenSourceConfig::Static("ya29.token".to_string())
        );
    }

    #[test]
    fn test_anonymous_and_invalid_values() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("SECRET_MANAGER_ANONYMOUS", "true"),
            ("SECRET_MANAGER_PAGE_SIZE", "not-a-number"),
        ]));
        assert_eq!(config.token_source, TokenSourceConfig::Anonymous);
        assert_eq!(config.list_page_size, DEFAULT_LIST_PAGE_SIZE);
    }

    #[test]
    fn test_static_token_is_redacted_in_debug() {
        let source = TokenSourceConfig::Static("ya29.secret".to_string());
        assert!(!format!("{source:?}").contains("ya29"));
    }
}
