//! # GCP Secret Manager REST Client
//!
//! Native REST implementation of [`SecretManagerClient`] for the Secret
//! Manager API v1.
//!
//! - Bearer token per request from the configured token source
//! - Payloads base64-encoded on write, decoded on read
//! - `list_secrets` follows `nextPageToken` until exhausted
//! - Non-2xx responses become `GcpError::Api`; nothing is retried
//! - Every resource id is percent-encoded as its own path segment
//!
//! Besides the [`SecretManagerClient`] operations the client offers
//! `get_secret`, `delete_secret` and `disable_secret_version`, reached through
//! `SecretStore::client()`.

mod requests;
mod responses;

use std::time::Instant;

use async_trait::async_trait;
use paths::{ProjectName, RestPath, SecretName, SecretVersionName};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, info_span, Instrument};

use self::requests::{AddVersionRequest, CreateSecretRequest};
use self::responses::{
    AccessSecretVersionResponse, ListSecretsResponse, SecretResource, SecretVersionResource,
};
use crate::config::{ConfigError, StoreConfig};
use crate::observability::metrics;
use crate::provider::gcp::auth::TokenSource;
use crate::provider::gcp::GcpError;
use crate::provider::{Replication, Secret, SecretManagerClient, SecretVersion};

/// GCP Secret Manager REST client
pub struct SecretManagerREST {
    http_client: ReqwestClient,
    endpoint: Url,
    list_page_size: u32,
    token_source: TokenSource,
}

impl std::fmt::Debug for SecretManagerREST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerREST")
            .field("endpoint", &self.endpoint)
            .field("list_page_size", &self.list_page_size)
            .field("token_source", &self.token_source)
            .finish_non_exhaustive()
    }
}

impl SecretManagerREST {
    /// Create a new REST client from configuration
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an absolute base URL or the
    /// underlying HTTP client cannot be built
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        let invalid_endpoint = |reason: String| ConfigError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason,
        };
        let endpoint = Url::parse(&config.endpoint).map_err(|e| invalid_endpoint(e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(invalid_endpoint("URL cannot carry a path".to_string()));
        }

        let http_client = ReqwestClient::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
            list_page_size: config.list_page_size,
            token_source: TokenSource::from_config(&config.token_source),
        })
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Endpoint plus `path`, one percent-encoded segment per path segment
    fn url(&self, path: &RestPath) -> Result<Url, GcpError> {
        let segments = path.segments()?;
        let mut url = self.endpoint.clone();
        // `new` rejects cannot-be-a-base endpoints
        if let Ok(mut url_path) = url.path_segments_mut() {
            url_path.pop_if_empty().extend(&segments);
        }
        Ok(url)
    }

    /// Metadata of one secret
    pub async fn get_secret(&self, secret: &SecretName) -> Result<Secret, GcpError> {
        let request = self.http_client.get(self.url(&secret.path())?);
        let resource: SecretResource = self.execute("get_secret", request).await?;
        Ok(resource.into())
    }

    /// Delete a secret and all of its versions
    pub async fn delete_secret(&self, secret: &SecretName) -> Result<(), GcpError> {
        let request = self.http_client.delete(self.url(&secret.path())?);
        let _: IgnoredAny = self.execute("delete_secret", request).await?;
        debug!(secret = %secret, "Deleted secret");
        Ok(())
    }

    /// Disable a version; `latest` then resolves to the newest enabled version
    pub async fn disable_secret_version(
        &self,
        version: &SecretVersionName,
    ) -> Result<SecretVersion, GcpError> {
        let request = self
            .http_client
            .post(self.url(&version.disable_path())?)
            .json(&serde_json::json!({}));
        let resource: SecretVersionResource =
            self.execute("disable_secret_version", request).await?;
        Ok(resource.into())
    }

    /// Authorize, send and decode one request, recording provider metrics
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GcpError> {
        let start = Instant::now();
        let result = async {
            let request = match self.token_source.token(&self.http_client).await? {
                Some(token) => request.bearer_auth(token),
                None => request,
            };
            let response = request.send().await?;
            decode_response(response).await
        }
        .instrument(info_span!("gcp.secret_manager.request", operation))
        .await;

        metrics::observe_provider_operation(operation, start.elapsed(), result.is_ok());
        if let Err(e) = &result {
            debug!(operation, error = %e, "Secret Manager request failed");
        }
        result
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, GcpError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response.text().await?;
    Err(GcpError::from_response(status.as_u16(), &body))
}

#[async_trait]
impl SecretManagerClient for SecretManagerREST {
    type Error = GcpError;

    async fn list_secrets(&self, project: &ProjectName) -> Result<Vec<Secret>, GcpError> {
        let url = self.url(&project.secrets_path())?;
        let mut secrets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", self.list_page_size.to_string())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let page: ListSecretsResponse = self
                .execute("list_secrets", self.http_client.get(url.clone()).query(&query))
                .await?;
            secrets.extend(page.secrets.into_iter().map(Secret::from));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(project = %project, count = secrets.len(), "Listed secrets");
        Ok(secrets)
    }

    async fn create_secret(
        &self,
        project: &ProjectName,
        secret_id: &str,
        replication: Replication,
    ) -> Result<Secret, GcpError> {
        let request = self
            .http_client
            .post(self.url(&project.secrets_path())?)
            .query(&[("secretId", secret_id)])
            .json(&CreateSecretRequest::new(&replication));

        let created: SecretResource = self.execute("create_secret", request).await?;
        Ok(created.into())
    }

    async fn add_secret_version(
        &self,
        secret: &SecretName,
        payload: &[u8],
    ) -> Result<SecretVersion, GcpError> {
        let request = self
            .http_client
            .post(self.url(&secret.add_version_path())?)
            .json(&AddVersionRequest::new(payload));

        let version: SecretVersionResource = self.execute("add_secret_version", request).await?;
        Ok(version.into())
    }

    async fn access_secret_version(
        &self,
        version: &SecretVersionName,
    ) -> Result<Vec<u8>, GcpError> {
        let request = self.http_client.get(self.url(&version.access_path())?);
        let response: AccessSecretVersionResponse =
            self.execute("access_secret_version", request).await?;
        response.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenSourceConfig;

    fn client(endpoint: &str) -> SecretManagerREST {
        let config = StoreConfig::default()
            .with_endpoint(endpoint)
            .with_token_source(TokenSourceConfig::Anonymous);
        SecretManagerREST::new(&config).unwrap()
    }

    #[test]
    fn test_url_encodes_each_resource_segment() {
        let client = client("http://localhost:1234/");

        let url = client
            .url(&SecretVersionName::new("p", "a#b?c", "../../admin/versions/1").access_path())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1234/v1/projects/p/secrets/a%23b%3Fc/versions/..%2F..%2Fadmin%2Fversions%2F1:access"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_url_keeps_endpoint_prefix() {
        let client = client("https://proxy.internal/secretmanager");
        let url = client
            .url(&SecretName::new("p", "db").add_version_path())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.internal/secretmanager/v1/projects/p/secrets/db:addVersion"
        );
    }

    #[test]
    fn test_dot_segments_are_rejected_before_sending() {
        let client = client("http://localhost:1234");
        let err = client
            .url(&SecretVersionName::new("p", "..", "1").access_path())
            .unwrap_err();
        assert!(matches!(err, GcpError::InvalidResourceName(_)));
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        for endpoint in ["not a url", "mailto:ops@example.com"] {
            let config = StoreConfig::default().with_endpoint(endpoint);
            assert!(matches!(
                SecretManagerREST::new(&config),
                Err(ConfigError::InvalidEndpoint { .. })
            ));
        }
    }
}
