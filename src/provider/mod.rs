//! # Secret Manager Providers
//!
//! The [`SecretManagerClient`] trait is the contract the store consumes from
//! the remote secret service. Transport, authentication and pagination are
//! the implementation's responsibility.
//!
//! - `gcp`: native REST client for Google Cloud Secret Manager

pub mod gcp;

use std::sync::Arc;

use async_trait::async_trait;
use paths::{ProjectName, SecretName, SecretVersionName};

/// Replication policy of a secret container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replication {
    /// The service chooses replica placement
    Automatic,
    /// Replicas pinned to the listed locations
    UserManaged { locations: Vec<String> },
}

/// Secret container metadata (holds no payload)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    /// Fully-qualified name: `projects/{project}/secrets/{secret}`
    pub name: String,
    pub replication: Option<Replication>,
    /// RFC3339 creation time, when reported by the service
    pub create_time: Option<String>,
}

impl Secret {
    /// Secret id (last segment of the fully-qualified name)
    pub fn secret_id(&self) -> &str {
        paths::secret_id_of(&self.name)
    }
}

/// Metadata of a version created by `add_secret_version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersion {
    /// Fully-qualified name: `projects/{project}/secrets/{secret}/versions/{version}`
    pub name: String,
    pub create_time: Option<String>,
}

impl SecretVersion {
    /// Version id (last segment of the fully-qualified name)
    pub fn version_id(&self) -> &str {
        paths::secret_id_of(&self.name)
    }
}

/// Remote secret service client
///
/// Implementations must be safe to share across tasks; the store holds one
/// for its whole lifetime and never refreshes it.
#[async_trait]
pub trait SecretManagerClient: Send + Sync {
    /// Error surfaced by every remote operation, returned by the store unchanged
    type Error: std::error::Error + Send + Sync + 'static;

    /// All secret containers in the project, every page flattened
    async fn list_secrets(&self, project: &ProjectName) -> Result<Vec<Secret>, Self::Error>;

    /// Create a secret container without any payload
    async fn create_secret(
        &self,
        project: &ProjectName,
        secret_id: &str,
        replication: Replication,
    ) -> Result<Secret, Self::Error>;

    /// Append a new immutable version holding `payload`
    async fn add_secret_version(
        &self,
        secret: &SecretName,
        payload: &[u8],
    ) -> Result<SecretVersion, Self::Error>;

    /// Payload bytes of a version (number or `latest`)
    async fn access_secret_version(
        &self,
        version: &SecretVersionName,
    ) -> Result<Vec<u8>, Self::Error>;
}

#[async_trait]
impl<C: SecretManagerClient + ?Sized> SecretManagerClient for Arc<C> {
    type Error = C::Error;

    async fn list_secrets(&self, project: &ProjectName) -> Result<Vec<Secret>, Self::Error> {
        (**self).list_secrets(project).await
    }

    async fn create_secret(
        &self,
        project: &ProjectName,
        secret_id: &str,
        replication: Replication,
    ) -> Result<Secret, Self::Error> {
        (**self).create_secret(project, secret_id, replication).await
    }

    async fn add_secret_version(
        &self,
        secret: &SecretName,
        payload: &[u8],
    ) -> Result<SecretVersion, Self::Error> {
        (**self).add_secret_version(secret, payload).await
    }

    async fn access_secret_version(
        &self,
        version: &SecretVersionName,
    ) -> Result<Vec<u8>, Self::Error> {
        (**self).access_secret_version(version).await
    }
}
