//! # Secret Store
//!
//! Upsert-by-name write path and read-by-version path over a
//! [`SecretManagerClient`].
//!
//! The store holds only its two injected collaborators, the client and the
//! project id provider. It keeps no caches or counters of its own, so one
//! instance can be shared across tasks as long as the client can.
//!
//! Remote errors are returned as the client's own error type, unchanged. No
//! retry, backoff or error translation happens here.
//!
//! Two concurrent upserts of a new secret id can both observe it as missing
//! and both attempt creation; the service's duplicate-create behavior decides
//! the outcome (`ALREADY_EXISTS` on GCP).

use paths::{secret_id_of, ProjectName, SecretVersionName};
use tracing::{debug, info, info_span, Instrument};

use crate::observability::metrics;
use crate::payload::SecretPayload;
use crate::project::ProjectIdProvider;
use crate::provider::{Replication, SecretManagerClient};

/// Convenience wrapper for creating and reading secrets
#[derive(Debug, Clone)]
pub struct SecretStore<C, P = String> {
    client: C,
    project_id_provider: P,
}

impl<C, P> SecretStore<C, P>
where
    C: SecretManagerClient,
    P: ProjectIdProvider,
{
    pub fn new(client: C, project_id_provider: P) -> Self {
        Self {
            client,
            project_id_provider,
        }
    }

    /// Project the store operates in
    pub fn project_id(&self) -> &str {
        self.project_id_provider.project_id()
    }

    /// The underlying client, for operations the store does not cover
    /// (delete, metadata updates, IAM, rotation)
    pub fn client(&self) -> &C {
        &self.client
    }

    fn project_name(&self) -> ProjectName {
        ProjectName::new(self.project_id())
    }

    /// Add `payload` as a new version of `secret_id`, creating the secret first
    /// if the project has no secret with that id
    ///
    /// Text payloads are stored as UTF-8; byte payloads unchanged.
    pub async fn upsert_secret(
        &self,
        secret_id: &str,
        payload: impl Into<SecretPayload>,
    ) -> Result<(), C::Error> {
        let payload = payload.into();
        let span = info_span!("secret_store.upsert", secret_id, project = self.project_id());

        async {
            if !self.secret_exists(secret_id).await? {
                self.create_secret(secret_id).await?;
            }

            let version = self
                .client
                .add_secret_version(&self.project_name().secret(secret_id), payload.as_bytes())
                .await?;
            metrics::increment_secrets_upserted();
            info!(version = version.version_id(), "Added secret version");
            Ok::<(), C::Error>(())
        }
        .instrument(span)
        .await
    }

    /// Whether a secret with exactly this id exists in the project
    ///
    /// Lists every secret and compares `secret_id` with the last segment of
    /// each fully-qualified name. A secret `db-pass` does not make `db` or
    /// `db-pass-2` exist.
    pub async fn secret_exists(&self, secret_id: &str) -> Result<bool, C::Error> {
        let secrets = self.client.list_secrets(&self.project_name()).await?;
        let exists = secrets.iter().any(|s| secret_id_of(&s.name) == secret_id);
        debug!(secret_id, exists, listed = secrets.len(), "Checked secret existence");
        Ok(exists)
    }

    /// Payload of `version` (a version number or `latest`) decoded as UTF-8
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD rather than rejected.
    pub async fn get_secret_string(
        &self,
        secret_id: &str,
        version: &str,
    ) -> Result<String, C::Error> {
        let bytes = self.get_secret_bytes(secret_id, version).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Raw payload bytes of `version` (a version number or `latest`)
    pub async fn get_secret_bytes(
        &self,
        secret_id: &str,
        version: &str,
    ) -> Result<Vec<u8>, C::Error> {
        let name = SecretVersionName::new(self.project_id(), secret_id, version);
        let bytes = self.client.access_secret_version(&name).await?;
        metrics::increment_secret_reads();
        debug!(secret = %name, "Read secret version");
        Ok(bytes)
    }

    /// Create an empty secret container with automatic replication
    async fn create_secret(&self, secret_id: &str) -> Result<(), C::Error> {
        let project = self.project_name();
        let created = self
            .client
            .create_secret(&project, secret_id, Replication::Automatic)
            .await?;
        metrics::increment_secrets_created();
        info!(secret = %created.name, "Created secret");
        Ok(())
    }
}
