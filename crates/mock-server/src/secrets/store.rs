//! GCP secret store implementation
//!
//! Keyed by fully-qualified secret name (`projects/{project}/secrets/{secret}`):
//! - Secrets must be created before versions can be added
//! - Version ids are sequential ("1", "2", ...) per secret
//! - `latest` resolves to the newest enabled version

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use paths::{SecretName, LATEST_VERSION};
use serde_json::Value;
use tokio::sync::RwLock;

/// A stored secret version
#[derive(Debug, Clone)]
pub struct SecretVersion {
    pub version_id: String,
    /// Base64 payload exactly as received
    pub data: String,
    /// RFC3339 creation time
    pub create_time: String,
    pub enabled: bool,
}

/// A stored secret container
#[derive(Debug, Clone)]
pub struct SecretEntry {
    pub name: String,
    /// Replication config as received on creation
    pub replication: Value,
    pub create_time: String,
    pub versions: Vec<SecretVersion>,
}

/// Secret creation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    AlreadyExists(String),
}

/// GCP Secret Manager in-memory store
#[derive(Clone, Debug, Default)]
pub struct GcpSecretStore {
    secrets: Arc<RwLock<BTreeMap<String, SecretEntry>>>,
    create_calls: Arc<AtomicUsize>,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl GcpSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format GCP secret key
    pub fn format_key(project: &str, secret: &str) -> String {
        SecretName::new(project, secret).to_string()
    }

    /// Create a secret container; fails if it already exists
    pub async fn create_secret(
        &self,
        project: &str,
        secret: &str,
        replication: Value,
    ) -> Result<SecretEntry, CreateError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let key = Self::format_key(project, secret);
        let mut secrets = self.secrets.write().await;
        if secrets.contains_key(&key) {
            return Err(CreateError::AlreadyExists(key));
        }
        let entry = SecretEntry {
            name: key.clone(),
            replication,
            create_time: now_rfc3339(),
            versions: Vec::new(),
        };
        secrets.insert(key, entry.clone());
        Ok(entry)
    }

    /// Number of create requests received, including rejected duplicates
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// All secrets of a project, ordered by name
    pub async fn list_secrets(&self, project: &str) -> Vec<SecretEntry> {
        let prefix = format!("projects/{project}/secrets/");
        self.secrets
            .read()
            .await
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    pub async fn get_metadata(&self, project: &str, secret: &str) -> Option<SecretEntry> {
        let key = Self::format_key(project, secret);
        self.secrets.read().await.get(&key).cloned()
    }

    pub async fn exists(&self, project: &str, secret: &str) -> bool {
        let key = Self::format_key(project, secret);
        self.secrets.read().await.contains_key(&key)
    }

    /// Delete a secret and all of its versions
    pub async fn delete_secret(&self, project: &str, secret: &str) -> bool {
        let key = Self::format_key(project, secret);
        self.secrets.write().await.remove(&key).is_some()
    }

    /// Add a version; `None` if the secret does not exist
    pub async fn add_version(&self, project: &str, secret: &str, data: String) -> Option<SecretVersion> {
        let key = Self::format_key(project, secret);
        let mut secrets = self.secrets.write().await;
        let entry = secrets.get_mut(&key)?;
        let version = SecretVersion {
            version_id: (entry.versions.len() + 1).to_string(),
            data,
            create_time: now_rfc3339(),
            enabled: true,
        };
        entry.versions.push(version.clone());
        Some(version)
    }

    /// Get a version by id or `latest`; disabled versions are not returned
    pub async fn get_version(&self, project: &str, secret: &str, version_id: &str) -> Option<SecretVersion> {
        let key = Self::format_key(project, secret);
        let secrets = self.secrets.read().await;
        let versions = &secrets.get(&key)?.versions;
        let version = if version_id == LATEST_VERSION {
            versions.iter().rev().find(|v| v.enabled)
        } else {
            versions.iter().find(|v| v.version_id == version_id && v.enabled)
        };
        version.cloned()
    }

    /// Disable a version; `None` if it does not exist
    pub async fn disable_version(
        &self,
        project: &str,
        secret: &str,
        version_id: &str,
    ) -> Option<SecretVersion> {
        let key = Self::format_key(project, secret);
        let mut secrets = self.secrets.write().await;
        let version = secrets
            .get_mut(&key)?
            .versions
            .iter_mut()
            .find(|v| v.version_id == version_id)?;
        version.enabled = false;
        Some(version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_is_rejected_for_duplicates() {
        let store = GcpSecretStore::new();
        store.create_secret("p", "a", json!({"automatic": {}})).await.unwrap();
        let err = store.create_secret("p", "a", json!({})).await.unwrap_err();
        assert_eq!(err, CreateError::AlreadyExists("projects/p/secrets/a".to_string()));
        assert_eq!(store.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_versions_are_sequential_and_latest_skips_disabled() {
        let store = GcpSecretStore::new();
        assert!(store.add_version("p", "a", "eA==".to_string()).await.is_none());

        store.create_secret("p", "a", json!({})).await.unwrap();
        let v1 = store.add_version("p", "a", "MQ==".to_string()).await.unwrap();
        let v2 = store.add_version("p", "a", "Mg==".to_string()).await.unwrap();
        assert_eq!((v1.version_id.as_str(), v2.version_id.as_str()), ("1", "2"));

        assert_eq!(store.get_version("p", "a", "latest").await.unwrap().data, "Mg==");
        assert!(!store.disable_version("p", "a", "2").await.unwrap().enabled);
        assert_eq!(store.get_version("p", "a", "latest").await.unwrap().data, "MQ==");
        assert!(store.get_version("p", "a", "2").await.is_none());
        assert!(store.get_version("p", "a", "99").await.is_none());
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_project() {
        let store = GcpSecretStore::new();
        for (project, secret) in [("p", "b"), ("p", "a"), ("p2", "c"), ("q", "d")] {
            store.create_secret(project, secret, json!({})).await.unwrap();
        }
        let names: Vec<String> = store.list_secrets("p").await.into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["projects/p/secrets/a", "projects/p/secrets/b"]);
    }

    #[tokio::test]
    async fn test_delete_secret() {
        let store = GcpSecretStore::new();
        store.create_secret("p", "a", json!({})).await.unwrap();
        assert!(store.delete_secret("p", "a").await);
        assert!(!store.exists("p", "a").await);
        assert!(!store.delete_secret("p", "a").await);
    }
}
