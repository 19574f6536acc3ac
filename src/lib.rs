//! # Secret Store
//!
//! A thin convenience layer over Google Cloud Secret Manager.
//!
//! [`SecretStore`] upserts a named secret (creating the secret container on
//! first use, then adding a new version) and reads back the payload of a named
//! version as text or raw bytes. Storage, replication, versioning and access
//! control stay with the remote service; errors from the remote client are
//! returned unchanged.
//!
//! ```no_run
//! use secret_store::{SecretManagerREST, SecretStore, StoreConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = StoreConfig::from_env();
//! let client = SecretManagerREST::new(&config)?;
//! let store = SecretStore::new(client, "my-project".to_string());
//!
//! store.upsert_secret("db-password", "hunter2").await?;
//! let value = store.get_secret_string("db-password", "latest").await?;
//! # Ok(())
//! # }
//! ```
//!
//! Operations outside the upsert/read path (delete, IAM, rotation) are reached
//! through [`SecretStore::client`].

pub mod config;
pub mod constants;
pub mod observability;
pub mod payload;
pub mod project;
pub mod provider;
pub mod store;

pub use config::{ConfigError, StoreConfig, TokenSourceConfig};
pub use payload::{PayloadError, SecretPayload};
pub use project::{EnvProjectIdProvider, ProjectIdProvider};
pub use provider::gcp::{GcpError, SecretManagerREST};
pub use provider::{Replication, Secret, SecretManagerClient, SecretVersion};
pub use store::SecretStore;

// Resource names shared with the mock server
pub use paths::{ProjectName, SecretName, SecretVersionName, LATEST_VERSION};
