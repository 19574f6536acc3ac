//! # Project Id Provider
//!
//! Supplies the GCP project id the store operates in. The id is resolved once
//! and stays stable for the lifetime of the provider.

use std::sync::Arc;

use crate::config::ConfigError;
use crate::constants::PROJECT_ID_ENV_VARS;

/// Source of the tenant/project identifier
pub trait ProjectIdProvider: Send + Sync {
    fn project_id(&self) -> &str;
}

impl ProjectIdProvider for String {
    fn project_id(&self) -> &str {
        self
    }
}

impl<T: ProjectIdProvider + ?Sized> ProjectIdProvider for Arc<T> {
    fn project_id(&self) -> &str {
        (**self).project_id()
    }
}

/// Project id taken from the standard Google Cloud environment variables
#[derive(Debug, Clone)]
pub struct EnvProjectIdProvider {
    project_id: String,
}

impl EnvProjectIdProvider {
    /// Resolve from `GOOGLE_CLOUD_PROJECT`, `GCLOUD_PROJECT` or `GCP_PROJECT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        PROJECT_ID_ENV_VARS
            .iter()
            .find_map(|key| {
                lookup(key)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            })
            .map(|project_id| Self { project_id })
            .ok_or_else(|| ConfigError::MissingProjectId(PROJECT_ID_ENV_VARS.join(", ")))
    }
}

impl ProjectIdProvider for EnvProjectIdProvider {
    fn project_id(&self) -> &str {
        &self.project_id
    }
}
