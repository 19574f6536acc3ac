//! # Constants
//!
//! Default values for configuration that can be overridden via environment variables.

/// Public Secret Manager REST endpoint
pub const DEFAULT_SECRET_MANAGER_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// Page size requested when listing secrets (API maximum is 25000)
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 250;

/// Per-request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// GCE/GKE metadata server token endpoint for the default service account
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Header the metadata server requires on every request
pub const METADATA_FLAVOR_HEADER: (&str, &str) = ("Metadata-Flavor", "Google");

/// Refresh cached metadata tokens this many seconds before they expire
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Environment variables consulted, in order, for the project id
pub const PROJECT_ID_ENV_VARS: [&str; 3] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT", "GCP_PROJECT"];
