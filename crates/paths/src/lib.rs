//! Shared API path definitions for GCP Secret Manager
//!
//! This crate centralizes resource names and REST paths to ensure consistency
//! between the secret store client and the mock server implementation.
//!
//! ## Resource Names
//!
//! `ProjectName`, `SecretName` and `SecretVersionName` render the
//! fully-qualified names the API uses (`projects/{p}/secrets/{s}/versions/{v}`)
//! and parse them back.
//!
//! ## REST Paths
//!
//! `RestPath` keeps the raw segments of a call so the client can percent-encode
//! each one separately; resource ids never get spliced into a URL string.
//!
//! ## Route Constants
//!
//! Route constants are provided for Axum routes, which require static string literals.
//! These constants are validated against the path builders in tests.

pub mod errors;
pub mod gcp;

// Re-export core types for convenience
pub use errors::PathError;
pub use gcp::{
    secret_id_of, ProjectName, RestPath, SecretName, SecretVersionName, LATEST_VERSION,
};
