//! # Request Types
//!
//! GCP Secret Manager REST API request structures.
//!
//! These structs represent the JSON payloads used for communication with the
//! GCP Secret Manager REST API v1. They are designed to match the API schema
//! as documented at:
//! https://cloud.google.com/secret-manager/docs/reference/rest

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use super::responses::{AutomaticReplication, Replica, Replication, SecretPayload, UserManagedReplication};
use crate::provider;

/// Request body for creating a new secret
///
/// Used in `POST /v1/projects/{project}/secrets?secretId={secret_id}`.
/// The secret id travels as a query parameter; the body is the `Secret`
/// resource itself. This creates the secret metadata only, not the secret
/// value. To add a value, use `AddVersionRequest` after creating the secret.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets/create
#[derive(Debug, Serialize)]
pub struct CreateSecretRequest {
    /// Replication configuration for the secret
    pub replication: Replication,
}

impl CreateSecretRequest {
    pub fn new(replication: &provider::Replication) -> Self {
        let replication = match replication {
            provider::Replication::Automatic => Replication {
                automatic: Some(AutomaticReplication {}),
                user_managed: None,
            },
            provider::Replication::UserManaged { locations } => Replication {
                automatic: None,
                user_managed: Some(UserManagedReplication {
                    replicas: locations
                        .iter()
                        .map(|location| Replica {
                            location: location.clone(),
                        })
                        .collect(),
                }),
            },
        };
        Self { replication }
    }
}

/// Request body for adding a new version to an existing secret
///
/// Used in `POST /v1/projects/{project}/secrets/{secret}:addVersion` to add
/// a new version with secret data to an existing secret.
///
/// **Important**: The payload data must be base64-encoded before sending.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets/addVersion
#[derive(Debug, Serialize)]
pub struct AddVersionRequest {
    /// The secret payload containing the base64-encoded secret value
    pub payload: SecretPayload,
}

impl AddVersionRequest {
    /// Create a new request, base64-encoding the raw payload bytes
    pub fn new(data: &[u8]) -> Self {
        Self {
            payload: SecretPayload {
                data: Some(STANDARD.encode(data)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_secret_body_uses_automatic_replication() {
        let body =
            serde_json::to_value(CreateSecretRequest::new(&provider::Replication::Automatic))
                .unwrap();
        assert_eq!(body, json!({"replication": {"automatic": {}}}));
    }

    #[test]
    fn test_create_secret_body_user_managed() {
        let replication = provider::Replication::UserManaged {
            locations: vec!["us-east1".to_string()],
        };
        let body = serde_json::to_value(CreateSecretRequest::new(&replication)).unwrap();
        assert_eq!(
            body,
            json!({"replication": {"userManaged": {"replicas": [{"location": "us-east1"}]}}})
        );
    }

    #[test]
    fn test_add_version_body_is_base64() {
        let body = serde_json::to_value(AddVersionRequest::new(b"hello")).unwrap();
        assert_eq!(body, json!({"payload": {"data": "aGVsbG8="}}));
    }
}
