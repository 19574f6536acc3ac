//! # Response Types
//!
//! GCP Secret Manager REST API response structures (JSON, camelCase).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::provider::gcp::GcpError;
use crate::provider::{self, Secret as SecretModel, SecretVersion as SecretVersionModel};

/// Replication policy as it appears on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic: Option<AutomaticReplication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_managed: Option<UserManagedReplication>,
}

/// Automatic replication; the service chooses replica placement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutomaticReplication {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserManagedReplication {
    #[serde(default)]
    pub replicas: Vec<Replica>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replica {
    pub location: String,
}

/// Secret payload; `data` is base64 and omitted by the API when empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// `Secret` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretResource {
    pub name: String,
    #[serde(default)]
    pub replication: Option<Replication>,
    #[serde(default)]
    pub create_time: Option<String>,
}

/// `SecretVersion` resource returned by `:addVersion`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersionResource {
    pub name: String,
    #[serde(default)]
    pub create_time: Option<String>,
}

/// One page of `GET /v1/projects/{project}/secrets`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSecretsResponse {
    #[serde(default)]
    pub secrets: Vec<SecretResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Response of `GET .../versions/{version}:access`
#[derive(Debug, Clone, Deserialize)]
pub struct AccessSecretVersionResponse {
    pub name: String,
    #[serde(default)]
    pub payload: Option<SecretPayload>,
}

impl AccessSecretVersionResponse {
    /// Decode the base64 payload into raw bytes
    pub fn into_bytes(self) -> Result<Vec<u8>, GcpError> {
        let payload = self.payload.ok_or(GcpError::MissingPayload(self.name))?;
        match payload.data {
            Some(data) => Ok(STANDARD.decode(data)?),
            None => Ok(Vec::new()),
        }
    }
}

impl From<Replication> for provider::Replication {
    fn from(replication: Replication) -> Self {
        match replication.user_managed {
            Some(user_managed) if replication.automatic.is_none() => Self::UserManaged {
                locations: user_managed
                    .replicas
                    .into_iter()
                    .map(|r| r.location)
                    .collect(),
            },
            _ => Self::Automatic,
        }
    }
}

impl From<SecretResource> for SecretModel {
    fn from(resource: SecretResource) -> Self {
        Self {
            name: resource.name,
            replication: resource.replication.map(Into::into),
            create_time: resource.create_time,
        }
    }
}

impl From<SecretVersionResource> for SecretVersionModel {
    fn from(resource: SecretVersionResource) -> Self {
        Self {
            name: resource.name,
            create_time: resource.create_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_page_parsing() {
        let page: ListSecretsResponse = serde_json::from_value(json!({
            "secrets": [
                {"name": "projects/p/secrets/a", "replication": {"automatic": {}}, "createTime": "2024-01-01T00:00:00Z"},
                {"name": "projects/p/secrets/b", "replication": {"userManaged": {"replicas": [{"location": "europe-west1"}]}}}
            ],
            "nextPageToken": "tok"
        }))
        .unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("tok"));
        let secrets: Vec<SecretModel> = page.secrets.into_iter().map(Into::into).collect();
        assert_eq!(secrets[0].secret_id(), "a");
        assert_eq!(secrets[0].replication, Some(provider::Replication::Automatic));
        assert_eq!(
            secrets[1].replication,
            Some(provider::Replication::UserManaged {
                locations: vec!["europe-west1".to_string()]
            })
        );
    }

    #[test]
    fn test_empty_list_page() {
        let page: ListSecretsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(page.secrets.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_access_response_decoding() {
        let response: AccessSecretVersionResponse = serde_json::from_value(json!({
            "name": "projects/p/secrets/a/versions/1",
            "payload": {"data": "aGVsbG8=", "dataCrc32c": "907060870"}
        }))
        .unwrap();
        assert_eq!(response.into_bytes().unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_access_response_empty_and_missing_payload() {
        let empty: AccessSecretVersionResponse = serde_json::from_value(json!({
            "name": "projects/p/secrets/a/versions/1",
            "payload": {}
        }))
        .unwrap();
        assert!(empty.into_bytes().unwrap().is_empty());

        let missing: AccessSecretVersionResponse =
            serde_json::from_value(json!({"name": "projects/p/secrets/a/versions/1"})).unwrap();
        assert!(matches!(
            missing.into_bytes(),
            Err(GcpError::MissingPayload(_))
        ));
    }

    #[test]
    fn test_invalid_base64_payload() {
        let response: AccessSecretVersionResponse = serde_json::from_value(json!({
            "name": "projects/p/secrets/a/versions/1",
            "payload": {"data": "not base64!"}
        }))
        .unwrap();
        assert!(matches!(
            response.into_bytes(),
            Err(GcpError::InvalidPayload(_))
        ));
    }
}
