//! # GCP Errors
//!
//! Errors returned by the REST client. Non-2xx responses are decoded from the
//! Google error envelope: `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`
//!
//! Reference: https://cloud.google.com/apis/design/errors

use serde::Deserialize;
use thiserror::Error;

/// Secret Manager REST client error
#[derive(Debug, Error)]
pub enum GcpError {
    /// Connection, TLS, timeout or body decoding failure
    #[error("Secret Manager request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status
    #[error("Secret Manager returned {status} ({code}): {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },
    /// The returned payload is not valid base64
    #[error("failed to decode secret payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
    /// An access response carried no payload object
    #[error("secret version {0} returned no payload")]
    MissingPayload(String),
    /// No bearer token could be obtained
    #[error("failed to obtain access token: {0}")]
    Auth(String),
    /// A resource id cannot be sent as a URL path segment; nothing was sent
    #[error("invalid resource name: {0}")]
    InvalidResourceName(#[from] paths::PathError),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GcpError {
    /// Build an `Api` error from a non-success status and its body
    pub(crate) fn from_response(http_status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Api {
                code: envelope.error.code.unwrap_or(http_status),
                status: envelope
                    .error
                    .status
                    .unwrap_or_else(|| canonical_status(http_status).to_string()),
                message: envelope.error.message,
            },
            Err(_) => Self::Api {
                code: http_status,
                status: canonical_status(http_status).to_string(),
                message: body.to_string(),
            },
        }
    }

    /// Canonical status string (`NOT_FOUND`, `PERMISSION_DENIED`, ...) for API errors
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Api { status, .. } => Some(status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some("NOT_FOUND")
    }

    pub fn is_already_exists(&self) -> bool {
        self.status() == Some("ALREADY_EXISTS")
    }

    pub fn is_permission_denied(&self) -> bool {
        self.status() == Some("PERMISSION_DENIED")
    }
}

/// Map an HTTP status code to the canonical Google RPC status string
fn canonical_status(http_status: u16) -> &'static str {
    match http_status {
        400 => "INVALID_ARGUMENT",
        401 => "UNAUTHENTICATED",
        403 => "PERMISSION_DENIED",
        404 => "NOT_FOUND",
        409 => "ALREADY_EXISTS",
        429 => "RESOURCE_EXHAUSTED",
        500 => "INTERNAL",
        503 => "UNAVAILABLE",
        504 => "DEADLINE_EXCEEDED",
        _ => "UNKNOWN",
    }
}
