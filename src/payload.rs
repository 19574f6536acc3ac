//! # Secret Payloads
//!
//! A secret payload is either raw bytes or UTF-8 text. The write path only
//! accepts [`SecretPayload`], so unsupported payload types are rejected at
//! compile time. Dynamic inputs (JSON documents, CLI arguments) go through
//! [`SecretPayload::try_from`] which rejects anything else with
//! [`PayloadError::UnsupportedPayloadType`] before any remote call is made.

use serde_json::Value;
use thiserror::Error;

/// Payload accepted by the write path
#[derive(Clone, PartialEq, Eq)]
pub enum SecretPayload {
    /// Raw bytes, stored unchanged
    Bytes(Vec<u8>),
    /// Text, stored as its UTF-8 encoding
    Text(String),
}

/// Local payload errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The value is neither a byte sequence nor text
    #[error("no support for handling payloads of type: {kind}")]
    UnsupportedPayloadType { kind: &'static str },
}

impl SecretPayload {
    /// Encoded bytes sent to the service
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Payloads are secret material; never print them
impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Bytes(_) => "Bytes",
            Self::Text(_) => "Text",
        };
        write!(f, "SecretPayload::{kind}(<{} bytes redacted>)", self.len())
    }
}

impl From<Vec<u8>> for SecretPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for SecretPayload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for SecretPayload {
    fn from(bytes: &[u8; N]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for SecretPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for SecretPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl TryFrom<Value> for SecretPayload {
    type Error = PayloadError;

    /// JSON strings become text, arrays of integers in `0..=255` become bytes
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(Self::Bytes)
                .ok_or(PayloadError::UnsupportedPayloadType {
                    kind: "array of non-byte values",
                }),
            other => Err(PayloadError::UnsupportedPayloadType {
                kind: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
