//! # Secret Manager Mock Server
//!
//! A lightweight Axum-based HTTP server that mocks the GCP Secret Manager
//! REST API v1 on top of an in-memory store.
//!
//! Used by the secret store integration tests and runnable standalone
//! (`gcp-mock-server`) for local development against `smctl --endpoint`.

pub mod errors;
pub mod gcp;
pub mod secrets;

pub use gcp::{router, serve, GcpAppState};
pub use secrets::{GcpSecretStore, SecretEntry, SecretVersion};

use axum::{extract::Request, middleware::Next, response::Response, Json};
use serde_json::{json, Value};
use tracing::info;

/// Health check handler
pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Log every request with its status code
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    info!("{} {} -> {}", method, path, response.status());
    response
}
