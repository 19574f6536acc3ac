//! GCP error response formatting
//!
//! Format: `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`
//! Reference: https://cloud.google.com/apis/design/errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// GCP error response
///
/// `status_string` defaults to the canonical status for the HTTP code.
pub fn gcp_error_response(
    status: StatusCode,
    message: impl Into<String>,
    status_string: Option<&str>,
) -> Response {
    let status_str = status_string.unwrap_or(match status {
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::CONFLICT => "ALREADY_EXISTS",
        StatusCode::UNAUTHORIZED => "UNAUTHENTICATED",
        StatusCode::FORBIDDEN => "PERMISSION_DENIED",
        StatusCode::BAD_REQUEST => "INVALID_ARGUMENT",
        StatusCode::TOO_MANY_REQUESTS => "RESOURCE_EXHAUSTED",
        StatusCode::SERVICE_UNAVAILABLE => "UNAVAILABLE",
        StatusCode::INTERNAL_SERVER_ERROR => "INTERNAL",
        _ => "UNKNOWN",
    });

    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": message.into(),
                "status": status_str
            }
        })),
    )
        .into_response()
}
