//! # GCP Secret Manager Routes
//!
//! Handlers for the Secret Manager REST API v1 subset used by the secret store:
//!
//! - `GET    /v1/projects/{project}/secrets` - list secrets (paginated)
//! - `POST   /v1/projects/{project}/secrets?secretId=` - create a secret
//! - `GET    /v1/projects/{project}/secrets/{secret}` - secret metadata
//! - `DELETE /v1/projects/{project}/secrets/{secret}` - delete a secret
//! - `POST   /v1/projects/{project}/secrets/{secret}:addVersion` - add a version
//! - `GET    /v1/projects/{project}/secrets/{secret}/versions/{version}:access` - access a version
//! - `POST   /v1/projects/{project}/secrets/{secret}/versions/{version}:disable` - disable a version
//!
//! Custom methods (`:addVersion`, `:access`, `:disable`) arrive as part of the
//! last path segment and are split off by the handlers. Path parameters are
//! percent-decoded, so `%2F` inside a segment never selects another resource.

use std::net::SocketAddr;

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use paths::gcp::{
    ACCESS_METHOD, ADD_VERSION_METHOD, DISABLE_METHOD, ROUTE_SECRET, ROUTE_SECRETS,
    ROUTE_SECRET_VERSION,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::errors::gcp_error_response;
use crate::secrets::{CreateError, GcpSecretStore, SecretEntry};
use crate::{health_check, logging_middleware};

/// Default and maximum `pageSize` for list requests
const DEFAULT_PAGE_SIZE: usize = 25_000;

/// Longest secret id the service accepts
const MAX_SECRET_ID_LEN: usize = 255;

/// GCP-specific application state
#[derive(Clone, Debug, Default)]
pub struct GcpAppState {
    pub secrets: GcpSecretStore,
}

impl GcpAppState {
    pub fn new(secrets: GcpSecretStore) -> Self {
        Self { secrets }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page_size: Option<usize>,
    page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    secret_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateSecretRequest {
    #[serde(default)]
    replication: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct AddVersionRequest {
    payload: SecretPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SecretResponse {
    name: String,
    replication: Value,
    create_time: String,
}

impl From<SecretEntry> for SecretResponse {
    fn from(entry: SecretEntry) -> Self {
        Self {
            name: entry.name,
            replication: entry.replication,
            create_time: entry.create_time,
        }
    }
}

/// Secret ids are 1-255 characters of `[A-Za-z0-9_-]`
fn is_valid_secret_id(secret_id: &str) -> bool {
    !secret_id.is_empty()
        && secret_id.len() <= MAX_SECRET_ID_LEN
        && secret_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Split `name:method` into its parts; the method follows the last `:`
fn split_method(segment: &str) -> (&str, Option<&str>) {
    match segment.rsplit_once(':') {
        Some((name, method)) => (name, Some(method)),
        None => (segment, None),
    }
}

/// GET list of secrets
///
/// Page tokens are stringified offsets into the name-ordered listing.
async fn list_secrets(
    State(app_state): State<GcpAppState>,
    Path(project): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let all = app_state.secrets.list_secrets(&project).await;
    let page_size = params
        .page_size
        .filter(|n| *n > 0)
        .map_or(DEFAULT_PAGE_SIZE, |n| n.min(DEFAULT_PAGE_SIZE));
    let offset = match params.page_token.as_deref().filter(|t| !t.is_empty()) {
        None => 0,
        Some(token) => match token.parse::<usize>() {
            Ok(offset) => offset,
            Err(_) => {
                return gcp_error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid page token: {token}"),
                    None,
                )
            }
        },
    };

    info!(
        "  LIST secrets: project={}, offset={}, page_size={}",
        project, offset, page_size
    );

    let total = all.len();
    let page: Vec<SecretResponse> = all
        .into_iter()
        .skip(offset)
        .take(page_size)
        .map(SecretResponse::from)
        .collect();
    let next = offset + page.len();

    let mut body = json!({ "secrets": page, "totalSize": total });
    if next < total {
        body["nextPageToken"] = json!(next.to_string());
    }
    Json(body).into_response()
}

/// CREATE secret
async fn create_secret(
    State(app_state): State<GcpAppState>,
    Path(project): Path<String>,
    Query(params): Query<CreateParams>,
    Json(body): Json<CreateSecretRequest>,
) -> Response {
    let Some(secret_id) = params.secret_id.filter(|s| !s.is_empty()) else {
        return gcp_error_response(
            StatusCode::BAD_REQUEST,
            "secretId query parameter is required",
            None,
        );
    };
    if !is_valid_secret_id(&secret_id) {
        warn!("  Rejected secret id: {:?}", secret_id);
        return gcp_error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "Secret id [{secret_id}] must be 1-{MAX_SECRET_ID_LEN} characters of [a-zA-Z0-9_-]"
            ),
            None,
        );
    }
    info!("  CREATE secret: project={}, secret_id={}", project, secret_id);

    match app_state
        .secrets
        .create_secret(&project, &secret_id, body.replication)
        .await
    {
        Ok(entry) => Json(SecretResponse::from(entry)).into_response(),
        Err(CreateError::AlreadyExists(name)) => {
            warn!("  Secret already exists: {}", name);
            gcp_error_response(
                StatusCode::CONFLICT,
                format!("Secret [{name}] already exists."),
                None,
            )
        }
    }
}

/// GET secret metadata
async fn get_secret(
    State(app_state): State<GcpAppState>,
    Path((project, secret)): Path<(String, String)>,
) -> Response {
    match app_state.secrets.get_metadata(&project, &secret).await {
        Some(entry) => Json(SecretResponse::from(entry)).into_response(),
        None => secret_not_found(&project, &secret),
    }
}

/// DELETE secret
async fn delete_secret(
    State(app_state): State<GcpAppState>,
    Path((project, secret)): Path<(String, String)>,
) -> Response {
    info!("  DELETE secret: project={}, secret={}", project, secret);
    if app_state.secrets.delete_secret(&project, &secret).await {
        Json(json!({})).into_response()
    } else {
        secret_not_found(&project, &secret)
    }
}

/// POST `{secret}:addVersion`
async fn secret_custom_method(
    State(app_state): State<GcpAppState>,
    Path((project, segment)): Path<(String, String)>,
    Json(body): Json<AddVersionRequest>,
) -> Response {
    let (secret, method) = split_method(&segment);
    if method != Some(ADD_VERSION_METHOD) {
        return gcp_error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown method on secret: {segment}"),
            None,
        );
    }

    info!("  ADD VERSION: project={}, secret={}", project, secret);
    match app_state
        .secrets
        .add_version(&project, secret, body.payload.data)
        .await
    {
        Some(version) => Json(json!({
            "name": format!("projects/{project}/secrets/{secret}/versions/{}", version.version_id),
            "createTime": version.create_time,
            "state": "ENABLED",
        }))
        .into_response(),
        None => secret_not_found(&project, secret),
    }
}

/// GET `{version}:access`
async fn access_version(
    State(app_state): State<GcpAppState>,
    Path((project, secret, segment)): Path<(String, String, String)>,
) -> Response {
    let (version_id, method) = split_method(&segment);
    if method != Some(ACCESS_METHOD) {
        return gcp_error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown method on version: {segment}"),
            None,
        );
    }

    info!(
        "  ACCESS version: project={}, secret={}, version={}",
        project, secret, version_id
    );
    match app_state.secrets.get_version(&project, &secret, version_id).await {
        Some(version) => Json(json!({
            "name": format!("projects/{project}/secrets/{secret}/versions/{}", version.version_id),
            "payload": { "data": version.data },
        }))
        .into_response(),
        None => {
            warn!(
                "  Version not found: projects/{}/secrets/{}/versions/{}",
                project, secret, version_id
            );
            gcp_error_response(
                StatusCode::NOT_FOUND,
                format!("Secret Version [projects/{project}/secrets/{secret}/versions/{version_id}] not found."),
                None,
            )
        }
    }
}

/// POST `{version}:disable`
async fn version_custom_method(
    State(app_state): State<GcpAppState>,
    Path((project, secret, segment)): Path<(String, String, String)>,
) -> Response {
    let (version_id, method) = split_method(&segment);
    if method != Some(DISABLE_METHOD) {
        return gcp_error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown method on version: {segment}"),
            None,
        );
    }

    info!(
        "  DISABLE version: project={}, secret={}, version={}",
        project, secret, version_id
    );
    match app_state
        .secrets
        .disable_version(&project, &secret, version_id)
        .await
    {
        Some(version) => Json(json!({
            "name": format!("projects/{project}/secrets/{secret}/versions/{}", version.version_id),
            "createTime": version.create_time,
            "state": "DISABLED",
        }))
        .into_response(),
        None => gcp_error_response(
            StatusCode::NOT_FOUND,
            format!("Secret Version [projects/{project}/secrets/{secret}/versions/{version_id}] not found."),
            None,
        ),
    }
}

fn secret_not_found(project: &str, secret: &str) -> Response {
    gcp_error_response(
        StatusCode::NOT_FOUND,
        format!("Secret [projects/{project}/secrets/{secret}] not found."),
        None,
    )
}

async fn unmatched_route(method: Method, uri: Uri) -> Response {
    warn!("  Unmatched route: {} {}", method, uri.path());
    gcp_error_response(
        StatusCode::NOT_FOUND,
        format!("Route not found: {} {}", method, uri.path()),
        None,
    )
}

/// Build the router with all Secret Manager routes
pub fn router(state: GcpAppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route(ROUTE_SECRETS, get(list_secrets).post(create_secret))
        .route(
            ROUTE_SECRET,
            get(get_secret)
                .delete(delete_secret)
                .post(secret_custom_method),
        )
        .route(
            ROUTE_SECRET_VERSION,
            get(access_version).post(version_custom_method),
        )
        .fallback(unmatched_route)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}

/// Bind `addr`, spawn the server in the background and return the bound address
///
/// Binding port 0 picks a free port, which is how the tests run it.
pub async fn serve(addr: SocketAddr, state: GcpAppState) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(state)).await {
            warn!("Mock server stopped: {}", e);
        }
    });
    Ok(local_addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    fn test_server() -> (TestServer, GcpSecretStore) {
        let secrets = GcpSecretStore::new();
        let server = TestServer::new(router(GcpAppState::new(secrets.clone()))).unwrap();
        (server, secrets)
    }

    #[test]
    fn test_split_method() {
        assert_eq!(split_method("db:addVersion"), ("db", Some("addVersion")));
        assert_eq!(split_method("latest:access"), ("latest", Some("access")));
        assert_eq!(split_method("db"), ("db", None));
        assert_eq!(split_method("a:b:access"), ("a:b", Some("access")));
    }

    #[test]
    fn test_secret_id_validation() {
        assert!(is_valid_secret_id("db_pass-2"));
        assert!(is_valid_secret_id(&"a".repeat(255)));
        let too_long = "a".repeat(256);
        for id in ["", "a#b", "a?b", "a/b", "..", "a b", "ü", too_long.as_str()] {
            assert!(!is_valid_secret_id(id), "accepted {id:?}");
        }
    }

    #[tokio::test]
    async fn test_create_with_invalid_secret_id_is_rejected() {
        let (server, secrets) = test_server();
        let response = server
            .post("/v1/projects/p/secrets")
            .add_query_param("secretId", "a#b")
            .json(&json!({"replication": {"automatic": {}}}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["status"], "INVALID_ARGUMENT");
        assert!(secrets.list_secrets("p").await.is_empty());
    }

    #[tokio::test]
    async fn test_encoded_slashes_stay_inside_the_version_segment() {
        let (server, secrets) = test_server();
        for id in ["public", "admin"] {
            secrets.create_secret("p", id, json!({})).await.unwrap();
        }
        secrets.add_version("p", "admin", "VE9Q".to_string()).await.unwrap();

        let response = server
            .get("/v1/projects/p/secrets/public/versions/..%2F..%2Fadmin%2Fversions%2F1:access")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_disable_version() {
        let (server, secrets) = test_server();
        secrets.create_secret("p", "db", json!({})).await.unwrap();
        secrets.add_version("p", "db", "MQ==".to_string()).await.unwrap();
        secrets.add_version("p", "db", "Mg==".to_string()).await.unwrap();

        let response = server
            .post("/v1/projects/p/secrets/db/versions/2:disable")
            .json(&json!({}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["state"], "DISABLED");

        let latest = server
            .get("/v1/projects/p/secrets/db/versions/latest:access")
            .await
            .json::<Value>();
        assert_eq!(latest["payload"]["data"], "MQ==");

        server
            .post("/v1/projects/p/secrets/db/versions/9:disable")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_add_and_access() {
        let (server, secrets) = test_server();

        server
            .post("/v1/projects/p/secrets")
            .add_query_param("secretId", "db")
            .json(&json!({"replication": {"automatic": {}}}))
            .await
            .assert_status_ok();

        let added = server
            .post("/v1/projects/p/secrets/db:addVersion")
            .json(&json!({"payload": {"data": "aGVsbG8="}}))
            .await;
        added.assert_status_ok();
        assert_eq!(
            added.json::<Value>()["name"],
            "projects/p/secrets/db/versions/1"
        );

        let accessed = server
            .get("/v1/projects/p/secrets/db/versions/latest:access")
            .await;
        accessed.assert_status_ok();
        assert_eq!(accessed.json::<Value>()["payload"]["data"], "aGVsbG8=");
        assert_eq!(secrets.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_conflict() {
        let (server, _secrets) = test_server();
        for expected in [StatusCode::OK, StatusCode::CONFLICT] {
            let response = server
                .post("/v1/projects/p/secrets")
                .add_query_param("secretId", "dup")
                .json(&json!({"replication": {"automatic": {}}}))
                .await;
            response.assert_status(expected);
        }
    }

    #[tokio::test]
    async fn test_add_version_to_missing_secret_is_not_found() {
        let (server, _secrets) = test_server();
        let response = server
            .post("/v1/projects/p/secrets/ghost:addVersion")
            .json(&json!({"payload": {"data": "eA=="}}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"]["status"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let (server, secrets) = test_server();
        for id in ["a", "b", "c"] {
            secrets.create_secret("p", id, json!({})).await.unwrap();
        }

        let first = server
            .get("/v1/projects/p/secrets")
            .add_query_param("pageSize", 2)
            .await
            .json::<Value>();
        assert_eq!(first["secrets"].as_array().unwrap().len(), 2);
        assert_eq!(first["nextPageToken"], "2");

        let second = server
            .get("/v1/projects/p/secrets")
            .add_query_param("pageSize", 2)
            .add_query_param("pageToken", "2")
            .await
            .json::<Value>();
        assert_eq!(second["secrets"][0]["name"], "projects/p/secrets/c");
        assert!(second.get("nextPageToken").is_none());
    }

    #[tokio::test]
    async fn test_create_without_secret_id_is_invalid() {
        let (server, _secrets) = test_server();
        let response = server
            .post("/v1/projects/p/secrets")
            .json(&json!({"replication": {"automatic": {}}}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
