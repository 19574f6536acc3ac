//! GCP Secret Manager Mock Server
//!
//! Serves the in-memory Secret Manager API for local development:
//!
//! ```bash
//! PORT=1234 gcp-mock-server
//! smctl --endpoint http://localhost:1234 --anonymous --project dev put db-password --value x
//! ```
//!
//! Environment Variables:
//! - PORT: Port to listen on (default: 1234)
//! - RUST_LOG: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use mock_server::{router, GcpAppState, GcpSecretStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let port = env::var("PORT")
        .unwrap_or_else(|_| "1234".to_string())
        .parse::<u16>()
        .context("PORT must be a valid u16")?;

    info!("Starting GCP Secret Manager Mock Server...");

    let app = router(GcpAppState::new(GcpSecretStore::new()));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("✅ GCP Mock server ready on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
