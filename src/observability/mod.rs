//! # Observability
//!
//! Prometheus metrics and tracing subscriber setup.

pub mod metrics;

/// Install the global `tracing` subscriber with an `EnvFilter`
///
/// `RUST_LOG` takes precedence over `default_directive`. Returns an error if a
/// global subscriber is already installed.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn init_tracing(
    default_directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
}
