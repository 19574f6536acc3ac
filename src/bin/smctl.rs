//! # SMCTL CLI
//!
//! Command-line interface for the secret store.
//!
//! ## Usage
//!
//! ```bash
//! # Create the secret if needed and add a new version
//! smctl --project my-project put db-password --value hunter2
//! smctl put tls-key --file ./tls.key
//! smctl put api-key --json '"s3cr3t"'
//!
//! # Read a version (number or `latest`)
//! smctl get db-password
//! smctl get tls-key --version 3 --raw > tls.key
//!
//! # Check whether a secret exists
//! smctl exists db-password
//! ```
//!
//! The project falls back to `GOOGLE_CLOUD_PROJECT` / `GCLOUD_PROJECT` /
//! `GCP_PROJECT`; all other settings come from `StoreConfig::from_env`.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use secret_store::observability;
use secret_store::{
    EnvProjectIdProvider, ProjectIdProvider, SecretManagerREST, SecretPayload, SecretStore,
    StoreConfig, TokenSourceConfig, LATEST_VERSION,
};
use tracing::{debug, warn};

type Store = SecretStore<SecretManagerREST, Arc<dyn ProjectIdProvider>>;

/// Secret store CLI
#[derive(Parser)]
#[command(name = "smctl")]
#[command(about = "Create and read Google Cloud Secret Manager secrets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GCP project id (defaults to GOOGLE_CLOUD_PROJECT and friends)
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Secret Manager endpoint override, e.g. a local mock server
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Send requests without credentials
    #[arg(long, global = true)]
    anonymous: bool,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new version to a secret, creating the secret if it does not exist
    Put {
        /// Secret id
        secret_id: String,

        #[command(flatten)]
        source: PayloadSource,
    },
    /// Print the payload of a secret version
    Get {
        /// Secret id
        secret_id: String,

        /// Version number or `latest`
        #[arg(short, long, default_value = LATEST_VERSION)]
        version: String,

        /// Write the raw bytes instead of UTF-8 text
        #[arg(long)]
        raw: bool,
    },
    /// Report whether a secret exists (exit code 1 if it does not)
    Exists {
        /// Secret id
        secret_id: String,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PayloadSource {
    /// Text payload
    #[arg(long)]
    value: Option<String>,

    /// Read the payload bytes from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// JSON payload: a string, or an array of byte values
    #[arg(long)]
    json: Option<String>,
}

impl PayloadSource {
    fn into_payload(self) -> Result<SecretPayload> {
        if let Some(value) = self.value {
            return Ok(SecretPayload::Text(value));
        }
        if let Some(path) = self.file {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read payload file {}", path.display()))?;
            return Ok(SecretPayload::Bytes(bytes));
        }
        let raw = self.json.unwrap_or_default();
        let value: serde_json::Value =
            serde_json::from_str(&raw).context("Failed to parse --json payload")?;
        Ok(SecretPayload::try_from(value)?)
    }
}

/// Result of a successful command run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    /// `exists` found no secret with the given id
    NotFound,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::NotFound => ExitCode::from(1),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Configure rustls crypto provider before any TLS connection is made
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if let Err(e) = observability::init_tracing("smctl=info,secret_store=info") {
        eprintln!("Failed to initialize tracing: {e}");
    }

    let cli = Cli::parse();
    if cli.metrics {
        if let Err(e) = observability::metrics::register_metrics() {
            warn!("Failed to register metrics: {}", e);
        }
    }

    let store = build_store(&cli)?;
    let outcome = run(&store, cli.command).await;

    if cli.metrics {
        eprintln!("{}", observability::metrics::gather()?);
    }
    Ok(outcome?.into())
}

fn build_store(cli: &Cli) -> Result<Store> {
    let project: Arc<dyn ProjectIdProvider> = match &cli.project {
        Some(project) => Arc::new(project.clone()),
        None => Arc::new(
            EnvProjectIdProvider::from_env()
                .context("No project given; pass --project or set GOOGLE_CLOUD_PROJECT")?,
        ),
    };

    let mut config = StoreConfig::from_env();
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint.as_str());
    }
    if cli.anonymous {
        config = config.with_token_source(TokenSourceConfig::Anonymous);
    }

    let client = secret_store::provider::gcp::create_gcp_client(&config)
        .context("Failed to create Secret Manager client")?;
    Ok(SecretStore::new(client, project))
}

async fn run(store: &Store, command: Commands) -> Result<Outcome> {
    match command {
        Commands::Put { secret_id, source } => {
            let payload = source.into_payload()?;
            store
                .upsert_secret(&secret_id, payload)
                .await
                .with_context(|| format!("Failed to store secret '{secret_id}'"))?;
            println!(
                "✅ Stored new version of projects/{}/secrets/{}",
                store.project_id(),
                secret_id
            );
        }
        Commands::Get {
            secret_id,
            version,
            raw,
        } => {
            if raw {
                let bytes = store
                    .get_secret_bytes(&secret_id, &version)
                    .await
                    .with_context(|| format!("Failed to read secret '{secret_id}' version {version}"))?;
                std::io::stdout()
                    .write_all(&bytes)
                    .context("Failed to write payload to stdout")?;
            } else {
                let text = store
                    .get_secret_string(&secret_id, &version)
                    .await
                    .with_context(|| format!("Failed to read secret '{secret_id}' version {version}"))?;
                println!("{text}");
            }
        }
        Commands::Exists { secret_id } => {
            let exists = store
                .secret_exists(&secret_id)
                .await
                .with_context(|| format!("Failed to list secrets in project {}", store.project_id()))?;
            println!("{secret_id}: {}", if exists { "exists" } else { "not found" });
            if !exists {
                return Ok(Outcome::NotFound);
            }
        }
    }
    Ok(Outcome::Done)
}
