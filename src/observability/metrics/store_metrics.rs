//! # Store Metrics
//!
//! Metrics for store operations: upserts, secret containers created and payload reads.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::IntCounter;
use std::sync::LazyLock;

static SECRETS_UPSERTED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_store_secrets_upserted_total",
        "Total number of secret versions written through the store",
    )
    .expect("Failed to create SECRETS_UPSERTED_TOTAL metric - this should never happen")
});

static SECRETS_CREATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_store_secrets_created_total",
        "Total number of secret containers created by the store",
    )
    .expect("Failed to create SECRETS_CREATED_TOTAL metric - this should never happen")
});

static SECRET_READS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_store_secret_reads_total",
        "Total number of secret version payloads read through the store",
    )
    .expect("Failed to create SECRET_READS_TOTAL metric - this should never happen")
});

/// Register store metrics with the registry
pub(crate) fn register_store_metrics() -> Result<()> {
    REGISTRY.register(Box::new(SECRETS_UPSERTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRETS_CREATED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_READS_TOTAL.clone()))?;
    Ok(())
}

pub fn increment_secrets_upserted() {
    SECRETS_UPSERTED_TOTAL.inc();
}

pub fn increment_secrets_created() {
    SECRETS_CREATED_TOTAL.inc();
}

pub fn increment_secret_reads() {
    SECRET_READS_TOTAL.inc();
}
