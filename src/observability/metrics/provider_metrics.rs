//! # Provider Metrics
//!
//! Metrics for remote Secret Manager API calls, labelled by operation
//! (`list_secrets`, `create_secret`, `add_secret_version`, `access_secret_version`).

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec};
use std::sync::LazyLock;
use std::time::Duration;

static PROVIDER_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_store_provider_operations_total",
            "Total number of Secret Manager API operations",
        ),
        &["operation"],
    )
    .expect("Failed to create PROVIDER_OPERATIONS_TOTAL metric - this should never happen")
});

static PROVIDER_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_store_provider_operation_errors_total",
            "Total number of failed Secret Manager API operations",
        ),
        &["operation"],
    )
    .expect("Failed to create PROVIDER_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static PROVIDER_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secret_store_provider_operation_duration_seconds",
            "Duration of Secret Manager API operations in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["operation"],
    )
    .expect("Failed to create PROVIDER_OPERATION_DURATION metric - this should never happen")
});

/// Register provider metrics with the registry
pub(crate) fn register_provider_metrics() -> Result<()> {
    REGISTRY.register(Box::new(PROVIDER_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PROVIDER_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PROVIDER_OPERATION_DURATION.clone()))?;
    Ok(())
}

/// Record one completed API call
pub fn observe_provider_operation(operation: &str, duration: Duration, success: bool) {
    PROVIDER_OPERATIONS_TOTAL
        .with_label_values(&[operation])
        .inc();
    PROVIDER_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
    if !success {
        PROVIDER_OPERATION_ERRORS_TOTAL
            .with_label_values(&[operation])
            .inc();
    }
}

/// Number of recorded calls for an operation
pub fn provider_operations_total(operation: &str) -> u64 {
    PROVIDER_OPERATIONS_TOTAL
        .with_label_values(&[operation])
        .get()
}

/// Number of recorded failed calls for an operation
pub fn provider_operation_errors_total(operation: &str) -> u64 {
    PROVIDER_OPERATION_ERRORS_TOTAL
        .with_label_values(&[operation])
        .get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_provider_operation_counts_errors() {
        // Unique label so parallel tests do not interfere
        let operation = "test_observe_operation";
        observe_provider_operation(operation, Duration::from_millis(12), true);
        observe_provider_operation(operation, Duration::from_millis(40), false);

        assert_eq!(provider_operations_total(operation), 2);
        assert_eq!(provider_operation_errors_total(operation), 1);
    }
}
