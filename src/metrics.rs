// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the Primly operator.
//!
//! This module provides metrics collection with the namespace prefix
//! `primly_firestoned_io_` (prometheus-safe version of "primly.firestoned.io").
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Track reconciliation operations and their outcomes
//! - **Operator Metrics** - Track individual operator runs by stable name
//! - **Error Metrics** - Track reconciliation errors by stable kind
//! - **Probe Metrics** - Track instance probe failures
//! - **Cluster State Metrics** - Track synced replica counts
//! - **Leader Election Metrics** - Track leadership state changes

use prometheus::{
    CounterVec, Encoder, GaugeVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

/// Namespace prefix for all Primly metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "primly_firestoned_io";

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciliations by status
///
/// Labels:
/// - `status`: Outcome (`success`, `error`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciliations by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliations in seconds
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliations in seconds",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = Histogram::with_opts(opts).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of requeue operations
///
/// Labels:
/// - `reason`: Reason for requeue (`error`, `replication_lag`)
pub static REQUEUE_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_requeues_total"),
        "Total number of requeue operations by reason",
    );
    let counter = CounterVec::new(opts, &["reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Operator Metrics
// ============================================================================

/// Total number of operator runs by name and status
///
/// Labels:
/// - `operator`: Stable operator name (e.g. `update-primary`)
/// - `status`: Outcome (`success`, `error`)
pub static OPERATORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_operators_total"),
        "Total number of operator runs by name and status",
    );
    let counter = CounterVec::new(opts, &["operator", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of reconciliation errors by stable error kind
///
/// Labels:
/// - `kind`: Stable error kind (e.g. `UnavailableHost`, `ConstraintsViolation`,
///   `StoreConflict`)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of reconciliation errors by kind",
    );
    let counter = CounterVec::new(opts, &["kind"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Probe Metrics
// ============================================================================

/// Total number of instance probe failures
///
/// Labels:
/// - `cluster`: Name of the cluster the instance belongs to
pub static PROBE_FAILURES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_probe_failures_total"),
        "Total number of instance probe failures by cluster",
    );
    let counter = CounterVec::new(opts, &["cluster"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Cluster State Metrics
// ============================================================================

/// Number of synced replicas per cluster
///
/// Labels:
/// - `cluster`: Name of the cluster
pub static SYNCED_REPLICAS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_synced_replicas"),
        "Number of synced replicas by cluster",
    );
    let gauge = GaugeVec::new(opts, &["cluster"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Leader Election Metrics
// ============================================================================

/// Total number of leader election events
///
/// Labels:
/// - `status`: Event type (`acquired`, `lost`)
pub static LEADER_ELECTIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_leader_elections_total"),
        "Total number of leader election events by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Current leader election status
///
/// Labels:
/// - `pod_name`: Name of the pod
///
/// Value: 1 if leader, 0 if follower
pub static LEADER_STATUS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_leader_status"),
        "Current leader election status (1 = leader, 0 = follower)",
    );
    let gauge = GaugeVec::new(opts, &["pod_name"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful reconciliation
pub fn record_reconciliation_success(duration: Duration) {
    RECONCILIATION_TOTAL.with_label_values(&["success"]).inc();
    RECONCILIATION_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a failed reconciliation
pub fn record_reconciliation_error(duration: Duration) {
    RECONCILIATION_TOTAL.with_label_values(&["error"]).inc();
    RECONCILIATION_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a reconciliation requeue
///
/// # Arguments
/// * `reason` - Reason for requeue (e.g. `error`, `replication_lag`)
pub fn record_reconciliation_requeue(reason: &str) {
    REQUEUE_TOTAL.with_label_values(&[reason]).inc();
}

/// Record a reconciliation error by its stable kind
///
/// # Arguments
/// * `kind` - Stable error kind (e.g. `MySQLExecError`, `StoreConflict`)
pub fn record_error(kind: &str) {
    ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

/// Record an operator run
///
/// # Arguments
/// * `operator` - Stable operator name
/// * `status` - Outcome (`success`, `error`)
pub fn record_operator_run(operator: &str, status: &str) {
    OPERATORS_TOTAL
        .with_label_values(&[operator, status])
        .inc();
}

/// Record an instance probe failure
///
/// # Arguments
/// * `cluster` - Name of the cluster the instance belongs to
pub fn record_probe_failure(cluster: &str) {
    PROBE_FAILURES_TOTAL.with_label_values(&[cluster]).inc();
}

/// Record the synced replica count for a cluster
pub fn set_synced_replicas(cluster: &str, synced: i32) {
    SYNCED_REPLICAS
        .with_label_values(&[cluster])
        .set(f64::from(synced));
}

/// Record leader election acquired
///
/// # Arguments
/// * `pod_name` - Name of the pod that acquired leadership
pub fn record_leader_elected(pod_name: &str) {
    LEADER_ELECTIONS_TOTAL
        .with_label_values(&["acquired"])
        .inc();
    LEADER_STATUS.with_label_values(&[pod_name]).set(1.0);
}

/// Record leader election lost
///
/// # Arguments
/// * `pod_name` - Name of the pod that lost leadership
pub fn record_leader_lost(pod_name: &str) {
    LEADER_ELECTIONS_TOTAL.with_label_values(&["lost"]).inc();
    LEADER_STATUS.with_label_values(&[pod_name]).set(0.0);
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reconciliation_outcomes() {
        record_reconciliation_success(Duration::from_millis(500));
        record_reconciliation_error(Duration::from_millis(250));

        let successes = RECONCILIATION_TOTAL.with_label_values(&["success"]);
        assert!(successes.get() > 0.0);
        let errors = RECONCILIATION_TOTAL.with_label_values(&["error"]);
        assert!(errors.get() > 0.0);
        assert!(RECONCILIATION_DURATION_SECONDS.get_sample_count() >= 2);
    }

    #[test]
    fn test_record_operator_run() {
        record_operator_run("update-primary", "success");

        let counter = OPERATORS_TOTAL.with_label_values(&["update-primary", "success"]);
        assert!(counter.get() > 0.0);
    }

    #[test]
    fn test_record_error_by_kind() {
        record_error("ConstraintsViolation");

        let counter = ERRORS_TOTAL.with_label_values(&["ConstraintsViolation"]);
        assert!(counter.get() > 0.0);
    }

    #[test]
    fn test_synced_replicas_gauge() {
        set_synced_replicas("orders", 2);
        let gauge = SYNCED_REPLICAS.with_label_values(&["orders"]);
        assert!((gauge.get() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gather_metrics() {
        record_reconciliation_success(Duration::from_millis(100));

        let result = gather_metrics();
        assert!(result.is_ok(), "Gathering metrics should succeed");

        let metrics_text = result.unwrap();
        assert!(
            metrics_text.contains("primly_firestoned_io"),
            "Metrics should contain namespace prefix"
        );
        assert!(
            metrics_text.contains("reconciliations_total"),
            "Metrics should contain reconciliation counter"
        );
    }
}
