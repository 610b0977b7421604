// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Primly operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the Primly CRDs
pub const API_GROUP: &str = "primly.firestoned.io";

/// API version for the Primly CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "primly.firestoned.io/v1alpha1";

/// Kind name for the `MySQLCluster` resource
pub const KIND_MYSQL_CLUSTER: &str = "MySQLCluster";

/// Prefix for every Kubernetes object name derived from a cluster.
///
/// The unique name of a cluster is `"<prefix>-<cluster-name>"`; pods, the
/// headless service and the credentials secret all hang off this name.
pub const RESOURCE_PREFIX: &str = "primly";

// ============================================================================
// MySQL Constants
// ============================================================================

/// MySQL server port
pub const MYSQL_PORT: u16 = 3306;

/// Admin user the operator connects as for probing and primary-side changes
pub const MYSQL_ADMIN_USER: &str = "primly-admin";

/// Replication user configured in `CHANGE MASTER TO`
pub const MYSQL_REPLICATION_USER: &str = "primly-repl";

/// TCP connect timeout for MySQL handles
pub const MYSQL_CONNECT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Credentials Secret Constants
// ============================================================================

/// Suffix appended to the cluster unique name to locate the credentials secret
pub const CREDENTIALS_SECRET_SUFFIX: &str = "credentials";

/// Secret key holding the admin user password
pub const OPERATOR_PASSWORD_KEY: &str = "operator-password";

/// Secret key holding the replication user password
pub const REPLICATION_PASSWORD_KEY: &str = "replication-password";

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration while waiting for replicas to catch up (10 seconds)
pub const REPLICATION_WAIT_REQUEUE_SECS: u64 = 10;

// ============================================================================
// Leader Election Constants
// ============================================================================

/// Default leader election lease duration (15 seconds)
pub const DEFAULT_LEASE_DURATION_SECS: u64 = 15;

/// Default leader election renew deadline (10 seconds)
pub const DEFAULT_LEASE_RENEW_DEADLINE_SECS: u64 = 10;

/// Default leader election retry period (2 seconds)
pub const DEFAULT_LEASE_RETRY_PERIOD_SECS: u64 = 2;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Port for Prometheus metrics HTTP server
pub const METRICS_SERVER_PORT: u16 = 8080;

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Bind address for metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0";
