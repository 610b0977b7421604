// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared types and imports for `MySQLCluster` reconciliation.
//!
//! This module provides common type re-exports used across the
//! mysqlcluster reconciliation modules.

#![allow(clippy::wildcard_imports)]

// Re-export commonly used types from parent modules
pub use crate::context::Context;
pub use crate::crd::{
    ClusterCondition, ClusterConditionType, ConditionStatus, MySQLCluster, MySQLClusterStatus,
};
pub use crate::errors::ClusteringError;
pub use crate::mysql::{ClusterObservation, InstanceObservation};

// Re-export kube-rs types
pub use kube::{
    api::PostParams,
    client::Client,
    runtime::controller::Action,
    Api, ResourceExt,
};

// Re-export common utilities
pub use std::sync::Arc;
pub use std::time::Duration;
pub use tracing::{debug, error, info, warn};
