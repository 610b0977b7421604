// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for MySQL cluster management.
//!
//! This module defines the `MySQLCluster` resource: a declared set of MySQL
//! instances that the operator drives toward exactly one writable primary
//! with all remaining instances replicating from it over semi-synchronous
//! replication.
//!
//! # Resource Types
//!
//! - [`MySQLCluster`] - A replicated MySQL cluster with a status subresource
//!
//! # Example: Declaring a Cluster
//!
//! ```rust,no_run
//! use primly::crd::MySQLClusterSpec;
//!
//! let spec = MySQLClusterSpec { replicas: 3 };
//! ```
//!
//! The status subresource carries the persisted primary ordinal, the number
//! of replicas considered synced, and the condition set (`Available`,
//! `Healthy`, `OutOfSync`, `Failure`, `Violation`) that external observers
//! consume.

use crate::constants::{CREDENTIALS_SECRET_SUFFIX, RESOURCE_PREFIX};
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Specification of a `MySQLCluster`.
///
/// The spec is deliberately small: the cluster identity (name + namespace)
/// and the number of instances. Instance materialization (pods, services,
/// secrets) is handled outside the clustering controller.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "primly.firestoned.io",
    version = "v1alpha1",
    kind = "MySQLCluster",
    namespaced,
    status = "MySQLClusterStatus",
    shortname = "msc",
    printcolumn = r#"{"name":"Replicas","type":"integer","jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.ready"}"#,
    printcolumn = r#"{"name":"Primary","type":"integer","jsonPath":".status.currentPrimaryIndex"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MySQLClusterSpec {
    /// Number of MySQL instances in the cluster.
    ///
    /// Instance ordinals run from 0 to `replicas - 1`.
    #[schemars(range(min = 1))]
    pub replicas: i32,
}

/// Status of a `MySQLCluster`, written exclusively by the clustering
/// controller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MySQLClusterStatus {
    /// Ordinal of the instance currently intended to serve writes.
    ///
    /// Absent until the first successful promotion; afterwards updated only
    /// by the promotion operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_primary_index: Option<i32>,

    /// Number of replicas whose replication state is considered synced.
    #[serde(default)]
    pub synced_replicas: i32,

    /// Mirror of the `Available` condition status.
    #[serde(default)]
    pub ready: ConditionStatus,

    /// Condition set keyed by condition type.
    #[serde(default)]
    pub conditions: Vec<ClusterCondition>,
}

/// Condition represents an observation of the cluster's current state.
///
/// Conditions are upserted by type on every status write; the transition
/// timestamp only moves when the status value changes for that type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCondition {
    /// Type of condition.
    pub r#type: ClusterConditionType,

    /// Status of the condition: True, False, or Unknown.
    pub status: ConditionStatus,

    /// Human-readable explanation of the condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// The recognized condition types on a `MySQLCluster`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ClusterConditionType {
    /// The primary accepts writes and the semi-sync guarantee holds.
    Available,
    /// Every instance is available and replication is fully caught up.
    Healthy,
    /// One or more replicas are failing to replicate.
    OutOfSync,
    /// The last reconciliation ended in an error.
    Failure,
    /// A safety invariant was observed broken (e.g. two writable instances).
    Violation,
}

impl fmt::Display for ClusterConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClusterConditionType::Available => "Available",
            ClusterConditionType::Healthy => "Healthy",
            ClusterConditionType::OutOfSync => "OutOfSync",
            ClusterConditionType::Failure => "Failure",
            ClusterConditionType::Violation => "Violation",
        };
        f.write_str(s)
    }
}

/// Tri-state condition status following the Kubernetes convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl MySQLCluster {
    /// Unique name of the cluster, used as the stem for every derived
    /// Kubernetes object name.
    #[must_use]
    pub fn unique_name(&self) -> String {
        format!("{}-{}", RESOURCE_PREFIX, self.name_any())
    }

    /// Pod name of the instance at `index`.
    #[must_use]
    pub fn pod_name(&self, index: usize) -> String {
        format!("{}-{}", self.unique_name(), index)
    }

    /// Stable in-cluster DNS name of the instance at `index`.
    ///
    /// Replication is only considered configured when a replica's reported
    /// source host matches this name exactly.
    #[must_use]
    pub fn pod_dns_name(&self, index: usize) -> String {
        format!(
            "{}.{}.{}.svc",
            self.pod_name(index),
            self.unique_name(),
            self.namespace().unwrap_or_default()
        )
    }

    /// Name of the secret holding the operator and replication passwords.
    #[must_use]
    pub fn credentials_secret_name(&self) -> String {
        format!("{}-{}", self.unique_name(), CREDENTIALS_SECRET_SUFFIX)
    }

    /// Persisted primary ordinal, if a promotion has happened.
    #[must_use]
    pub fn current_primary_index(&self) -> Option<usize> {
        self.status
            .as_ref()
            .and_then(|status| status.current_primary_index)
            .and_then(|index| usize::try_from(index).ok())
    }
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
