// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Clustering error types for Primly.
//!
//! This module defines the error taxonomy of the reconciliation engine.
//! Every error carries a stable kind string (see [`ClusteringError::kind`])
//! used in logs and metrics; condition sets written on failure are keyed on
//! these kinds, not on the underlying implementation errors.

use crate::mysql::MySqlError;
use thiserror::Error;

/// Errors produced while reconciling a `MySQLCluster`.
#[derive(Error, Debug)]
pub enum ClusteringError {
    /// One or more instances failed their status probe.
    ///
    /// No operators run in this cycle; the instance is expected to become
    /// reachable again once its pod is ready.
    #[error("unavailable host exists in cluster '{namespace}/{name}'")]
    UnavailableHost {
        /// Namespace of the cluster
        namespace: String,
        /// Name of the cluster
        name: String,
    },

    /// A safety invariant is broken in the observed state.
    ///
    /// Either more than one instance is writable, or the single writable
    /// instance is not the recorded primary. Planning stops immediately:
    /// acting on a violated observation risks a split-brain write.
    #[error("constraints violation: the writable instances do not match the recorded primary")]
    ConstraintsViolation,

    /// A previously observed violation is no longer present.
    ///
    /// The cycle that observes the recovery runs no operators; the next
    /// cycle plans normally against the recovered state.
    #[error("constraints recovered: the previous violation is no longer observed")]
    ConstraintsRecovered,

    /// A MySQL statement issued by an operator failed.
    #[error("mysql statement failed on instance {index}: {source}")]
    MySqlExec {
        /// Ordinal of the instance the statement was issued against
        index: usize,
        /// Underlying MySQL error
        #[source]
        source: MySqlError,
    },

    /// A cluster resource store (Kubernetes API) operation failed.
    ///
    /// Optimistic-concurrency conflicts surface here; the controller
    /// runtime requeues and the next cycle re-reads the resource.
    #[error("cluster resource store error: {0}")]
    Store(#[from] kube::Error),

    /// The credentials secret exists but does not contain a required key.
    #[error("secret '{secret}' is missing key '{key}'")]
    MissingCredential {
        /// Name of the credentials secret
        secret: String,
        /// The key that was not found
        key: String,
    },

    /// The cluster object could not be serialized for a status write.
    #[error("failed to serialize cluster status: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClusteringError {
    /// Wrap a MySQL error with the ordinal it occurred on.
    pub fn mysql_exec(index: usize, source: impl Into<MySqlError>) -> Self {
        ClusteringError::MySqlExec {
            index,
            source: source.into(),
        }
    }

    /// Stable kind string for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClusteringError::UnavailableHost { .. } => "UnavailableHost",
            ClusteringError::ConstraintsViolation => "ConstraintsViolation",
            ClusteringError::ConstraintsRecovered => "ConstraintsRecovered",
            ClusteringError::MySqlExec { .. } => "MySQLExecError",
            ClusteringError::Store(err) if is_conflict(err) => "StoreConflict",
            ClusteringError::Store(_) => "StoreError",
            ClusteringError::MissingCredential { .. } => "MissingCredential",
            ClusteringError::Serialization(_) => "Serialization",
        }
    }

    /// Whether this error is an optimistic-concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClusteringError::Store(err) if is_conflict(err))
    }
}

fn is_conflict(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 409)
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
