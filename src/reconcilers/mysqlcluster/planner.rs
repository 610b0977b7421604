// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Planning: from an observed cluster to the next operation.
//!
//! [`decide_next_operation`] is a pure function over the declared spec, the
//! persisted status and the current observation. It evaluates a fixed
//! sequence of stages and returns as soon as one yields work:
//!
//! 1. availability gate - every instance must have been probed successfully
//! 2. constraint validation - the at-most-one-writer invariant must hold
//! 3. primary promotion - record and configure the selected primary
//! 4. replica configuration - point every other instance at the primary
//! 5. replication progress gate - wait until enough replicas caught up
//! 6. write acceptance - clear `read_only` on the primary
//!
//! Reaching the end means steady state: no operators, conditions only.

#[allow(clippy::wildcard_imports)]
use super::types::*;
use super::conditions::{available_condition, unavailable_condition};
use super::constraints::validate_constraints;
use super::operators::Operator;

/// The planner's verdict for one reconcile cycle.
#[derive(Debug, Default)]
pub struct Operation {
    /// Operators to execute, in order.
    pub operators: Vec<Operator>,

    /// Whether the cycle should requeue to wait for replication progress.
    pub wait: bool,

    /// Conditions to publish on the cluster status.
    pub conditions: Vec<ClusterCondition>,

    /// New synced-replica count, when the cycle reached the accounting
    /// stages.
    pub synced_replicas: Option<i32>,
}

/// Decide the next operation for the cluster.
///
/// # Errors
///
/// - [`ClusteringError::UnavailableHost`] when any instance failed its probe
/// - [`ClusteringError::ConstraintsViolation`] /
///   [`ClusteringError::ConstraintsRecovered`] from constraint validation
pub fn decide_next_operation(
    cluster: &MySQLCluster,
    observed: &ClusterObservation,
) -> Result<Operation, ClusteringError> {
    let mut unavailable = false;
    for (index, instance) in observed.instances.iter().enumerate() {
        if !instance.available {
            info!(index, "unavailable host exists");
            unavailable = true;
        }
    }
    if unavailable {
        return Err(ClusteringError::UnavailableHost {
            namespace: cluster.namespace().unwrap_or_default(),
            name: cluster.name_any(),
        });
    }

    if let Err(err) = validate_constraints(cluster, observed) {
        warn!(error = %err, "constraint validation failed");
        return Err(err);
    }

    let primary_index = select_primary(cluster, observed);

    let operators = update_primary(cluster, primary_index);
    if !operators.is_empty() {
        return Ok(Operation {
            operators,
            ..Operation::default()
        });
    }

    let operators = configure_replication(cluster, observed, primary_index);
    if !operators.is_empty() {
        return Ok(Operation {
            operators,
            ..Operation::default()
        });
    }

    let (wait, out_of_sync) = wait_for_replication(cluster, observed, primary_index);
    if wait {
        return Ok(Operation {
            wait: true,
            conditions: unavailable_condition(&out_of_sync),
            ..Operation::default()
        });
    }

    let synced_replicas = synced_replicas(cluster, &out_of_sync);
    let operators = accept_write_request(observed, primary_index);
    Ok(Operation {
        operators,
        conditions: available_condition(&out_of_sync),
        synced_replicas: Some(synced_replicas),
        ..Operation::default()
    })
}

/// Primary selection policy.
///
/// Always chooses ordinal 0.
// TODO: pick the replica with the most advanced GTID set once automated
// failover is implemented.
fn select_primary(_cluster: &MySQLCluster, _observed: &ClusterObservation) -> usize {
    0
}

/// Emit a promotion when the recorded primary differs from the selected one.
fn update_primary(cluster: &MySQLCluster, new_primary_index: usize) -> Vec<Operator> {
    if cluster.current_primary_index() == Some(new_primary_index) {
        return Vec::new();
    }

    vec![Operator::UpdatePrimary { new_primary_index }]
}

/// Emit a configuration operator for every replica not pointed at the
/// primary's DNS name.
fn configure_replication(
    cluster: &MySQLCluster,
    observed: &ClusterObservation,
    primary_index: usize,
) -> Vec<Operator> {
    let primary_host = cluster.pod_dns_name(primary_index);

    let mut operators = Vec::new();
    for (index, instance) in observed.instances.iter().enumerate() {
        if index == primary_index {
            continue;
        }
        let configured = instance
            .replica_status
            .as_ref()
            .is_some_and(|replica| replica.master_host == primary_host);
        if !configured {
            operators.push(Operator::ConfigureReplication {
                index,
                primary_host: primary_host.clone(),
            });
        }
    }

    operators
}

/// Gate write acceptance on replication progress.
///
/// Returns `(wait, out_of_sync)`. An instance is out of sync when its
/// replica record is absent or reports an I/O error. While the primary is
/// still read-only, at least `floor(replicas / 2)` replicas must have
/// executed the primary's GTID set before writes are enabled; once the
/// primary is writable the gate passes unconditionally and the out-of-sync
/// accounting rests on the I/O-error check alone.
fn wait_for_replication(
    cluster: &MySQLCluster,
    observed: &ClusterObservation,
    primary_index: usize,
) -> (bool, Vec<usize>) {
    let primary = &observed.instances[primary_index];
    let primary_gtid = primary
        .primary_status
        .as_ref()
        .and_then(|status| status.executed_gtid_set.clone());

    let mut caught_up = 0usize;
    let mut out_of_sync = Vec::new();
    for (index, instance) in observed.instances.iter().enumerate() {
        if index == primary_index {
            continue;
        }

        match instance.replica_status.as_ref() {
            None => out_of_sync.push(index),
            Some(replica) if replica.last_io_errno != 0 => out_of_sync.push(index),
            Some(replica) => {
                if replica.executed_gtid_set == primary_gtid {
                    caught_up += 1;
                }
            }
        }
    }

    let primary_read_only = primary
        .global_variables
        .as_ref()
        .is_some_and(|vars| vars.read_only);
    if !primary_read_only {
        return (false, out_of_sync);
    }

    (caught_up < required_sync_acks(cluster), out_of_sync)
}

/// Clear `read_only` on the primary if it still refuses writes.
fn accept_write_request(observed: &ClusterObservation, primary_index: usize) -> Vec<Operator> {
    let read_only = observed.instances[primary_index]
        .global_variables
        .as_ref()
        .is_some_and(|vars| vars.read_only);
    if !read_only {
        return Vec::new();
    }

    vec![Operator::TurnOffReadOnly { primary_index }]
}

/// Number of replicas that must acknowledge a transaction: `floor(N / 2)`.
pub(super) fn required_sync_acks(cluster: &MySQLCluster) -> usize {
    usize::try_from(cluster.spec.replicas / 2).unwrap_or(0)
}

fn synced_replicas(cluster: &MySQLCluster, out_of_sync: &[usize]) -> i32 {
    let replicas = cluster.spec.replicas;
    let out_of_sync = i32::try_from(out_of_sync.len()).unwrap_or(replicas);
    (replicas - 1 - out_of_sync).max(0)
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod planner_tests;
