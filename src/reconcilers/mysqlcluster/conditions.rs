// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Condition sets published on the `MySQLCluster` status.
//!
//! Each planner outcome and each failure path maps to a fixed set of
//! conditions; the builders here produce them without transition
//! timestamps, which are assigned at write time by the status upsert.

#[allow(clippy::wildcard_imports)]
use super::types::*;
use crate::errors::ClusteringError;
use crate::reconcilers::status::new_condition;

/// Conditions for an observed safety-invariant violation.
pub(super) fn violation_condition(err: &ClusteringError) -> Vec<ClusterCondition> {
    vec![
        new_condition(
            ClusterConditionType::Violation,
            ConditionStatus::True,
            Some(err.to_string()),
        ),
        new_condition(ClusterConditionType::Failure, ConditionStatus::True, None),
        new_condition(ClusterConditionType::Available, ConditionStatus::False, None),
        new_condition(ClusterConditionType::Healthy, ConditionStatus::False, None),
    ]
}

/// Conditions for the cycle that observes a violation clearing.
///
/// `Violation` flips to False here; the cycle still reports failure so no
/// operators run until the next, fully re-planned reconcile.
pub(super) fn recovered_condition(err: &ClusteringError) -> Vec<ClusterCondition> {
    vec![
        new_condition(
            ClusterConditionType::Violation,
            ConditionStatus::False,
            Some(err.to_string()),
        ),
        new_condition(ClusterConditionType::Failure, ConditionStatus::True, None),
        new_condition(ClusterConditionType::Available, ConditionStatus::False, None),
        new_condition(ClusterConditionType::Healthy, ConditionStatus::False, None),
    ]
}

/// Conditions for any other reconciliation failure.
pub(super) fn failure_condition(err: &ClusteringError) -> Vec<ClusterCondition> {
    vec![
        new_condition(
            ClusterConditionType::Failure,
            ConditionStatus::True,
            Some(err.to_string()),
        ),
        new_condition(ClusterConditionType::Available, ConditionStatus::False, None),
        new_condition(ClusterConditionType::Healthy, ConditionStatus::False, None),
    ]
}

/// Conditions while the cluster is not yet serving writes safely.
pub(super) fn unavailable_condition(out_of_sync: &[usize]) -> Vec<ClusterCondition> {
    let mut conditions = vec![out_of_sync_condition(out_of_sync)];
    conditions.push(new_condition(
        ClusterConditionType::Failure,
        ConditionStatus::False,
        None,
    ));
    conditions.push(new_condition(
        ClusterConditionType::Healthy,
        ConditionStatus::False,
        None,
    ));
    conditions.push(new_condition(
        ClusterConditionType::Available,
        ConditionStatus::False,
        None,
    ));
    conditions
}

/// Conditions once the primary serves writes under the semi-sync guarantee.
///
/// The cluster is `Healthy` only when no instance is out of sync.
pub(super) fn available_condition(out_of_sync: &[usize]) -> Vec<ClusterCondition> {
    let healthy = if out_of_sync.is_empty() {
        ConditionStatus::True
    } else {
        ConditionStatus::False
    };

    vec![
        out_of_sync_condition(out_of_sync),
        new_condition(ClusterConditionType::Healthy, healthy, None),
        new_condition(ClusterConditionType::Failure, ConditionStatus::False, None),
        new_condition(ClusterConditionType::Available, ConditionStatus::True, None),
    ]
}

fn out_of_sync_condition(out_of_sync: &[usize]) -> ClusterCondition {
    if out_of_sync.is_empty() {
        new_condition(ClusterConditionType::OutOfSync, ConditionStatus::False, None)
    } else {
        new_condition(
            ClusterConditionType::OutOfSync,
            ConditionStatus::True,
            Some(format!("out-of-sync instances: {out_of_sync:?}")),
        )
    }
}

#[cfg(test)]
#[path = "conditions_tests.rs"]
mod conditions_tests;
