// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Safety-invariant validation over an observed cluster.
//!
//! Before any operator is planned, the observation is checked against the
//! at-most-one-writer invariant. A broken invariant aborts the cycle; a
//! previously recorded violation that is no longer observed also aborts the
//! cycle once, so the recovery is published before any further action.

#[allow(clippy::wildcard_imports)]
use super::types::*;
use crate::reconcilers::status::find_condition;

/// Validate the safety invariants of an observed cluster.
///
/// # Errors
///
/// - [`ClusteringError::ConstraintsViolation`] when more than one instance
///   is writable, or the single writable instance is not the recorded
///   primary.
/// - [`ClusteringError::ConstraintsRecovered`] when no violation is
///   observed but the stored conditions still carry `Violation=True`.
pub(super) fn validate_constraints(
    cluster: &MySQLCluster,
    observed: &ClusterObservation,
) -> Result<(), ClusteringError> {
    let mut writable_count = 0usize;
    let mut writable_index = 0usize;
    for (index, instance) in observed.instances.iter().enumerate() {
        if instance
            .global_variables
            .as_ref()
            .is_some_and(|vars| !vars.read_only)
        {
            writable_count += 1;
            writable_index = index;
        }
    }

    if writable_count > 1 {
        return Err(ClusteringError::ConstraintsViolation);
    }

    if let Some(current_primary) = cluster.current_primary_index() {
        if writable_count == 1 && writable_index != current_primary {
            return Err(ClusteringError::ConstraintsViolation);
        }
    }

    let previously_violated = cluster
        .status
        .as_ref()
        .and_then(|status| find_condition(&status.conditions, ClusterConditionType::Violation))
        .is_some_and(|condition| condition.status == ConditionStatus::True);
    if previously_violated {
        return Err(ClusteringError::ConstraintsRecovered);
    }

    Ok(())
}

#[cfg(test)]
#[path = "constraints_tests.rs"]
mod constraints_tests;
