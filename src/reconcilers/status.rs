// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition helpers for the `MySQLCluster` resource.
//!
//! Conditions follow the standard Kubernetes conventions:
//! - `type`: the aspect of the cluster being reported
//! - `status`: True, False, or Unknown
//! - `message`: a human-readable explanation
//! - `lastTransitionTime`: RFC3339 timestamp of the last status flip
//!
//! The condition set is upserted by type on every status write; the
//! transition timestamp moves only when the status value actually changes
//! for that type. Keeping the timestamp stable on no-op writes is what lets
//! an unchanged status serialize identically and skip the API update.

use crate::crd::{ClusterCondition, ClusterConditionType, ConditionStatus};
use chrono::Utc;

/// Create a new condition without a transition timestamp.
///
/// The timestamp is assigned by [`upsert_condition`] at write time so that
/// an unchanged status keeps its original transition time.
#[must_use]
pub fn new_condition(
    r#type: ClusterConditionType,
    status: ConditionStatus,
    message: Option<String>,
) -> ClusterCondition {
    ClusterCondition {
        r#type,
        status,
        message,
        last_transition_time: None,
    }
}

/// Find a condition by type.
#[must_use]
pub fn find_condition(
    conditions: &[ClusterCondition],
    r#type: ClusterConditionType,
) -> Option<&ClusterCondition> {
    conditions.iter().find(|c| c.r#type == r#type)
}

/// Upsert a condition into a condition set, keyed by type.
///
/// The transition timestamp is preserved when the status value is unchanged
/// and set to the current time when the condition is new or its status
/// flipped.
pub fn upsert_condition(conditions: &mut Vec<ClusterCondition>, mut condition: ClusterCondition) {
    match conditions.iter_mut().find(|c| c.r#type == condition.r#type) {
        Some(existing) => {
            condition.last_transition_time = if existing.status == condition.status {
                existing.last_transition_time.clone()
            } else {
                Some(Utc::now().to_rfc3339())
            };
            *existing = condition;
        }
        None => {
            condition.last_transition_time = Some(Utc::now().to_rfc3339());
            conditions.push(condition);
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
