// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `MySQLCluster` reconciliation.
//!
//! One reconcile is a single pass of probe → plan → act → report:
//!
//! 1. [`probe`] collects the status of every instance
//! 2. [`planner`] decides the next operation (pure function)
//! 3. the emitted operators run sequentially against MySQL / the store
//! 4. the resulting conditions and counters are written to the status
//!
//! The controller runtime serializes reconciles per cluster, so within one
//! cluster this sequence never interleaves with itself.
//!
//! ## Module Structure
//!
//! - [`conditions`] - condition sets per planner outcome / failure kind
//! - [`constraints`] - safety-invariant validation
//! - [`operators`] - imperative MySQL / resource store actions
//! - [`planner`] - the decision engine
//! - [`probe`] - instance status collection
//! - [`types`] - shared types and imports

// Submodules
pub mod conditions;
pub mod constraints;
pub mod operators;
pub mod planner;
pub mod probe;
pub mod types;

pub use operators::Operator;
pub use planner::{decide_next_operation, Operation};

#[allow(clippy::wildcard_imports)]
use types::*;

use crate::constants::REPLICATION_WAIT_REQUEUE_SECS;
use crate::metrics;

/// Reconcile a `MySQLCluster`.
///
/// # Errors
///
/// Returns an error when planning fails, an operator fails, or the final
/// status write fails. Every error path attempts to publish the matching
/// failure conditions before returning.
pub async fn reconcile_mysqlcluster(
    ctx: Arc<Context>,
    cluster: Arc<MySQLCluster>,
) -> Result<Action, ClusteringError> {
    let mut cluster = (*cluster).clone();
    let namespace = cluster.namespace().unwrap_or_default();
    let name = cluster.name_any();
    let api: Api<MySQLCluster> = Api::namespaced(ctx.client.clone(), &namespace);

    info!("Reconciling MySQLCluster: {}/{}", namespace, name);

    let observed = probe::observe_cluster(&ctx, &cluster).await;
    debug!(
        available = observed.instances.iter().filter(|i| i.available).count(),
        declared = observed.instances.len(),
        "instance probe finished"
    );

    let operation = match planner::decide_next_operation(&cluster, &observed) {
        Ok(operation) => operation,
        Err(err) => {
            publish_error(&api, &mut cluster, &err).await;
            return Err(err);
        }
    };

    for operator in &operation.operators {
        info!(operator = operator.name(), "running operator");
        if let Err(err) = operator.run(&ctx, &api, &mut cluster, &observed).await {
            error!(operator = operator.name(), error = %err, "operator failed");
            metrics::record_operator_run(operator.name(), "error");
            publish_error(&api, &mut cluster, &err).await;
            return Err(err);
        }
        metrics::record_operator_run(operator.name(), "success");
    }

    write_cluster_status(
        &api,
        &mut cluster,
        operation.conditions,
        operation.synced_replicas,
    )
    .await?;

    if let Some(synced) = operation.synced_replicas {
        metrics::set_synced_replicas(&name, synced);
    }

    if operation.wait {
        debug!("waiting for replication progress, requeueing");
        return Ok(Action::requeue(Duration::from_secs(
            REPLICATION_WAIT_REQUEUE_SECS,
        )));
    }

    Ok(Action::await_change())
}

/// Publish failure conditions for an error, best effort.
///
/// The original error is about to surface to the controller runtime; a
/// secondary failure while writing conditions is only logged.
async fn publish_error(api: &Api<MySQLCluster>, cluster: &mut MySQLCluster, err: &ClusteringError) {
    let conditions = match err {
        ClusteringError::ConstraintsViolation => conditions::violation_condition(err),
        ClusteringError::ConstraintsRecovered => conditions::recovered_condition(err),
        _ => conditions::failure_condition(err),
    };

    if let Err(status_err) = write_cluster_status(api, cluster, conditions, None).await {
        error!(error = %status_err, "unable to update status after failure");
    }
}

/// Write conditions and counters to the cluster status.
///
/// The `Available` condition status is mirrored into `ready`. The write is
/// elided when nothing changed, which keeps steady-state reconciles from
/// generating watch events for their own no-op updates.
async fn write_cluster_status(
    api: &Api<MySQLCluster>,
    cluster: &mut MySQLCluster,
    conditions: Vec<ClusterCondition>,
    synced_replicas: Option<i32>,
) -> Result<(), ClusteringError> {
    let previous = cluster.status.clone();

    let status = cluster.status.get_or_insert_with(MySQLClusterStatus::default);
    for condition in conditions {
        if condition.r#type == ClusterConditionType::Available {
            status.ready = condition.status;
        }
        crate::reconcilers::status::upsert_condition(&mut status.conditions, condition);
    }
    if let Some(synced) = synced_replicas {
        status.synced_replicas = synced;
    }

    if previous.as_ref() == cluster.status.as_ref() {
        debug!("cluster status unchanged, skipping update");
        return Ok(());
    }

    let updated = api
        .replace_status(
            &cluster.name_any(),
            &PostParams::default(),
            serde_json::to_vec(&*cluster)?,
        )
        .await?;
    cluster.metadata.resource_version = updated.metadata.resource_version;

    Ok(())
}
