// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Imperative actions against MySQL instances and the resource store.
//!
//! Every operator is small, idempotent and named by a stable string used in
//! logs and metrics. Operators run sequentially in the order the planner
//! emitted them; the first failure aborts the remainder of the cycle.

#[allow(clippy::wildcard_imports)]
use super::types::*;
use crate::constants::{MYSQL_PORT, MYSQL_REPLICATION_USER, REPLICATION_PASSWORD_KEY};
use mysql_async::prelude::Queryable;

/// Stable name of the promotion operator.
pub const OPERATOR_UPDATE_PRIMARY: &str = "update-primary";

/// Stable name of the replica configuration operator.
pub const OPERATOR_CONFIGURE_REPLICATION: &str = "configure-replication";

/// Stable name of the write-acceptance operator.
pub const OPERATOR_TURN_OFF_READ_ONLY: &str = "turn-off-read-only";

/// One imperative action planned for the cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    /// Record `new_primary_index` as the primary and configure the instance
    /// as a semi-sync master.
    UpdatePrimary { new_primary_index: usize },

    /// Point the instance at `index` at the primary and start replication.
    ConfigureReplication { index: usize, primary_host: String },

    /// Allow writes on the primary.
    TurnOffReadOnly { primary_index: usize },
}

impl Operator {
    /// Stable operator name for logging and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Operator::UpdatePrimary { .. } => OPERATOR_UPDATE_PRIMARY,
            Operator::ConfigureReplication { .. } => OPERATOR_CONFIGURE_REPLICATION,
            Operator::TurnOffReadOnly { .. } => OPERATOR_TURN_OFF_READ_ONLY,
        }
    }

    /// Execute the operator.
    ///
    /// # Errors
    ///
    /// Any MySQL or resource store error aborts the reconcile; the driver
    /// publishes the failure conditions.
    pub async fn run(
        &self,
        ctx: &Context,
        api: &Api<MySQLCluster>,
        cluster: &mut MySQLCluster,
        observed: &ClusterObservation,
    ) -> Result<(), ClusteringError> {
        match self {
            Operator::UpdatePrimary { new_primary_index } => {
                run_update_primary(ctx, api, cluster, observed, *new_primary_index).await
            }
            Operator::ConfigureReplication {
                index,
                primary_host,
            } => run_configure_replication(ctx, cluster, *index, primary_host).await,
            Operator::TurnOffReadOnly { primary_index } => {
                run_turn_off_read_only(ctx, cluster, *primary_index).await
            }
        }
    }
}

/// Promote the instance at `new_primary_index`.
///
/// The new primary ordinal is persisted to the resource store *before* any
/// MySQL state changes: a crash between the two leaves the intended primary
/// recorded, and the next cycle treats it as authoritative.
async fn run_update_primary(
    ctx: &Context,
    api: &Api<MySQLCluster>,
    cluster: &mut MySQLCluster,
    observed: &ClusterObservation,
    new_primary_index: usize,
) -> Result<(), ClusteringError> {
    let mut conn = ctx.get_db(cluster, new_primary_index).await?;

    {
        let status = cluster.status.get_or_insert_with(MySQLClusterStatus::default);
        status.current_primary_index = i32::try_from(new_primary_index).ok();
    }
    let updated = api
        .replace_status(
            &cluster.name_any(),
            &PostParams::default(),
            serde_json::to_vec(&*cluster)?,
        )
        .await?;
    cluster.metadata.resource_version = updated.metadata.resource_version;

    conn.query_drop(
        "SET GLOBAL rpl_semi_sync_master_enabled=ON,GLOBAL rpl_semi_sync_slave_enabled=OFF",
    )
    .await
    .map_err(|err| ClusteringError::mysql_exec(new_primary_index, err))?;

    let expected = i32::try_from(super::planner::required_sync_acks(cluster)).unwrap_or(0);
    let observed_count = observed.instances[new_primary_index]
        .global_variables
        .as_ref()
        .map(|vars| vars.rpl_semi_sync_master_wait_for_slave_count);
    if observed_count == Some(expected) {
        return Ok(());
    }

    conn.exec_drop(
        "SET GLOBAL rpl_semi_sync_master_wait_for_slave_count=?",
        (expected,),
    )
    .await
    .map_err(|err| ClusteringError::mysql_exec(new_primary_index, err))
}

/// Configure the instance at `index` as a semi-sync replica of
/// `primary_host`.
async fn run_configure_replication(
    ctx: &Context,
    cluster: &MySQLCluster,
    index: usize,
    primary_host: &str,
) -> Result<(), ClusteringError> {
    let password = ctx.get_password(cluster, REPLICATION_PASSWORD_KEY).await?;
    let mut conn = ctx.get_db(cluster, index).await?;

    conn.query_drop("STOP SLAVE")
        .await
        .map_err(|err| ClusteringError::mysql_exec(index, err))?;

    conn.exec_drop(
        "CHANGE MASTER TO MASTER_HOST = ?, MASTER_PORT = ?, MASTER_USER = ?, \
         MASTER_PASSWORD = ?, MASTER_AUTO_POSITION = 1",
        (primary_host, MYSQL_PORT, MYSQL_REPLICATION_USER, password),
    )
    .await
    .map_err(|err| ClusteringError::mysql_exec(index, err))?;

    conn.query_drop(
        "SET GLOBAL rpl_semi_sync_master_enabled=OFF,GLOBAL rpl_semi_sync_slave_enabled=ON",
    )
    .await
    .map_err(|err| ClusteringError::mysql_exec(index, err))?;

    conn.query_drop("START SLAVE")
        .await
        .map_err(|err| ClusteringError::mysql_exec(index, err))
}

/// Allow writes on the primary.
///
/// Only `read_only` is cleared; MySQL clears `super_read_only` with it.
async fn run_turn_off_read_only(
    ctx: &Context,
    cluster: &MySQLCluster,
    primary_index: usize,
) -> Result<(), ClusteringError> {
    let mut conn = ctx.get_db(cluster, primary_index).await?;
    conn.query_drop("SET GLOBAL read_only=0")
        .await
        .map_err(|err| ClusteringError::mysql_exec(primary_index, err))
}

#[cfg(test)]
#[path = "operators_tests.rs"]
mod operators_tests;
