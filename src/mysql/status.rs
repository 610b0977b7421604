// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Instance status queries and their typed result records.
//!
//! Four queries describe an instance completely for clustering purposes:
//! the executed GTID set it would serve as a source, its replica thread
//! state, the read-only/semi-sync global variables, and any clone operation
//! in flight. Rows are decoded by column name so the records stay correct
//! regardless of column order.

use crate::mysql::MySqlError;
use mysql_async::prelude::{FromValue, Queryable};
use mysql_async::{Conn, Row};

const SHOW_MASTER_STATUS: &str = "SHOW MASTER STATUS";
const SHOW_SLAVE_STATUS: &str = "SHOW SLAVE STATUS";
const SELECT_GLOBAL_VARIABLES: &str =
    "SELECT @@read_only, @@super_read_only, @@rpl_semi_sync_master_wait_for_slave_count";
const SELECT_CLONE_STATE: &str = "SELECT state FROM performance_schema.clone_status";

/// Everything observed about a cluster in one reconcile, indexed by ordinal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterObservation {
    pub instances: Vec<InstanceObservation>,
}

/// Observed state of a single instance.
///
/// `available` is true only when all four queries succeeded; a partially
/// probed instance never drives planning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceObservation {
    pub available: bool,
    pub primary_status: Option<PrimaryStatus>,
    pub replica_status: Option<ReplicaStatus>,
    pub global_variables: Option<GlobalVariables>,
    pub clone_state: Option<CloneState>,
}

/// Result of `SHOW MASTER STATUS`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimaryStatus {
    pub executed_gtid_set: Option<String>,
}

/// Result of `SHOW SLAVE STATUS`.
///
/// Absent entirely on an instance that has never been configured as a
/// replica.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplicaStatus {
    pub last_io_errno: i32,
    pub last_io_error: Option<String>,
    pub last_sql_errno: i32,
    pub last_sql_error: Option<String>,
    pub master_host: String,
    pub retrieved_gtid_set: Option<String>,
    pub executed_gtid_set: Option<String>,
    pub slave_io_running: String,
    pub slave_sql_running: String,
}

/// Read-only and semi-sync global variables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalVariables {
    pub read_only: bool,
    pub super_read_only: bool,
    pub rpl_semi_sync_master_wait_for_slave_count: i32,
}

/// Result of the clone-status query, if a clone has ever run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CloneState {
    pub state: Option<String>,
}

/// Query the primary log position.
///
/// # Errors
///
/// An empty result is an error: every instance in a managed cluster runs
/// with binary logging enabled.
pub async fn query_primary_status(conn: &mut Conn) -> Result<PrimaryStatus, MySqlError> {
    let row: Row = conn
        .query_first(SHOW_MASTER_STATUS)
        .await?
        .ok_or(MySqlError::EmptyResultSet {
            query: SHOW_MASTER_STATUS,
        })?;

    Ok(PrimaryStatus {
        executed_gtid_set: column(&row, SHOW_MASTER_STATUS, "Executed_Gtid_Set")?,
    })
}

/// Query the replica thread state.
///
/// # Errors
///
/// An empty result is **not** an error; the instance may legitimately never
/// have been a replica, in which case `Ok(None)` is returned.
pub async fn query_replica_status(conn: &mut Conn) -> Result<Option<ReplicaStatus>, MySqlError> {
    let Some(row) = conn.query_first::<Row, _>(SHOW_SLAVE_STATUS).await? else {
        return Ok(None);
    };

    Ok(Some(ReplicaStatus {
        last_io_errno: column(&row, SHOW_SLAVE_STATUS, "Last_IO_Errno")?,
        last_io_error: column(&row, SHOW_SLAVE_STATUS, "Last_IO_Error")?,
        last_sql_errno: column(&row, SHOW_SLAVE_STATUS, "Last_SQL_Errno")?,
        last_sql_error: column(&row, SHOW_SLAVE_STATUS, "Last_SQL_Error")?,
        master_host: column(&row, SHOW_SLAVE_STATUS, "Master_Host")?,
        retrieved_gtid_set: column(&row, SHOW_SLAVE_STATUS, "Retrieved_Gtid_Set")?,
        executed_gtid_set: column(&row, SHOW_SLAVE_STATUS, "Executed_Gtid_Set")?,
        slave_io_running: column(&row, SHOW_SLAVE_STATUS, "Slave_IO_Running")?,
        slave_sql_running: column(&row, SHOW_SLAVE_STATUS, "Slave_SQL_Running")?,
    }))
}

/// Query the read-only and semi-sync global variables.
///
/// # Errors
///
/// An empty result is an error.
pub async fn query_global_variables(conn: &mut Conn) -> Result<GlobalVariables, MySqlError> {
    let row: Row = conn
        .query_first(SELECT_GLOBAL_VARIABLES)
        .await?
        .ok_or(MySqlError::EmptyResultSet {
            query: SELECT_GLOBAL_VARIABLES,
        })?;

    // The text protocol delivers the boolean system variables as integers.
    let read_only: i64 = column(&row, SELECT_GLOBAL_VARIABLES, "@@read_only")?;
    let super_read_only: i64 = column(&row, SELECT_GLOBAL_VARIABLES, "@@super_read_only")?;
    let wait_count: i64 = column(
        &row,
        SELECT_GLOBAL_VARIABLES,
        "@@rpl_semi_sync_master_wait_for_slave_count",
    )?;

    Ok(GlobalVariables {
        read_only: read_only != 0,
        super_read_only: super_read_only != 0,
        rpl_semi_sync_master_wait_for_slave_count: i32::try_from(wait_count).unwrap_or(0),
    })
}

/// Query clone progress from the performance schema.
///
/// # Errors
///
/// An empty result is **not** an error; no clone has run on this instance.
pub async fn query_clone_state(conn: &mut Conn) -> Result<Option<CloneState>, MySqlError> {
    let Some(row) = conn.query_first::<Row, _>(SELECT_CLONE_STATE).await? else {
        return Ok(None);
    };

    Ok(Some(CloneState {
        state: column(&row, SELECT_CLONE_STATE, "state")?,
    }))
}

fn column<T: FromValue>(
    row: &Row,
    query: &'static str,
    column: &'static str,
) -> Result<T, MySqlError> {
    match row.get_opt::<T, _>(column) {
        Some(Ok(value)) => Ok(value),
        Some(Err(_)) | None => Err(MySqlError::Column { query, column }),
    }
}
