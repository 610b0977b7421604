// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! MySQL connectivity and instance status collection.
//!
//! This module is the only place in the codebase that speaks the MySQL wire
//! protocol. It provides:
//!
//! - [`MySqlAccessor`] - pooled, per-host database handles
//! - typed status records decoded from the probe queries
//!   ([`PrimaryStatus`], [`ReplicaStatus`], [`GlobalVariables`],
//!   [`CloneState`])
//! - [`MySqlError`] - errors for connection, query and row-decoding failures
//!
//! The reconcilers consume these building blocks; no SQL text appears
//! outside this module and the operators that act on a cluster.

pub mod accessor;
pub mod errors;
pub mod status;

pub use accessor::MySqlAccessor;
pub use errors::MySqlError;
pub use status::{
    query_clone_state, query_global_variables, query_primary_status, query_replica_status,
    CloneState, ClusterObservation, GlobalVariables, InstanceObservation, PrimaryStatus,
    ReplicaStatus,
};
