// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Instance status collection.
//!
//! The probe visits every declared ordinal sequentially and collects the
//! four status records. An instance that does not respond, or fails any of
//! the sub-queries, is recorded as unavailable; that is the normal signal
//! for a pod that is still starting, so the probe itself never fails the
//! reconcile.

#[allow(clippy::wildcard_imports)]
use super::types::*;
use crate::metrics;
use crate::mysql::{
    query_clone_state, query_global_variables, query_primary_status, query_replica_status,
};

/// Collect the status of every instance in the cluster.
pub(super) async fn observe_cluster(ctx: &Context, cluster: &MySQLCluster) -> ClusterObservation {
    let replicas = usize::try_from(cluster.spec.replicas).unwrap_or(0);
    let mut instances = Vec::with_capacity(replicas);
    for index in 0..replicas {
        instances.push(observe_instance(ctx, cluster, index).await);
    }
    ClusterObservation { instances }
}

async fn observe_instance(
    ctx: &Context,
    cluster: &MySQLCluster,
    index: usize,
) -> InstanceObservation {
    let pod_name = cluster.pod_name(index);
    let mut observation = InstanceObservation::default();

    let mut conn = match ctx.get_db(cluster, index).await {
        Ok(conn) => conn,
        Err(err) => {
            info!(pod = %pod_name, error = %err, "instance not available");
            metrics::record_probe_failure(&cluster.name_any());
            return observation;
        }
    };

    match query_primary_status(&mut conn).await {
        Ok(status) => observation.primary_status = Some(status),
        Err(err) => {
            info!(pod = %pod_name, error = %err, "get primary status failed");
            metrics::record_probe_failure(&cluster.name_any());
            return observation;
        }
    }

    match query_replica_status(&mut conn).await {
        Ok(status) => observation.replica_status = status,
        Err(err) => {
            info!(pod = %pod_name, error = %err, "get replica status failed");
            metrics::record_probe_failure(&cluster.name_any());
            return observation;
        }
    }

    match query_global_variables(&mut conn).await {
        Ok(vars) => observation.global_variables = Some(vars),
        Err(err) => {
            info!(pod = %pod_name, error = %err, "get global variables failed");
            metrics::record_probe_failure(&cluster.name_any());
            return observation;
        }
    }

    match query_clone_state(&mut conn).await {
        Ok(state) => observation.clone_state = state,
        Err(err) => {
            info!(pod = %pod_name, error = %err, "get clone status failed");
            metrics::record_probe_failure(&cluster.name_any());
            return observation;
        }
    }

    observation.available = true;
    observation
}
