// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `planner.rs`

#[cfg(test)]
mod tests {
    use crate::crd::{
        ClusterConditionType, ConditionStatus, MySQLCluster, MySQLClusterSpec, MySQLClusterStatus,
    };
    use crate::errors::ClusteringError;
    use crate::mysql::{
        ClusterObservation, GlobalVariables, InstanceObservation, PrimaryStatus, ReplicaStatus,
    };
    use crate::reconcilers::mysqlcluster::planner::decide_next_operation;
    use crate::reconcilers::mysqlcluster::{Operation, Operator};

    const GTID: &str = "3e11fa47-71ca-11e1-9e33-c80aa9429562:1-5";
    const LAGGING_GTID: &str = "3e11fa47-71ca-11e1-9e33-c80aa9429562:1-3";

    fn cluster(replicas: i32, current_primary: Option<i32>) -> MySQLCluster {
        let mut cluster = MySQLCluster::new("c", MySQLClusterSpec { replicas });
        cluster.metadata.namespace = Some("ns".to_string());
        cluster.status = Some(MySQLClusterStatus {
            current_primary_index: current_primary,
            ..MySQLClusterStatus::default()
        });
        cluster
    }

    /// An available instance that has never replicated from anyone.
    fn fresh_instance() -> InstanceObservation {
        InstanceObservation {
            available: true,
            primary_status: Some(PrimaryStatus {
                executed_gtid_set: Some(GTID.to_string()),
            }),
            replica_status: None,
            global_variables: Some(GlobalVariables {
                read_only: true,
                super_read_only: true,
                rpl_semi_sync_master_wait_for_slave_count: 0,
            }),
            clone_state: None,
        }
    }

    fn writable_primary(wait_count: i32) -> InstanceObservation {
        let mut instance = fresh_instance();
        if let Some(vars) = instance.global_variables.as_mut() {
            vars.read_only = false;
            vars.super_read_only = false;
            vars.rpl_semi_sync_master_wait_for_slave_count = wait_count;
        }
        instance
    }

    fn replica_of(host: &str, gtid: &str, last_io_errno: i32) -> InstanceObservation {
        let mut instance = fresh_instance();
        instance.replica_status = Some(ReplicaStatus {
            last_io_errno,
            master_host: host.to_string(),
            executed_gtid_set: Some(gtid.to_string()),
            slave_io_running: "Yes".to_string(),
            slave_sql_running: "Yes".to_string(),
            ..ReplicaStatus::default()
        });
        instance
    }

    fn condition_status(operation: &Operation, r#type: ClusterConditionType) -> ConditionStatus {
        operation
            .conditions
            .iter()
            .find(|c| c.r#type == r#type)
            .map(|c| c.status)
            .unwrap_or_else(|| panic!("missing condition {:?}", r#type))
    }

    #[test]
    fn test_first_promotion_emits_update_primary() {
        let cluster = cluster(3, None);
        let observed = ClusterObservation {
            instances: vec![fresh_instance(), fresh_instance(), fresh_instance()],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        assert_eq!(
            operation.operators,
            vec![Operator::UpdatePrimary {
                new_primary_index: 0
            }]
        );
        assert!(!operation.wait);
        assert!(operation.conditions.is_empty());
        assert_eq!(operation.synced_replicas, None);
    }

    #[test]
    fn test_promotion_recorded_then_replicas_configured_in_order() {
        let cluster = cluster(3, Some(0));
        let observed = ClusterObservation {
            instances: vec![fresh_instance(), fresh_instance(), fresh_instance()],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        let primary_host = cluster.pod_dns_name(0);
        assert_eq!(
            operation.operators,
            vec![
                Operator::ConfigureReplication {
                    index: 1,
                    primary_host: primary_host.clone()
                },
                Operator::ConfigureReplication {
                    index: 2,
                    primary_host
                },
            ]
        );
    }

    #[test]
    fn test_replica_pointed_elsewhere_is_reconfigured() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                fresh_instance(),
                replica_of(&primary_host, GTID, 0),
                replica_of("stale-host.example.svc", GTID, 0),
            ],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        assert_eq!(
            operation.operators,
            vec![Operator::ConfigureReplication {
                index: 2,
                primary_host
            }]
        );
    }

    #[test]
    fn test_steady_state_is_a_no_op() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                writable_primary(1),
                replica_of(&primary_host, GTID, 0),
                replica_of(&primary_host, GTID, 0),
            ],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        assert!(operation.operators.is_empty());
        assert!(!operation.wait);
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Available),
            ConditionStatus::True
        );
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Healthy),
            ConditionStatus::True
        );
        assert_eq!(
            condition_status(&operation, ClusterConditionType::OutOfSync),
            ConditionStatus::False
        );
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Failure),
            ConditionStatus::False
        );
        assert_eq!(operation.synced_replicas, Some(2));
    }

    #[test]
    fn test_steady_state_is_idempotent() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                writable_primary(1),
                replica_of(&primary_host, GTID, 0),
                replica_of(&primary_host, GTID, 0),
            ],
        };

        let first = decide_next_operation(&cluster, &observed).unwrap();
        let second = decide_next_operation(&cluster, &observed).unwrap();

        assert!(first.operators.is_empty());
        assert!(second.operators.is_empty());
        assert_eq!(first.synced_replicas, second.synced_replicas);
    }

    #[test]
    fn test_gate_passes_with_enough_caught_up_replicas() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                fresh_instance(), // read-only primary
                replica_of(&primary_host, LAGGING_GTID, 0),
                replica_of(&primary_host, GTID, 0),
            ],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        // floor(3/2) = 1 replica caught up is enough to allow writes.
        assert_eq!(
            operation.operators,
            vec![Operator::TurnOffReadOnly { primary_index: 0 }]
        );
        assert!(!operation.wait);
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Available),
            ConditionStatus::True
        );
        assert_eq!(operation.synced_replicas, Some(2));
    }

    #[test]
    fn test_gate_holds_while_all_replicas_lag() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                fresh_instance(), // read-only primary
                replica_of(&primary_host, LAGGING_GTID, 0),
                replica_of(&primary_host, LAGGING_GTID, 0),
            ],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        assert!(operation.operators.is_empty());
        assert!(operation.wait);
        assert_eq!(operation.synced_replicas, None);
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Available),
            ConditionStatus::False
        );
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Healthy),
            ConditionStatus::False
        );
        // Lagging is not out-of-sync: only I/O errors mark an instance.
        assert_eq!(
            condition_status(&operation, ClusterConditionType::OutOfSync),
            ConditionStatus::False
        );
    }

    #[test]
    fn test_gate_passes_unconditionally_once_primary_is_writable() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                writable_primary(1),
                replica_of(&primary_host, LAGGING_GTID, 0),
                replica_of(&primary_host, LAGGING_GTID, 0),
            ],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        assert!(operation.operators.is_empty());
        assert!(!operation.wait);
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Available),
            ConditionStatus::True
        );
    }

    #[test]
    fn test_two_writable_instances_is_a_violation() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                writable_primary(1),
                writable_primary(0),
                replica_of(&primary_host, GTID, 0),
            ],
        };

        let err = decide_next_operation(&cluster, &observed).unwrap_err();
        assert!(matches!(err, ClusteringError::ConstraintsViolation));
    }

    #[test]
    fn test_replica_io_error_counts_as_out_of_sync() {
        let cluster = cluster(3, Some(0));
        let primary_host = cluster.pod_dns_name(0);
        let observed = ClusterObservation {
            instances: vec![
                writable_primary(1),
                replica_of(&primary_host, GTID, 0),
                replica_of(&primary_host, GTID, 1236),
            ],
        };

        let operation = decide_next_operation(&cluster, &observed).unwrap();

        assert!(operation.operators.is_empty());
        assert_eq!(operation.synced_replicas, Some(1));
        assert_eq!(
            condition_status(&operation, ClusterConditionType::OutOfSync),
            ConditionStatus::True
        );
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Healthy),
            ConditionStatus::False
        );
        assert_eq!(
            condition_status(&operation, ClusterConditionType::Available),
            ConditionStatus::True
        );
        let out_of_sync = operation
            .conditions
            .iter()
            .find(|c| c.r#type == ClusterConditionType::OutOfSync)
            .unwrap();
        assert_eq!(
            out_of_sync.message.as_deref(),
            Some("out-of-sync instances: [2]")
        );
    }

    #[test]
    fn test_unavailable_host_aborts_planning() {
        let cluster = cluster(3, Some(0));
        let mut unavailable = fresh_instance();
        unavailable.available = false;
        let observed = ClusterObservation {
            instances: vec![fresh_instance(), unavailable, fresh_instance()],
        };

        let err = decide_next_operation(&cluster, &observed).unwrap_err();
        assert!(matches!(err, ClusteringError::UnavailableHost { .. }));
    }

    #[test]
    fn test_single_instance_cluster_promotes_and_accepts_writes() {
        let unpromoted = cluster(1, None);
        let observed = ClusterObservation {
            instances: vec![fresh_instance()],
        };

        // First pass: promotion.
        let operation = decide_next_operation(&unpromoted, &observed).unwrap();
        assert_eq!(
            operation.operators,
            vec![Operator::UpdatePrimary {
                new_primary_index: 0
            }]
        );

        // With the promotion recorded, floor(1/2) = 0 means the gate passes
        // immediately and writes are enabled.
        let recorded = cluster(1, Some(0));
        let operation = decide_next_operation(&recorded, &observed).unwrap();
        assert_eq!(
            operation.operators,
            vec![Operator::TurnOffReadOnly { primary_index: 0 }]
        );
        assert_eq!(operation.synced_replicas, Some(0));
    }
}
