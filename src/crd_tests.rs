// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `crd.rs`

#[cfg(test)]
mod tests {
    use crate::crd::{
        ClusterCondition, ClusterConditionType, ConditionStatus, MySQLCluster, MySQLClusterSpec,
        MySQLClusterStatus,
    };

    fn cluster() -> MySQLCluster {
        let mut cluster = MySQLCluster::new("orders", MySQLClusterSpec { replicas: 3 });
        cluster.metadata.namespace = Some("shop".to_string());
        cluster
    }

    #[test]
    fn test_unique_name_is_prefixed() {
        assert_eq!(cluster().unique_name(), "primly-orders");
    }

    #[test]
    fn test_pod_name_appends_ordinal() {
        let cluster = cluster();
        assert_eq!(cluster.pod_name(0), "primly-orders-0");
        assert_eq!(cluster.pod_name(2), "primly-orders-2");
    }

    #[test]
    fn test_pod_dns_name_derivation() {
        assert_eq!(
            cluster().pod_dns_name(1),
            "primly-orders-1.primly-orders.shop.svc"
        );
    }

    #[test]
    fn test_credentials_secret_name() {
        assert_eq!(
            cluster().credentials_secret_name(),
            "primly-orders-credentials"
        );
    }

    #[test]
    fn test_current_primary_index_absent_by_default() {
        assert_eq!(cluster().current_primary_index(), None);
    }

    #[test]
    fn test_current_primary_index_reads_status() {
        let mut cluster = cluster();
        cluster.status = Some(MySQLClusterStatus {
            current_primary_index: Some(2),
            ..MySQLClusterStatus::default()
        });
        assert_eq!(cluster.current_primary_index(), Some(2));
    }

    #[test]
    fn test_condition_status_serializes_as_kubernetes_string() {
        assert_eq!(
            serde_json::to_string(&ConditionStatus::True).unwrap(),
            "\"True\""
        );
        assert_eq!(
            serde_json::to_string(&ConditionStatus::Unknown).unwrap(),
            "\"Unknown\""
        );
    }

    #[test]
    fn test_condition_round_trip() {
        let condition = ClusterCondition {
            r#type: ClusterConditionType::OutOfSync,
            status: ConditionStatus::True,
            message: Some("out-of-sync instances: [2]".to_string()),
            last_transition_time: Some("2025-01-01T00:00:00+00:00".to_string()),
        };

        let json = serde_json::to_string(&condition).unwrap();
        assert!(json.contains("\"type\":\"OutOfSync\""));
        assert!(json.contains("\"lastTransitionTime\""));

        let decoded: ClusterCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, condition);
    }

    #[test]
    fn test_status_defaults() {
        let status = MySQLClusterStatus::default();
        assert_eq!(status.current_primary_index, None);
        assert_eq!(status.synced_replicas, 0);
        assert_eq!(status.ready, ConditionStatus::Unknown);
        assert!(status.conditions.is_empty());
    }

    #[test]
    fn test_condition_type_display() {
        assert_eq!(ClusterConditionType::Available.to_string(), "Available");
        assert_eq!(ClusterConditionType::Violation.to_string(), "Violation");
    }
}
