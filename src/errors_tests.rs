// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `errors.rs`

#[cfg(test)]
mod tests {
    use crate::errors::ClusteringError;
    use crate::mysql::MySqlError;

    #[test]
    fn test_kind_is_stable_per_variant() {
        let unavailable = ClusteringError::UnavailableHost {
            namespace: "shop".to_string(),
            name: "orders".to_string(),
        };
        assert_eq!(unavailable.kind(), "UnavailableHost");
        assert_eq!(
            ClusteringError::ConstraintsViolation.kind(),
            "ConstraintsViolation"
        );
        assert_eq!(
            ClusteringError::ConstraintsRecovered.kind(),
            "ConstraintsRecovered"
        );
    }

    #[test]
    fn test_mysql_exec_carries_instance_ordinal() {
        let err = ClusteringError::mysql_exec(
            2,
            MySqlError::EmptyResultSet {
                query: "SHOW MASTER STATUS",
            },
        );
        assert_eq!(err.kind(), "MySQLExecError");
        assert!(err.to_string().contains("instance 2"));
    }

    #[test]
    fn test_store_conflict_detection() {
        let conflict = ClusteringError::Store(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "Operation cannot be fulfilled".to_string(),
            reason: "Conflict".to_string(),
            code: 409,
        }));
        assert!(conflict.is_conflict());
        assert_eq!(conflict.kind(), "StoreConflict");

        let not_found = ClusteringError::Store(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "not found".to_string(),
            reason: "NotFound".to_string(),
            code: 404,
        }));
        assert!(!not_found.is_conflict());
        assert_eq!(not_found.kind(), "StoreError");
    }

    #[test]
    fn test_missing_credential_message_names_secret_and_key() {
        let err = ClusteringError::MissingCredential {
            secret: "primly-orders-credentials".to_string(),
            key: "operator-password".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("primly-orders-credentials"));
        assert!(message.contains("operator-password"));
    }
}
