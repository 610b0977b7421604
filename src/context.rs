// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the clustering controller.
//!
//! The context is the process-wide infrastructure handed to every
//! reconcile: the Kubernetes client and the pooled MySQL accessor. Both are
//! initialized once at startup; the reconcilers themselves hold no mutable
//! process state.

use crate::constants::{MYSQL_ADMIN_USER, OPERATOR_PASSWORD_KEY};
use crate::crd::MySQLCluster;
use crate::errors::ClusteringError;
use crate::mysql::MySqlAccessor;
use crate::reconcilers::retry::retry_read;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client, ResourceExt};
use mysql_async::Conn;
use std::sync::Arc;

/// Infrastructure passed to the reconciler and the operators.
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client for resource store operations
    pub client: Client,

    /// Pooled MySQL handles, shared across clusters
    pub mysql: Arc<MySqlAccessor>,
}

impl Context {
    /// Build the context from a connected Kubernetes client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            mysql: Arc::new(MySqlAccessor::new()),
        }
    }

    /// Open a database handle to the instance at `index`, authenticating as
    /// the operator admin user.
    ///
    /// # Errors
    ///
    /// Returns an error when the credentials secret cannot be read or the
    /// instance does not accept connections.
    pub async fn get_db(
        &self,
        cluster: &MySQLCluster,
        index: usize,
    ) -> Result<Conn, ClusteringError> {
        let password = self.get_password(cluster, OPERATOR_PASSWORD_KEY).await?;
        self.mysql
            .get_conn(&cluster.pod_dns_name(index), MYSQL_ADMIN_USER, &password)
            .await
            .map_err(|err| ClusteringError::mysql_exec(index, err))
    }

    /// Read a password from the cluster's credentials secret.
    ///
    /// Secret reads are idempotent, so transient API errors are retried
    /// with backoff before surfacing.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is missing, unreadable, or does not
    /// contain `key`.
    pub async fn get_password(
        &self,
        cluster: &MySQLCluster,
        key: &str,
    ) -> Result<String, ClusteringError> {
        let namespace = cluster.namespace().unwrap_or_default();
        let secret_name = cluster.credentials_secret_name();
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &namespace);

        let secret = retry_read("get credentials secret", || api.get(&secret_name)).await?;

        let value = secret
            .data
            .as_ref()
            .and_then(|data| data.get(key))
            .ok_or_else(|| ClusteringError::MissingCredential {
                secret: secret_name.clone(),
                key: key.to_string(),
            })?;

        String::from_utf8(value.0.clone()).map_err(|_| ClusteringError::MissingCredential {
            secret: secret_name,
            key: key.to_string(),
        })
    }
}
