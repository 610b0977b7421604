// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pooled MySQL handles for cluster instances.
//!
//! The accessor is a process-wide singleton: one connection pool per
//! `(user, host)` pair, created lazily on first use and shared across
//! reconciles and clusters. Callers receive a live connection per call and
//! return it to the pool by dropping it.

use crate::constants::{MYSQL_CONNECT_TIMEOUT_SECS, MYSQL_PORT};
use crate::mysql::MySqlError;
use mysql_async::{Conn, OptsBuilder, Pool};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Per-host MySQL connection pools.
///
/// Pools are keyed by `"<user>@<host>"`. A pool built with a rotated
/// password keeps failing checkout; the failed checkout evicts the pool so
/// the next call rebuilds it with the current credentials.
pub struct MySqlAccessor {
    pools: Mutex<HashMap<String, Pool>>,
    connect_timeout: Duration,
}

impl Default for MySqlAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlAccessor {
    /// Create an accessor with the default connect timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_connect_timeout(Duration::from_secs(MYSQL_CONNECT_TIMEOUT_SECS))
    }

    /// Create an accessor with an explicit TCP connect timeout.
    #[must_use]
    pub fn with_connect_timeout(connect_timeout: Duration) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            connect_timeout,
        }
    }

    /// Check out a live connection to `host` as `user`.
    ///
    /// # Errors
    ///
    /// Returns an error when the instance does not accept connections; the
    /// probe treats that as the normal signal that the instance is not
    /// ready.
    pub async fn get_conn(
        &self,
        host: &str,
        user: &str,
        password: &str,
    ) -> Result<Conn, MySqlError> {
        let key = format!("{user}@{host}");

        let pool = {
            let mut pools = self.pools.lock().await;
            pools
                .entry(key.clone())
                .or_insert_with(|| {
                    debug!(host = %host, user = %user, "creating MySQL connection pool");
                    let opts = OptsBuilder::default()
                        .ip_or_hostname(host)
                        .tcp_port(MYSQL_PORT)
                        .user(Some(user))
                        .pass(Some(password))
                        .tcp_connect_timeout(Some(self.connect_timeout))
                        .prefer_socket(false);
                    Pool::new(opts)
                })
                .clone()
        };

        match pool.get_conn().await {
            Ok(conn) => Ok(conn),
            Err(err) => {
                // A broken pool (died server, rotated password) must not be
                // reused; evict it so the next call rebuilds from scratch.
                self.discard(&key).await;
                Err(err.into())
            }
        }
    }

    async fn discard(&self, key: &str) {
        if let Some(pool) = self.pools.lock().await.remove(key) {
            debug!(key = %key, "discarding MySQL connection pool");
            tokio::spawn(async move {
                let _ = pool.disconnect().await;
            });
        }
    }
}
