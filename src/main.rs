// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axum::{routing::get, Router};
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client,
};
use kube_lease_manager::{LeaseManager, LeaseManagerBuilder};
use primly::{
    constants::{
        DEFAULT_LEASE_DURATION_SECS, DEFAULT_LEASE_RENEW_DEADLINE_SECS,
        DEFAULT_LEASE_RETRY_PERIOD_SECS, ERROR_REQUEUE_DURATION_SECS, METRICS_SERVER_BIND_ADDRESS,
        METRICS_SERVER_PATH, METRICS_SERVER_PORT, TOKIO_WORKER_THREADS,
    },
    context::Context,
    crd::MySQLCluster,
    metrics,
    reconcilers::reconcile_mysqlcluster,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct ReconcileError(#[from] anyhow::Error);

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("primly-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

/// Initialize logging with custom format
///
/// Respects `RUST_LOG` environment variable if set, otherwise defaults to INFO level.
/// Respects `RUST_LOG_FORMAT` environment variable for output format (json or text).
fn initialize_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting Primly MySQL clustering operator");
    debug!("Logging initialized with file and line number tracking");
}

/// Initialize the Kubernetes client and the shared controller context
async fn initialize_services() -> Result<Arc<Context>> {
    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    Ok(Arc::new(Context::new(client)))
}

/// Start the Prometheus metrics HTTP server
///
/// Serves metrics on the configured port and path (default: 0.0.0.0:8080/metrics)
///
/// # Returns
/// A `JoinHandle` that can be used to monitor the server task
fn start_metrics_server() -> tokio::task::JoinHandle<()> {
    info!(
        bind_address = METRICS_SERVER_BIND_ADDRESS,
        port = METRICS_SERVER_PORT,
        path = METRICS_SERVER_PATH,
        "Starting Prometheus metrics HTTP server"
    );

    tokio::spawn(async move {
        async fn metrics_handler() -> String {
            match metrics::gather_metrics() {
                Ok(metrics_text) => metrics_text,
                Err(e) => {
                    error!("Failed to gather metrics: {}", e);
                    String::from("# Error gathering metrics\n")
                }
            }
        }

        let app = Router::new().route(METRICS_SERVER_PATH, get(metrics_handler));

        let bind_addr = format!("{METRICS_SERVER_BIND_ADDRESS}:{METRICS_SERVER_PORT}");
        let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind metrics server to {bind_addr}: {e}");
                return;
            }
        };

        info!("Metrics server listening on http://{bind_addr}{METRICS_SERVER_PATH}");

        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {e}");
        }
    })
}

/// Leader election configuration
struct LeaderElectionConfig {
    enabled: bool,
    lease_name: String,
    lease_namespace: String,
    identity: String,
    lease_duration: u64,
    retry_period: u64,
}

/// Load leader election configuration from environment variables
fn load_leader_election_config() -> LeaderElectionConfig {
    let enabled = std::env::var("PRIMLY_ENABLE_LEADER_ELECTION")
        .unwrap_or_else(|_| "true".to_string())
        .parse::<bool>()
        .unwrap_or(true);

    let lease_name =
        std::env::var("PRIMLY_LEASE_NAME").unwrap_or_else(|_| "primly-leader".to_string());

    let lease_namespace = std::env::var("PRIMLY_LEASE_NAMESPACE")
        .or_else(|_| std::env::var("POD_NAMESPACE"))
        .unwrap_or_else(|_| "mysql-system".to_string());

    let lease_duration = std::env::var("PRIMLY_LEASE_DURATION_SECONDS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_LEASE_DURATION_SECS);

    // The renew deadline is currently implied by the lease duration and
    // grace period; keep the variable parsed so deployments can set it.
    let _renew_deadline = std::env::var("PRIMLY_LEASE_RENEW_DEADLINE_SECONDS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_LEASE_RENEW_DEADLINE_SECS);

    let retry_period = std::env::var("PRIMLY_LEASE_RETRY_PERIOD_SECONDS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_LEASE_RETRY_PERIOD_SECS);

    let identity = std::env::var("POD_NAME")
        .or_else(|_| std::env::var("HOSTNAME"))
        .unwrap_or_else(|_| format!("primly-{}", rand::random::<u32>()));

    LeaderElectionConfig {
        enabled,
        lease_name,
        lease_namespace,
        identity,
        lease_duration,
        retry_period,
    }
}

async fn async_main() -> Result<()> {
    initialize_logging();

    let ctx = initialize_services().await?;

    // Start the metrics HTTP server
    let _metrics_handle = start_metrics_server();

    let config = load_leader_election_config();

    if config.enabled {
        info!(
            lease_name = %config.lease_name,
            lease_namespace = %config.lease_namespace,
            identity = %config.identity,
            lease_duration_secs = config.lease_duration,
            "Leader election enabled"
        );

        info!("Starting leader election, waiting to acquire leadership...");

        let lease_manager = LeaseManagerBuilder::new(ctx.client.clone(), &config.lease_name)
            .with_namespace(&config.lease_namespace)
            .with_identity(&config.identity)
            .with_duration(config.lease_duration)
            .with_grace(config.retry_period)
            .build()
            .await?;

        let (leader_rx, lease_handle) = lease_manager.watch().await;

        // Wait until we become leader
        let mut rx = leader_rx.clone();
        while !*rx.borrow_and_update() {
            rx.changed().await?;
        }

        info!("Leadership acquired, starting controller");
        metrics::record_leader_elected(&config.identity);

        run_controller_with_leader_election(ctx, &config.identity, leader_rx, lease_handle).await?;
    } else {
        run_controller_without_leader_election(ctx).await?;
    }

    Ok(())
}

/// Monitor leadership status - returns when leadership is lost or an error occurs
async fn monitor_leadership(
    mut leader_rx: tokio::sync::watch::Receiver<bool>,
) -> Result<(), anyhow::Error> {
    loop {
        leader_rx.changed().await?;
        if !*leader_rx.borrow() {
            // Leadership lost
            return Ok(());
        }
    }
}

/// Run the controller with leader election monitoring and signal handling.
///
/// If leadership is lost or SIGTERM/SIGINT is received, the controller is
/// stopped and the process exits gracefully.
async fn run_controller_with_leader_election(
    ctx: Arc<Context>,
    identity: &str,
    leader_rx: tokio::sync::watch::Receiver<bool>,
    _lease_handle: tokio::task::JoinHandle<
        Result<LeaseManager, kube_lease_manager::LeaseManagerError>,
    >,
) -> Result<()> {
    info!("Running controller with leader election and signal handling");

    let shutdown_result: Result<()> = tokio::select! {
        // Monitor for SIGINT (Ctrl+C)
        result = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
            result.map_err(anyhow::Error::from)
        }

        // Monitor for SIGTERM (Kubernetes sends this when deleting pods)
        result = wait_for_sigterm() => {
            info!("Received SIGTERM (pod termination), initiating graceful shutdown...");
            result
        }

        // Monitor leadership - if lost, stop the controller
        result = monitor_leadership(leader_rx) => {
            metrics::record_leader_lost(identity);
            match result {
                Ok(()) => {
                    warn!("Leadership lost! Stopping controller...");
                    anyhow::bail!("Leadership lost - stepping down")
                }
                Err(e) => {
                    error!("Leadership monitor error: {:?}", e);
                    anyhow::bail!("Leadership monitoring failed: {e}")
                }
            }
        }

        result = run_mysqlcluster_controller(ctx) => {
            result
        }
    };

    shutdown_result?;
    info!("Graceful shutdown completed successfully, leader election lease released");
    Ok(())
}

/// Run the controller without leader election, with signal handling
async fn run_controller_without_leader_election(ctx: Arc<Context>) -> Result<()> {
    warn!("Leader election DISABLED - running without high availability");

    let shutdown_result: Result<()> = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
            result.map_err(anyhow::Error::from)
        }

        result = wait_for_sigterm() => {
            info!("Received SIGTERM (pod termination), initiating graceful shutdown...");
            result
        }

        result = run_mysqlcluster_controller(ctx) => {
            result
        }
    };

    shutdown_result?;
    info!("Graceful shutdown completed successfully");

    Ok(())
}

async fn wait_for_sigterm() -> Result<(), anyhow::Error> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        sigterm.recv().await;
        Ok(())
    }
    #[cfg(not(unix))]
    {
        // On non-Unix platforms, just wait forever
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Run the `MySQLCluster` controller
async fn run_mysqlcluster_controller(ctx: Arc<Context>) -> Result<()> {
    info!("Starting MySQLCluster controller");

    let api = Api::<MySQLCluster>::all(ctx.client.clone());

    // Status updates must re-trigger reconciliation: a promotion persists
    // the primary ordinal and relies on the follow-up event to continue
    // with replica configuration. No semantic filtering here.
    Controller::new(api, Config::default())
        .run(reconcile_mysqlcluster_wrapper, error_policy, ctx)
        .for_each(|result| async move {
            match result {
                Ok(obj) => debug!("Reconciled {:?}", obj),
                Err(e) => debug!("Reconciliation error: {:?}", e),
            }
        })
        .await;

    error!("CRITICAL: MySQLCluster controller exited unexpectedly");
    anyhow::bail!("MySQLCluster controller exited unexpectedly")
}

async fn reconcile_mysqlcluster_wrapper(
    cluster: Arc<MySQLCluster>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = std::time::Instant::now();

    match reconcile_mysqlcluster(ctx, cluster).await {
        Ok(action) => {
            metrics::record_reconciliation_success(start.elapsed());
            Ok(action)
        }
        Err(err) => {
            metrics::record_reconciliation_error(start.elapsed());
            metrics::record_error(err.kind());
            if err.is_conflict() {
                // A lost optimistic-concurrency race is an expected
                // interleaving; the requeue re-reads and retries.
                debug!(kind = err.kind(), "status update lost a conflict, requeueing");
            } else {
                warn!(kind = err.kind(), error = %err, "reconciliation failed");
            }
            Err(ReconcileError::from(anyhow::Error::from(err)))
        }
    }
}

fn error_policy(
    _cluster: Arc<MySQLCluster>,
    _err: &ReconcileError,
    _ctx: Arc<Context>,
) -> Action {
    metrics::record_reconciliation_requeue("error");
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}
