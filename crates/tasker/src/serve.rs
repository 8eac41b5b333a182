// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tasker serve` command implementation.
//!
//! Opens SQLite storage, installs the Prometheus recorder, starts the score
//! mirror retry worker, and serves the HTTP gateway until a shutdown signal
//! arrives.

use std::sync::Arc;
use std::time::Duration;

use tasker_config::TaskerConfig;
use tasker_core::{StoreAdapter, TaskerError};
use tasker_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig};
use tasker_prometheus::PrometheusAdapter;
use tasker_scoring::{CompletionOrchestrator, MirrorRetryWorker};
use tasker_storage::SqliteStore;
use tracing::{debug, info, warn};

use crate::shutdown;

/// Upper bound on waiting for the mirror worker after shutdown.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the service until SIGINT/SIGTERM.
pub async fn run_serve(config: TaskerConfig) -> Result<(), TaskerError> {
    init_tracing(&config.service.log_level);
    info!(service = %config.service.name, version = env!("CARGO_PKG_VERSION"), "starting");

    let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
    info!(path = %config.storage.database_path, "storage ready");

    let prometheus = if config.metrics.enabled {
        match PrometheusAdapter::new() {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                warn!(error = %e, "prometheus initialization failed, continuing without metrics");
                None
            }
        }
    } else {
        debug!("prometheus metrics disabled by configuration");
        None
    };

    let cancel = shutdown::install_signal_handler();

    let (worker, mirror_queue) =
        MirrorRetryWorker::new(store.clone(), store.clone(), &config.scoring);
    let worker_handle = worker.spawn(cancel.child_token());

    let orchestrator = CompletionOrchestrator::new(store.clone(), store.clone(), &config.scoring)
        .with_mirror_queue(mirror_queue);

    let prometheus_render = prometheus.map(|adapter| {
        let render: Arc<dyn Fn() -> String + Send + Sync> = Arc::new(move || adapter.render());
        render
    });

    let state = GatewayState {
        records: store.clone(),
        graph: store.clone(),
        requests: store.clone(),
        orchestrator: Arc::new(orchestrator),
        auth: AuthConfig {
            api_key: config.server.api_key.clone(),
        },
        health: HealthState {
            start_time: std::time::Instant::now(),
            prometheus_render,
        },
    };
    if config.server.api_key.is_none() {
        warn!("no server.api_key configured; every /api request will be rejected");
    }

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let served = tasker_gateway::start_server(&server_config, state, cancel.clone()).await;

    // A bind failure returns before any signal; stop the worker either way.
    cancel.cancel();
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker_handle)
        .await
        .is_err()
    {
        warn!("mirror retry worker did not stop in time");
    }

    store.close().await?;
    info!("tasker serve shutdown complete");
    served
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tasker={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
