// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SIGINT/SIGTERM handling.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Spawn a listener that cancels the returned token on the first shutdown signal.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        let signal = shutdown_signal().await;
        info!(signal, "shutting down");
        trigger.cancel();
    });
    token
}

/// Resolve with the name of whichever signal arrived first.
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = term.recv() => "SIGTERM",
        },
        Err(e) => {
            warn!(error = %e, "SIGTERM unavailable, stopping on Ctrl+C only");
            ctrl_c().await
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Never cancel on a broken listener; the process then stops only when killed.
        warn!(error = %e, "Ctrl+C listener failed");
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
