// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous retry of failed score mirror writes.
//!
//! Failed mirrors are queued by user id. The worker reads the user's current
//! score from the record store before every attempt, so a late retry can
//! never overwrite the graph with a stale value.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tasker_config::model::ScoringConfig;
use tasker_core::{GraphStore, RecordStore, TaskerError, UserStore};

use crate::recording;

/// Cloneable sender side of the retry queue.
#[derive(Clone)]
pub struct MirrorHandle {
    tx: mpsc::Sender<String>,
}

impl MirrorHandle {
    /// Queue a resync for `user_id`. Returns false if the queue is full or closed.
    pub fn enqueue(&self, user_id: &str) -> bool {
        match self.tx.try_send(user_id.to_string()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(user_id, "mirror retry queue full, dropping resync");
                recording::record_mirror_retry("dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(user_id, "mirror retry worker stopped, dropping resync");
                recording::record_mirror_retry("dropped");
                false
            }
        }
    }
}

/// Background worker draining the retry queue.
pub struct MirrorRetryWorker {
    records: Arc<dyn RecordStore>,
    graph: Arc<dyn GraphStore>,
    rx: mpsc::Receiver<String>,
    max_attempts: u32,
    backoff: Duration,
}

impl MirrorRetryWorker {
    /// Build a worker and the handle that feeds it.
    pub fn new(
        records: Arc<dyn RecordStore>,
        graph: Arc<dyn GraphStore>,
        config: &ScoringConfig,
    ) -> (Self, MirrorHandle) {
        let (tx, rx) = mpsc::channel(config.mirror_queue_capacity.max(1));
        let worker = Self {
            records,
            graph,
            rx,
            max_attempts: config.mirror_retry_attempts,
            backoff: Duration::from_millis(config.mirror_retry_backoff_ms),
        };
        (worker, MirrorHandle { tx })
    }

    /// Spawn the worker on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Process queued resyncs until cancelled or every handle is dropped.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("mirror retry worker started");
        loop {
            let user_id = tokio::select! {
                _ = cancel.cancelled() => break,
                next = self.rx.recv() => match next {
                    Some(user_id) => user_id,
                    None => break,
                },
            };
            self.resync(&user_id, &cancel).await;
        }
        info!(pending = self.rx.len(), "mirror retry worker stopped");
    }

    /// Retry one user's mirror with linear backoff. Returns true once synced.
    async fn resync(&self, user_id: &str, cancel: &CancellationToken) -> bool {
        for attempt in 1..=self.max_attempts {
            let delay = self.backoff * attempt;
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = tokio::time::sleep(delay) => {}
            }

            match self.mirror_current(user_id).await {
                Ok(Some(score)) => {
                    info!(user_id, score, attempt, "score mirror resynced");
                    recording::record_mirror_retry("synced");
                    return true;
                }
                Ok(None) => {
                    debug!(user_id, "user gone, abandoning mirror resync");
                    return false;
                }
                Err(e) => {
                    warn!(user_id, attempt, error = %e, "score mirror retry failed");
                }
            }
        }
        warn!(user_id, attempts = self.max_attempts, "giving up on score mirror");
        recording::record_mirror_retry("gave_up");
        false
    }

    async fn mirror_current(&self, user_id: &str) -> Result<Option<i64>, TaskerError> {
        let Some(user) = self.records.get_user(user_id).await? else {
            return Ok(None);
        };
        let score = user.effective_score();
        self.graph.set_score(user_id, score, user.revision).await?;
        Ok(Some(score))
    }
}
