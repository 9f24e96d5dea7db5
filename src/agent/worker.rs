//! Worker Pool Implementation
//!
//! Spawns the agent's workers and drives each one's infinite
//! poll -> compute -> submit loop. Workers are fully independent: each owns
//! its client connection and its own sleeps, so one worker backing off or
//! chewing on a slow task never blocks another.
//!
//! The only retry policy in the system lives here: a fixed-interval backoff
//! (no exponential growth, no jitter, no attempt ceiling) after a failed
//! fetch — including the expected empty-queue answer — and after a failed
//! result submission. A result that fails to submit is discarded, not
//! re-sent: delivery is attempted at most once.

use super::client::{AgentError, OrchestratorClient};
use super::compute::{ComputeStrategy, DelegatedCompute, LocalCompute};
use crate::config::AgentConfig;
use crate::dispatch::types::TaskResult;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Delay between worker launches, so a restarting agent does not open all
/// its connections against the orchestrator at once.
pub const LAUNCH_STAGGER: Duration = Duration::from_secs(1);

/// The agent's set of workers: N standard (local arithmetic) plus exactly
/// one delegated-computation worker.
///
/// Workers are tracked and joined at shutdown; the shared cancellation token
/// reaches into every sleep and poll so the pool stops cleanly instead of
/// being torn down mid-task.
pub struct WorkerPool {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            handles: Vec::new(),
        }
    }

    /// Token observed by every worker; cancel it to stop the pool.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Launches `computing_power` standard workers and the delegated worker,
    /// each over its own connection, with a staggered delay between
    /// launches.
    ///
    /// The delegated worker always runs: without a configured credential it
    /// fails each task with a missing-credential error rather than keeping
    /// the process from starting.
    pub async fn start(&mut self, config: &AgentConfig) -> Result<()> {
        for worker_id in 1..=config.computing_power {
            let client = OrchestratorClient::connect(config)?;
            self.spawn(
                format!("standard-{}", worker_id),
                client,
                Arc::new(LocalCompute),
                config.idle_delay,
            );
            tokio::time::sleep(LAUNCH_STAGGER).await;
        }

        let client = OrchestratorClient::connect(config)?;
        self.spawn(
            "delegated".to_string(),
            client,
            Arc::new(DelegatedCompute::from_config(config)),
            config.idle_delay,
        );

        tracing::info!("Worker pool started with {} workers", self.handles.len());
        Ok(())
    }

    fn spawn(
        &mut self,
        label: String,
        client: OrchestratorClient,
        strategy: Arc<dyn ComputeStrategy>,
        backoff: Duration,
    ) {
        let token = self.token.clone();
        self.handles.push(tokio::spawn(async move {
            worker_loop(&label, client, strategy, backoff, token).await;
        }));
    }

    /// Cancels every worker and waits for all of them to finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        for handle in self.handles {
            let _ = handle.await;
        }
        tracing::info!("Worker pool stopped");
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

/// One worker's infinite loop: fetch, wait out the simulated cost, compute,
/// submit, repeat.
///
/// Failures never escape the loop — they cause a fixed backoff (transport),
/// a dropped task (compute), or a shrug (closed task). The loop ends only
/// through the cancellation token.
pub async fn worker_loop(
    label: &str,
    client: OrchestratorClient,
    strategy: Arc<dyn ComputeStrategy>,
    backoff: Duration,
    token: CancellationToken,
) {
    tracing::info!("Worker {} started ({} strategy)", label, strategy.name());

    loop {
        let fetched = tokio::select! {
            _ = token.cancelled() => break,
            fetched = client.fetch_task() => fetched,
        };

        let task = match fetched {
            Ok(task) => task,
            Err(AgentError::QueueEmpty) => {
                tracing::trace!("Worker {}: queue empty, backing off", label);
                if pause(&token, backoff).await {
                    break;
                }
                continue;
            }
            Err(e) => {
                tracing::warn!(
                    "Worker {}: failed to fetch task: {}. Retrying in {:?}",
                    label,
                    e,
                    backoff
                );
                if pause(&token, backoff).await {
                    break;
                }
                continue;
            }
        };

        // Defensive validation against a malformed response; identifier 0
        // is reserved and must never be computed.
        if task.id == 0 {
            tracing::warn!("Worker {}: discarded invalid task with identifier 0", label);
            continue;
        }

        tracing::debug!(
            "Worker {}: picked up task {} ({} {} {}, {} ms)",
            label,
            task.id,
            task.arg1,
            task.operation.symbol(),
            task.arg2,
            task.operation_time_ms
        );

        // Simulated compute cost. Per-worker and cancellable.
        if pause(&token, Duration::from_millis(task.operation_time_ms)).await {
            break;
        }

        let value = match strategy.compute(&task).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Worker {}: dropped task {}: {}", label, task.id, e);
                continue;
            }
        };

        match client.submit_result(&TaskResult { id: task.id, value }).await {
            Ok(()) => {
                tracing::info!("Worker {}: task {} completed, result {}", label, task.id, value);
            }
            Err(AgentError::TaskClosed) => {
                tracing::warn!(
                    "Worker {}: task {} is already closed, result {} ignored",
                    label,
                    task.id,
                    value
                );
            }
            Err(e) => {
                // The computed result is discarded; the next loop iteration
                // starts from a fresh fetch.
                tracing::warn!(
                    "Worker {}: failed to submit result for task {}: {}. Retrying in {:?}",
                    label,
                    task.id,
                    e,
                    backoff
                );
                if pause(&token, backoff).await {
                    break;
                }
            }
        }
    }

    tracing::info!("Worker {} stopped", label);
}

/// Sleeps for `duration` unless cancelled first; returns whether the token
/// fired.
async fn pause(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = tokio::time::sleep(duration) => false,
    }
}
