//! Result registry.
//!
//! Correlates each incoming worker result with the consumer blocked on it.
//! Entries are keyed by task identifier and mutated by arbitrarily many
//! concurrent RPC handlers; `DashMap` provides the per-entry locking.
//!
//! Delivery goes through a `tokio::sync::oneshot` channel: the send is
//! non-blocking and the value stays buffered in the channel, so an RPC
//! handler is never stalled by a consumer that has not started waiting yet,
//! and a late consumer still observes the value.

use super::types::{DispatchError, ExpressionStatus, TaskResult};

use dashmap::DashMap;
use std::time::Duration;
use tokio::sync::oneshot;

/// Orchestrator-side bookkeeping for one pending sub-task.
struct PendingEntry {
    /// Opaque owning-expression/user context attached by the decomposer.
    owner: String,
    status: ExpressionStatus,
    value: Option<f64>,
    /// Consumed by the first accepted delivery; `None` once fired.
    sender: Option<oneshot::Sender<f64>>,
}

/// Table of pending entries, one per dispatched task identifier.
///
/// Exactly one delivery is accepted per identifier; entries are retained
/// after completion so stale submissions can be distinguished from unknown
/// ones.
pub struct ResultRegistry {
    entries: DashMap<u64, PendingEntry>,
}

/// The consumer half of a registered entry.
///
/// Returned by [`ResultRegistry::register`]; whoever produced the task holds
/// this and blocks on [`ResultHandle::await_result`] until the matching
/// worker submission arrives.
#[derive(Debug)]
pub struct ResultHandle {
    id: u64,
    receiver: oneshot::Receiver<f64>,
}

impl ResultHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits until a result is delivered for this entry, up to `deadline`.
    ///
    /// Returns the delivered value, [`DispatchError::TaskTimeout`] when the
    /// deadline expires first (a dequeued task whose worker died would
    /// otherwise block the consumer forever), or
    /// [`DispatchError::Abandoned`] when the registry dropped the entry
    /// without delivering. A delivery that happened before this call is
    /// still observed: the value sits buffered in the one-shot channel.
    pub async fn await_result(self, deadline: Duration) -> Result<f64, DispatchError> {
        match tokio::time::timeout(deadline, self.receiver).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(DispatchError::Abandoned(self.id)),
            Err(_) => Err(DispatchError::TaskTimeout(self.id)),
        }
    }
}

impl ResultRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Creates the pending entry for `id` and returns the handle its
    /// consumer will wait on. Status starts `InProcess`.
    ///
    /// Identifiers come from the decomposer and are unique in correct
    /// operation; if an entry already exists it is replaced (the stale
    /// handle observes `Abandoned`) and a warning is logged.
    pub fn register(&self, id: u64, owner: &str) -> ResultHandle {
        let (sender, receiver) = oneshot::channel();

        let previous = self.entries.insert(
            id,
            PendingEntry {
                owner: owner.to_string(),
                status: ExpressionStatus::InProcess,
                value: None,
                sender: Some(sender),
            },
        );
        if previous.is_some() {
            tracing::warn!("Replaced stale pending entry for task {}", id);
        }

        ResultHandle { id, receiver }
    }

    /// Accepts a worker result and hands the value to the waiting consumer.
    ///
    /// Fails with `NotFound` for unknown identifiers and `AlreadyComplete`
    /// once an entry is `Done`; at most one delivery per identifier ever
    /// succeeds. The send itself never blocks; a consumer that already gave
    /// up (dropped its handle) is logged and the value retained.
    pub fn deliver(&self, result: &TaskResult) -> Result<(), DispatchError> {
        let mut entry = self
            .entries
            .get_mut(&result.id)
            .ok_or(DispatchError::NotFound(result.id))?;

        if entry.status == ExpressionStatus::Done {
            return Err(DispatchError::AlreadyComplete(result.id));
        }

        entry.status = ExpressionStatus::Done;
        entry.value = Some(result.value);

        match entry.sender.take() {
            Some(sender) => {
                if sender.send(result.value).is_err() {
                    tracing::debug!(
                        "Consumer for task {} is gone; result {} retained",
                        result.id,
                        result.value
                    );
                }
            }
            None => {
                // Unreachable while status gates delivery, but a missing
                // sender must never panic an RPC handler.
                tracing::warn!("Pending entry for task {} had no delivery channel", result.id);
            }
        }

        tracing::info!("Delivered result {} for task {}", result.value, result.id);
        Ok(())
    }

    /// Current status of an entry; `Undefined` for unknown identifiers.
    pub fn status(&self, id: u64) -> ExpressionStatus {
        self.entries
            .get(&id)
            .map(|entry| entry.status)
            .unwrap_or(ExpressionStatus::Undefined)
    }

    /// The delivered value, if the entry is `Done`.
    pub fn value(&self, id: u64) -> Option<f64> {
        self.entries.get(&id).and_then(|entry| entry.value)
    }

    /// The owning-expression/user context attached at registration.
    pub fn owner(&self, id: u64) -> Option<String> {
        self.entries.get(&id).map(|entry| entry.owner.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultRegistry {
    fn default() -> Self {
        Self::new()
    }
}
