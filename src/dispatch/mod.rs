//! Task Dispatch Module
//!
//! The orchestrator-side core of the system: accepting sub-tasks from the
//! expression decomposer, handing them out to polling workers, and routing
//! each worker result back to the consumer blocked on it.
//!
//! ## Architecture Overview
//! Dispatch follows a **pull-based** model with **one-shot result delivery**:
//! 1. **Submission**: The decomposer submits a task through the [`Dispatcher`],
//!    which registers a pending entry and appends the task to the FIFO queue.
//! 2. **Fetching**: Workers poll `/task/fetch`; the queue pops in enqueue
//!    order and never blocks a poller (empty means 404, retry later).
//! 3. **Delivery**: A worker posts its result to `/task/result`; the registry
//!    accepts at most one delivery per identifier and wakes the waiting
//!    consumer through a buffered one-shot channel.
//! 4. **Awaiting**: The decomposer blocks on its [`registry::ResultHandle`]
//!    with a deadline, so a worker that crashes between fetch and submit
//!    surfaces as a timeout instead of a hang.
//!
//! ## Submodules
//! - **`queue`**: FIFO task queue with non-blocking pop.
//! - **`registry`**: Pending-entry table and one-shot result correlation.
//! - **`protocol`**: HTTP API contracts between orchestrator and agents.
//! - **`handlers`**: axum handlers for the two RPCs.

pub mod handlers;
pub mod protocol;
pub mod queue;
pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;

use self::queue::TaskQueue;
use self::registry::{ResultHandle, ResultRegistry};
use self::types::{DispatchError, Task};
use std::sync::Arc;

/// The decomposer-facing facade over the queue and registry.
///
/// One instance is shared between the RPC handlers and whatever component
/// produces tasks; submitting registers the pending entry *before* the task
/// becomes visible to workers, so a result can never arrive for an unknown
/// entry through normal operation.
#[derive(Clone)]
pub struct Dispatcher {
    queue: Arc<TaskQueue>,
    registry: Arc<ResultRegistry>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(TaskQueue::new()),
            registry: Arc::new(ResultRegistry::new()),
        }
    }

    /// Registers and enqueues a task, returning the handle the caller awaits
    /// its result on. Identifier 0 is reserved and rejected outright.
    pub fn submit(&self, task: Task, owner: &str) -> Result<ResultHandle, DispatchError> {
        if task.id == 0 {
            return Err(DispatchError::InvalidTask);
        }

        let handle = self.registry.register(task.id, owner);
        self.queue.enqueue(task);
        Ok(handle)
    }

    pub fn queue(&self) -> Arc<TaskQueue> {
        self.queue.clone()
    }

    pub fn registry(&self) -> Arc<ResultRegistry> {
        self.registry.clone()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
