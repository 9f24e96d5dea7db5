//! Orchestrator-side task queue.
//!
//! A single-producer/multi-consumer FIFO shared across concurrently running
//! RPC handlers. Access is serialized internally, but a dequeue never blocks
//! the caller: an empty queue is an immediately visible, expected condition
//! ("retry later"), not an error.

use super::types::Task;

use std::collections::VecDeque;
use std::sync::Mutex;

/// FIFO of pending sub-tasks awaiting a worker.
///
/// Tasks are delivered in enqueue order, but which worker receives which
/// task is decided by fetch order alone (first poller wins). A dequeued task
/// is owned by its worker until submitted; there is no re-queueing.
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends a task to the tail. Always succeeds.
    pub fn enqueue(&self, task: Task) {
        let id = task.id;
        let mut tasks = self.tasks.lock().expect("task queue lock poisoned");
        tasks.push_back(task);
        tracing::debug!("Enqueued task {} (queue depth {})", id, tasks.len());
    }

    /// Removes and returns the head task, or `None` if the queue is empty.
    /// Never blocks the poller.
    pub fn try_dequeue(&self) -> Option<Task> {
        let mut tasks = self.tasks.lock().expect("task queue lock poisoned");
        tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().expect("task queue lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
