use super::protocol::*;
use super::queue::TaskQueue;
use super::registry::ResultRegistry;
use super::types::{DispatchError, TaskResult};

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

/// `GET /task/fetch` — pops one task for the polling worker.
///
/// An empty queue answers 404 with no task; workers back off and poll again.
pub async fn handle_fetch_task(
    Extension(queue): Extension<Arc<TaskQueue>>,
) -> (StatusCode, Json<FetchTaskResponse>) {
    match queue.try_dequeue() {
        Some(task) if task.id == 0 => {
            // Producers must never enqueue identifier 0; if one slips
            // through it is dropped here rather than dispatched.
            tracing::error!("Dropped invalid task with identifier 0");
            (StatusCode::NOT_FOUND, Json(FetchTaskResponse { task: None }))
        }
        Some(task) => {
            tracing::debug!("Dispatching task {} ({} left queued)", task.id, queue.len());
            (StatusCode::OK, Json(FetchTaskResponse { task: Some(task) }))
        }
        None => {
            tracing::trace!("Fetch poll on empty queue");
            (StatusCode::NOT_FOUND, Json(FetchTaskResponse { task: None }))
        }
    }
}

/// `POST /task/result` — resolves the pending entry for a worker result.
///
/// Stale submissions are logged and answered with 404 (unknown id) or 409
/// (already complete); the worker treats both as "task closed" and moves on.
pub async fn handle_submit_result(
    Extension(registry): Extension<Arc<ResultRegistry>>,
    Json(result): Json<TaskResult>,
) -> (StatusCode, Json<SubmitResultResponse>) {
    let status = match registry.deliver(&result) {
        Ok(()) => StatusCode::OK,
        Err(DispatchError::NotFound(id)) => {
            tracing::warn!("Result for unknown task {}", id);
            StatusCode::NOT_FOUND
        }
        Err(DispatchError::AlreadyComplete(id)) => {
            tracing::warn!("Duplicate result for completed task {}", id);
            StatusCode::CONFLICT
        }
        Err(e) => {
            tracing::error!("Failed to deliver result for task {}: {}", result.id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(SubmitResultResponse {}))
}
