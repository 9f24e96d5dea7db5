//! Network Protocol Definitions
//!
//! Defines the Data Transfer Objects used for HTTPS communication between
//! the orchestrator and its agents: one endpoint to pull a task, one to push
//! a result back.
//!
//! Constants define the specific API endpoints so the server router and the
//! agent client cannot drift apart.

use super::types::Task;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_FETCH_TASK: &str = "/task/fetch";
pub const ENDPOINT_SUBMIT_RESULT: &str = "/task/result";

/// Response to a fetch poll. `task` is `None` when the queue is empty,
/// alongside a 404 status (an expected, frequent condition — not an
/// operational error).
#[derive(Debug, Serialize, Deserialize)]
pub struct FetchTaskResponse {
    pub task: Option<Task>,
}

/// Acknowledgement for a submitted result. Empty on purpose: the worker only
/// needs the status code.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResultResponse {}
