//! Orchestrator RPC client.
//!
//! One instance per worker: connections are deliberately not shared, so one
//! worker's backoff or connection failure never stalls another. The client
//! maps the wire statuses back into the agent's error vocabulary — an empty
//! queue and a closed task are expected conditions, everything else is a
//! transport failure that the worker loop answers with its fixed backoff.

use crate::config::AgentConfig;
use crate::dispatch::protocol::{ENDPOINT_FETCH_TASK, ENDPOINT_SUBMIT_RESULT, FetchTaskResponse};
use crate::dispatch::types::{Task, TaskResult};
use crate::transport::tls;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;

/// RPC-level failures seen by a worker.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The orchestrator had no task to hand out. Expected and frequent;
    /// the worker backs off and polls again.
    #[error("no task available")]
    QueueEmpty,

    /// The orchestrator no longer has a pending entry for the submitted
    /// result (unknown or already complete). The task is closed from the
    /// worker's perspective; there is nothing to retry.
    #[error("task is closed on the orchestrator")]
    TaskClosed,

    /// Connection/RPC-level failure; triggers the fixed backoff.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct OrchestratorClient {
    http: reqwest::Client,
    base_url: String,
}

impl OrchestratorClient {
    /// Wraps an existing HTTP client. Used directly by tests that serve the
    /// router over plain HTTP.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Opens an independent HTTPS connection to the configured orchestrator,
    /// trusting exactly the provisioned root certificate.
    pub fn connect(config: &AgentConfig) -> Result<Self> {
        let root_ca = tls::load_root_ca(&config.root_ca)?;
        let http = tls::https_client(root_ca)
            .context("failed to build orchestrator client")?;
        Ok(Self::new(http, config.server_url.clone()))
    }

    /// Pulls one task from the orchestrator queue.
    pub async fn fetch_task(&self) -> Result<Task, AgentError> {
        let url = format!("{}{}", self.base_url, ENDPOINT_FETCH_TASK);
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AgentError::QueueEmpty);
        }

        let body: FetchTaskResponse = response.error_for_status()?.json().await?;
        // A 200 with no task should not happen; treat it like an empty queue.
        body.task.ok_or(AgentError::QueueEmpty)
    }

    /// Submits a computed result. A closed task (unknown or already
    /// complete) is reported as [`AgentError::TaskClosed`], never retried.
    pub async fn submit_result(&self, result: &TaskResult) -> Result<(), AgentError> {
        let url = format!("{}{}", self.base_url, ENDPOINT_SUBMIT_RESULT);
        let response = self.http.post(&url).json(result).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => Err(AgentError::TaskClosed),
            _ => {
                response.error_for_status()?;
                Ok(())
            }
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
