//! Computation Strategies
//!
//! Pluggable per-worker computation behind a uniform async interface.
//! Standard workers evaluate arithmetic locally; the delegated worker
//! substitutes an external inference service's answer for the local
//! evaluation. Every failure here makes the worker drop the task without
//! submitting a result — the computation itself is never retried, only the
//! outer poll loop continues.

use crate::config::AgentConfig;
use crate::dispatch::types::Task;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Wall-clock ceiling for one delegated inference call.
const DELEGATED_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters stripped from the ends of an inference reply before parsing
/// the number out of it.
const REPLY_TRIM: &[char] = &['.', ',', '!', '?', ';', ':', ' ', '\n', '\t', '\r'];

/// Failures of a computation attempt. The task is dropped in every case.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// No inference credential is configured; checked before any network
    /// I/O. The delegated worker keeps running and failing per-task rather
    /// than aborting the process.
    #[error("inference credential is not configured")]
    MissingCredential,

    /// The inference service answered with a non-success status.
    #[error("inference service returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The inference payload had no choices, or its text does not parse as
    /// a number.
    #[error("malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("transport failure calling inference service: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A worker's way of turning a task into a value.
#[async_trait]
pub trait ComputeStrategy: Send + Sync {
    async fn compute(&self, task: &Task) -> Result<f64, ComputeError>;

    /// Short label for worker logs.
    fn name(&self) -> &'static str;
}

/// Deterministic local evaluation.
///
/// Total over the closed operation set; division by zero follows IEEE 754
/// (a non-finite value, not a rejected task).
pub struct LocalCompute;

#[async_trait]
impl ComputeStrategy for LocalCompute {
    async fn compute(&self, task: &Task) -> Result<f64, ComputeError> {
        Ok(task.operation.apply(task.arg1, task.arg2))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Delegation to an external text-completion service.
///
/// Builds a natural-language description of the arithmetic problem, sends a
/// single-turn authenticated request with a fixed timeout, and expects the
/// reply to be a bare number once surrounding whitespace and punctuation are
/// trimmed.
pub struct DelegatedCompute {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl DelegatedCompute {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(DELEGATED_TIMEOUT)
                .build()
                .expect("static client config"),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.inference_url.clone(),
            config.inference_model.clone(),
            config.api_key.clone(),
        )
    }
}

#[async_trait]
impl ComputeStrategy for DelegatedCompute {
    async fn compute(&self, task: &Task) -> Result<f64, ComputeError> {
        let api_key = self.api_key.as_deref().ok_or(ComputeError::MissingCredential)?;

        let prompt = format!(
            "Solve the arithmetic problem: {:.2} {} {:.2}. \
             Reply with only the resulting number, without any explanation.",
            task.arg1,
            task.operation.symbol(),
            task.arg2
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ComputeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| ComputeError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| ComputeError::MalformedResponse("no choices in response".to_string()))?;

        parse_numeric_reply(content)
    }

    fn name(&self) -> &'static str {
        "delegated"
    }
}

/// Extracts the number from an inference reply, tolerating surrounding
/// whitespace and trailing punctuation (` 42.0. ` parses as `42.0`).
pub fn parse_numeric_reply(content: &str) -> Result<f64, ComputeError> {
    let trimmed = content.trim().trim_matches(REPLY_TRIM);
    trimmed.parse::<f64>().map_err(|_| {
        ComputeError::MalformedResponse(format!("reply is not a number: {:?}", content))
    })
}
