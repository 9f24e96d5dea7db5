use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An arithmetic operation, resolved once when the task is created.
///
/// Serializes as the operation symbol (`"+"`, `"-"`, `"*"`, `"/"`) so the
/// wire format stays a plain string. Unknown symbols are rejected at
/// task-creation time by [`Operation::from_symbol`] instead of being carried
/// around and re-parsed on every execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Operation {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operation {
    /// Resolves an operation symbol, failing with
    /// [`DispatchError::UnsupportedOperation`] for anything outside the
    /// closed set.
    pub fn from_symbol(symbol: &str) -> Result<Self, DispatchError> {
        match symbol {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Subtract),
            "*" => Ok(Self::Multiply),
            "/" => Ok(Self::Divide),
            other => Err(DispatchError::UnsupportedOperation(other.to_string())),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Applies the operation with plain IEEE 754 semantics.
    ///
    /// Division by zero yields an infinite or NaN value rather than an
    /// error; the result is passed through to the consumer as-is.
    pub fn apply(&self, arg1: f64, arg2: f64) -> f64 {
        match self {
            Self::Add => arg1 + arg2,
            Self::Subtract => arg1 - arg2,
            Self::Multiply => arg1 * arg2,
            Self::Divide => arg1 / arg2,
        }
    }
}

/// An atomic arithmetic unit of work dispatched to a worker.
///
/// Identifier 0 is reserved/invalid and must never be dispatched; producers
/// reject it before enqueueing and workers discard it on receipt. A task is
/// immutable once enqueued and consumed exactly once by whichever worker
/// successfully pops it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: u64,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: Operation,
    /// Simulated compute cost in milliseconds; the worker sleeps this long
    /// before evaluating.
    pub operation_time_ms: u64,
}

/// A computed result on its way back to the orchestrator.
///
/// Transient: exists only on the wire and while being matched against the
/// result registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskResult {
    pub id: u64,
    pub value: f64,
}

/// Lifecycle state of a pending expression entry in the result registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpressionStatus {
    /// Registered, no result delivered yet.
    InProcess,
    /// A result has been accepted; further deliveries are rejected.
    Done,
    /// The registry has no entry for the queried identifier.
    Undefined,
}

/// Failures of the orchestrator-side dispatch machinery.
#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    /// Task identifier 0 is reserved and never dispatched.
    #[error("invalid task: identifier is zero")]
    InvalidTask,

    /// No pending entry exists for the identifier.
    #[error("no pending entry for task {0}")]
    NotFound(u64),

    /// A result was already accepted for the identifier.
    #[error("task {0} is already complete")]
    AlreadyComplete(u64),

    #[error("unsupported operation symbol: {0:?}")]
    UnsupportedOperation(String),

    /// The bounded wait for a result expired before delivery.
    #[error("timed out waiting for the result of task {0}")]
    TaskTimeout(u64),

    /// The delivery channel closed without a value (the pending entry was
    /// replaced or dropped before a worker responded).
    #[error("pending entry for task {0} was abandoned")]
    Abandoned(u64),
}
