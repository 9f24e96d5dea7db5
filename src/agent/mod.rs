//! Agent Module
//!
//! The worker side of the system. An agent process runs a pool of
//! independent workers, each with its own connection to the orchestrator,
//! each executing an unbounded fetch -> compute -> submit loop.
//!
//! ## Architecture Overview
//! 1. **Polling**: A worker asks the orchestrator for a task. An empty queue
//!    (or any transport failure) answers with a fixed-interval backoff and
//!    another attempt — the loop is the unit of failure isolation and
//!    nothing propagates out of it.
//! 2. **Computing**: After sleeping out the task's simulated cost, the
//!    worker evaluates it through its computation strategy: local IEEE
//!    arithmetic, or a delegated call to an external inference service.
//! 3. **Submitting**: The result is delivered at most once. A transport
//!    failure discards the computed value; a closed task is acknowledged
//!    and forgotten.
//!
//! ## Submodules
//! - **`client`**: Per-worker HTTPS client for the two orchestrator RPCs.
//! - **`compute`**: The pluggable computation strategies.
//! - **`worker`**: The worker pool, loop, and backoff discipline.

pub mod client;
pub mod compute;
pub mod worker;
