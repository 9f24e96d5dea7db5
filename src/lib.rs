//! Distributed Arithmetic Cluster Library
//!
//! This library crate defines the core modules shared by the two binaries:
//! the `orchestrator` (RPC server holding the task queue and result registry)
//! and the `agent` (a pool of workers that pull tasks, compute them, and
//! submit results back).
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`dispatch`**: The orchestrator-side core. A FIFO task queue with
//!   non-blocking pop, and a result registry that correlates each incoming
//!   result with the blocked consumer awaiting it through a one-shot channel.
//! - **`agent`**: The worker-side core. Independent workers running an
//!   infinite poll -> compute -> submit loop with fixed-interval backoff,
//!   plus the pluggable computation strategies (local arithmetic or a
//!   delegated call to an external inference service).
//! - **`transport`**: The TLS boundary between the two processes. The
//!   orchestrator presents a certificate; agents validate it against a
//!   provisioned trust root over HTTPS/JSON.
//! - **`config`**: Environment-driven configuration for both processes.

pub mod agent;
pub mod config;
pub mod dispatch;
pub mod transport;
