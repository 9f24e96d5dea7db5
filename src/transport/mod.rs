//! Transport Module
//!
//! The TLS boundary between the orchestrator and its agents. The
//! orchestrator presents a certificate; every agent connection validates it
//! against the provisioned trust root (and the server name in the URL)
//! before any RPC flows.
//!
//! TLS *material* comes from outside — a config/credential provider drops
//! PEM files on disk. Missing or unreadable material is a fatal startup
//! condition, never a per-request one.
//!
//! ## Submodules
//! - **`tls`**: Loading server certificate/key pairs and client trust roots.
//! - **`server`**: Router assembly and the TLS-terminating serve loop.

pub mod server;
pub mod tls;
