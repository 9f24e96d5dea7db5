use crate::dispatch::handlers::{handle_fetch_task, handle_submit_result};
use crate::dispatch::protocol::{ENDPOINT_FETCH_TASK, ENDPOINT_SUBMIT_RESULT};
use crate::dispatch::queue::TaskQueue;
use crate::dispatch::registry::ResultRegistry;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;

/// Assembles the RPC router: one route to pull tasks, one to push results.
///
/// Each incoming call runs on its own handler invocation; the queue and
/// registry carry their own synchronization, so no coordination happens at
/// this layer.
pub fn router(queue: Arc<TaskQueue>, registry: Arc<ResultRegistry>) -> Router {
    Router::new()
        .route(ENDPOINT_FETCH_TASK, get(handle_fetch_task))
        .route(ENDPOINT_SUBMIT_RESULT, post(handle_submit_result))
        .layer(Extension(queue))
        .layer(Extension(registry))
}

/// Serves the router over TLS until the handle signals shutdown.
///
/// Bind and serve failures are fatal: the process has nothing useful to do
/// without its listener.
pub async fn serve(
    addr: SocketAddr,
    tls: RustlsConfig,
    app: Router,
    handle: Handle,
) -> Result<()> {
    tracing::info!("RPC server listening on https://{}", addr);

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .with_context(|| format!("RPC server on {} failed", addr))
}
