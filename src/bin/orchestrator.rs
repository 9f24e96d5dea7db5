use anyhow::Result;
use axum_server::Handle;
use calc_cluster::config::OrchestratorConfig;
use calc_cluster::dispatch::Dispatcher;
use calc_cluster::transport::{server, tls};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = OrchestratorConfig::from_args(&args)?;

    tracing::info!("Starting orchestrator on {}", config.bind_addr);

    // The dispatcher is the surface the expression decomposer drives:
    // submit a task, then await its handle. This binary owns the RPC side
    // of it — the queue workers poll and the registry results land in.
    let dispatcher = Dispatcher::new();
    let app = server::router(dispatcher.queue(), dispatcher.registry());

    // Missing TLS material is fatal here, at startup, and nowhere else.
    let tls = tls::server_tls_config(&config.cert, &config.key).await?;

    let handle = Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, shutting down");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(5)));
        }
    });

    server::serve(config.bind_addr, tls, app, handle).await
}
