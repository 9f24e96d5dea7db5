use anyhow::Result;
use calc_cluster::agent::worker::WorkerPool;
use calc_cluster::config::AgentConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AgentConfig::from_env();

    tracing::info!(
        "Starting agent against {} ({} standard workers + 1 delegated)",
        config.server_url,
        config.computing_power
    );
    if config.api_key.is_none() {
        tracing::warn!(
            "API_KEY is not set; the delegated worker will fail its tasks until one is configured"
        );
    }

    let mut pool = WorkerPool::new();
    pool.start(&config).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, stopping worker pool");
    pool.shutdown().await;

    Ok(())
}
