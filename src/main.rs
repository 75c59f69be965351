use std::sync::Arc;

use anyhow::Context;
use gram_sahayak_proxy::{build_app, run_server, AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "starting GramSahayak proxy");

    let (host, port) = (config.host.clone(), config.port);
    let state = AppState::new(config).context("failed to build HTTP client")?;
    let app = build_app(Arc::new(state));

    run_server(app, &host, port).await.context("server failed")
}
