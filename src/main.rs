//! Shipwright - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the login and agent API.

use shipwright::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipwright=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, workspace={}",
        config.default_model,
        config.workspace_path.display()
    );

    // Start HTTP server
    api::serve(config).await?;

    Ok(())
}
