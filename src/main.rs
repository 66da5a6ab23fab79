//! Repotrends Server
//!
//! Loads configuration, kicks off the collection session for the configured
//! languages, and serves the results over the REST API.

use repotrends::{api, collector::Collector, config::Config, github};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    init_tracing(&config.logging);

    tracing::info!("Repotrends v{}", env!("CARGO_PKG_VERSION"));

    if config.github.token.is_empty() {
        tracing::warn!("No GitHub token configured; set GITHUB_TOKEN or [github].token");
    }

    let client = github::GitHubClient::new(github::GitHubConfig {
        endpoint: config.github.endpoint.clone(),
        token: config.github.token.clone(),
        request_timeout_ms: config.github.request_timeout_ms,
    })?;

    let collector = Arc::new(Collector::new(
        config.trends.languages.clone(),
        Arc::new(client),
    ));

    // The fetches run in the background; the API answers immediately with
    // loading state until the session settles.
    let background = Arc::clone(&collector);
    tokio::spawn(async move { background.run().await });

    let state = api::AppState::new(collector, config.api.clone());
    api::serve(state, &config.api.addr()).await?;

    Ok(())
}

/// Initialize logging from config; RUST_LOG wins when set.
fn init_tracing(config: &repotrends::config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("repotrends={}", config.level)),
    );

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
