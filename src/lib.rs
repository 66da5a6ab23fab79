//! # Repotrends
//!
//! Monthly GitHub repository-creation trends by language. Queries the GitHub
//! GraphQL API with one batched twelve-month query per configured language,
//! aggregates the counts, and serves them chart-ready over a REST API.
//!
//! ## Modules
//!
//! - [`window`]: Trailing twelve-month window generation
//! - [`query`]: Batched aliased GraphQL query builder
//! - [`github`]: GraphQL transport and count extraction
//! - [`collector`]: Per-language fetch orchestration and session state
//! - [`chart`]: Line-chart view model with language toggles
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use repotrends::{Collector, GitHubClient, GitHubConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubClient::new(GitHubConfig {
//!         endpoint: "https://api.github.com/graphql".into(),
//!         token: std::env::var("GITHUB_TOKEN")?,
//!         request_timeout_ms: 10_000,
//!     })?;
//!
//!     let languages = vec!["python".into(), "javascript".into()];
//!     let collector = Collector::new(languages, Arc::new(client));
//!     collector.run().await;
//!
//!     let session = collector.session();
//!     let session = session.read().await;
//!     println!("session status: {:?}", session.status);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod collector;
pub mod config;
pub mod github;
pub mod query;
pub mod window;

// Re-export top-level types for convenience
pub use chart::{ChartView, LineDataset, ToggleButton};

pub use collector::{Collector, LanguageResult, Session, SessionStatus};

pub use config::{
    generate_default_config, ApiConfig, Config, ConfigError, GithubConfig as ConfigGithubConfig,
    LoggingConfig, TrendsConfig,
};

pub use github::{extract_counts, FetchError, GitHubClient, GitHubConfig, GraphqlTransport};

pub use query::{QueryDocument, SubQuery, ALIASES};

pub use window::{MonthWindow, WINDOW_MONTHS};

pub use api::{build_router, serve, ApiError, ApiResult, AppState};
