//! Repotrends CLI
//!
//! Command-line interface for a running Repotrends server:
//! - Check server health
//! - Show collected trends
//! - Trigger a refresh
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repotrends")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Monthly GitHub repository-creation trends by language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8083", global = true)]
    pub api_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server health and session status
    Status,

    /// Show collected trends
    Trends {
        /// Limit output to one language
        language: Option<String>,
    },

    /// Show the chart view model
    Chart {
        /// Language to select (default: first configured)
        #[arg(short, long)]
        selected: Option<String>,
    },

    /// Start a fresh collection session
    Refresh,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            print_json(client.get(format!("{}/health", cli.api_url))).await?;
        }

        Commands::Trends { language } => {
            let url = match language {
                Some(language) => format!("{}/api/v1/trends/{}", cli.api_url, language),
                None => format!("{}/api/v1/trends", cli.api_url),
            };
            print_json(client.get(url)).await?;
        }

        Commands::Chart { selected } => {
            let mut request = client.get(format!("{}/api/v1/chart", cli.api_url));
            if let Some(selected) = selected {
                request = request.query(&[("selected", selected)]);
            }
            print_json(request).await?;
        }

        Commands::Refresh => {
            print_json(client.post(format!("{}/api/v1/refresh", cli.api_url))).await?;
        }

        Commands::Config { output } => {
            let content = repotrends::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing config to {path:?}"))?;
                    println!("Wrote default config to {path:?}");
                }
                None => print!("{content}"),
            }
        }
    }

    Ok(())
}

/// Send a request and pretty-print the JSON response.
async fn print_json(request: reqwest::RequestBuilder) -> anyhow::Result<()> {
    let response = request.send().await.context("request failed")?;
    let status = response.status();
    let body: serde_json::Value = response.json().await.context("invalid JSON response")?;

    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() && status != reqwest::StatusCode::SERVICE_UNAVAILABLE {
        bail!("server returned {status}");
    }
    Ok(())
}
