//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The GitHub token is the one piece of required external configuration; it
//! is read from `GITHUB_TOKEN` (or `REPOTRENDS_GITHUB_TOKEN`) when not set
//! in the config file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub trends: TrendsConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub GraphQL API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Personal access token. Usually left empty here and supplied via
    /// the GITHUB_TOKEN environment variable.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_endpoint() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Trend collection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrendsConfig {
    /// Languages to track, in display order. The first one is the chart's
    /// default selection.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

fn default_languages() -> Vec<String> {
    ["python", "javascript", "java", "cpp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8083
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("repotrends").join("config.toml")),
            Some(PathBuf::from("/etc/repotrends/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // GitHub overrides
        if let Ok(endpoint) = std::env::var("REPOTRENDS_GITHUB_ENDPOINT") {
            self.github.endpoint = endpoint;
        }
        if let Ok(token) = std::env::var("REPOTRENDS_GITHUB_TOKEN") {
            self.github.token = token;
        } else if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            self.github.token = token;
        }

        // Trends overrides
        if let Ok(languages) = std::env::var("REPOTRENDS_LANGUAGES") {
            let parsed: Vec<String> = languages
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.trends.languages = parsed;
            }
        }

        // API overrides
        if let Ok(host) = std::env::var("REPOTRENDS_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("REPOTRENDS_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("REPOTRENDS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("REPOTRENDS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Repotrends Configuration
#
# Environment variables override these settings:
# - GITHUB_TOKEN (or REPOTRENDS_GITHUB_TOKEN)
# - REPOTRENDS_GITHUB_ENDPOINT
# - REPOTRENDS_LANGUAGES (comma-separated)
# - REPOTRENDS_API_HOST
# - REPOTRENDS_API_PORT
# - REPOTRENDS_LOG_LEVEL
# - REPOTRENDS_LOG_FORMAT

[github]
# GraphQL endpoint
endpoint = "https://api.github.com/graphql"

# Personal access token; prefer the GITHUB_TOKEN environment variable
token = ""

# Request timeout (ms)
request_timeout_ms = 10000

[trends]
# Languages to track; the first is the chart's default selection
languages = ["python", "javascript", "java", "cpp"]

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8083

# Allowed CORS origins (empty = permissive)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_four_languages() {
        let config = Config::default();
        assert_eq!(
            config.trends.languages,
            vec!["python", "javascript", "java", "cpp"]
        );
        assert_eq!(config.github.endpoint, "https://api.github.com/graphql");
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [trends]
            languages = ["rust", "go"]

            [api]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.trends.languages, vec!["rust", "go"]);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn generated_default_config_round_trips() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8083);
        assert_eq!(config.trends.languages.len(), 4);
    }
}
