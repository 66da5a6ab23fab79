//! GitHub GraphQL Client
//!
//! Issues the batched per-language query against the GitHub v4 API and
//! extracts the aliased repository counts from the response.
//!
//! The transport is a trait so the collector can run against a mock in
//! tests; [`GitHubClient`] is the real implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::query::{QueryDocument, ALIASES};

/// Failures a fetch can produce. Only two kinds exist: the request itself
/// failed, or it succeeded with a body missing an expected aliased count.
/// The collector treats both identically.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Request rejected, network failure, or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived but an expected aliased field was absent or malformed.
    #[error("response shape error: {0}")]
    Shape(String),
}

/// Executes a batched query and returns the GraphQL `data` object.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, document: &QueryDocument) -> Result<Value, FetchError>;
}

/// Configuration for the GitHub client.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// GraphQL endpoint, `https://api.github.com/graphql` in production.
    pub endpoint: String,
    /// Personal access token for bearer authentication.
    pub token: String,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

/// Real transport talking to the GitHub GraphQL API.
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
}

impl GitHubClient {
    /// Create a client with the given configuration.
    pub fn new(config: GitHubConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("repotrends/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

#[async_trait]
impl GraphqlTransport for GitHubClient {
    async fn execute(&self, document: &QueryDocument) -> Result<Value, FetchError> {
        let query = document.to_graphql();

        tracing::debug!(language = document.language(), "posting batched query");

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.token)
            .json(&GraphqlRequest { query: &query })
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                return Err(FetchError::Transport("GitHub rejected the token (401)".into()))
            }
            StatusCode::FORBIDDEN => {
                return Err(FetchError::Transport(
                    "GitHub refused the request (403, possibly rate limited)".into(),
                ))
            }
            status if !status.is_success() => {
                return Err(FetchError::Transport(format!("GitHub API returned {status}")))
            }
            _ => {}
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        match body.data {
            Some(data) => Ok(data),
            None => {
                let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
                Err(FetchError::Shape(format!(
                    "no data in GraphQL response: {}",
                    messages.join("; ")
                )))
            }
        }
    }
}

/// Extract the twelve aliased counts from a `data` object, in alias order
/// (newest month first). A missing or non-integer `repositoryCount` under
/// any alias is a shape failure.
pub fn extract_counts(data: &Value) -> Result<Vec<u64>, FetchError> {
    ALIASES
        .iter()
        .map(|alias| {
            data.get(*alias)
                .and_then(|sub| sub.get("repositoryCount"))
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    FetchError::Shape(format!("missing repositoryCount for alias '{alias}'"))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aliased_data(counts: [u64; 12]) -> Value {
        let mut data = serde_json::Map::new();
        for (alias, count) in ALIASES.iter().zip(counts) {
            data.insert(alias.to_string(), json!({ "repositoryCount": count }));
        }
        Value::Object(data)
    }

    #[test]
    fn extracts_counts_in_alias_order() {
        let data = aliased_data([12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
        let counts = extract_counts(&data).unwrap();
        assert_eq!(counts, vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn missing_alias_is_a_shape_failure() {
        let mut data = aliased_data([0; 12]);
        data.as_object_mut().unwrap().remove("seven");

        let err = extract_counts(&data).unwrap_err();
        assert!(matches!(err, FetchError::Shape(_)));
        assert!(err.to_string().contains("seven"));
    }

    #[test]
    fn non_integer_count_is_a_shape_failure() {
        let mut data = aliased_data([0; 12]);
        data["three"]["repositoryCount"] = json!("many");

        let err = extract_counts(&data).unwrap_err();
        assert!(matches!(err, FetchError::Shape(_)));
    }
}
