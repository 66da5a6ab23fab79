//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::collector::{LanguageResult, Session, SessionStatus};

// ============================================
// TRENDS DTOs
// ============================================

/// Full trends response: session status plus everything collected so far
#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    /// Session status: loading, ready, or error
    pub status: SessionStatus,
    /// Session counter; bumps on refresh
    pub generation: u64,
    /// Chart-order month labels for the session's window
    pub months: Vec<String>,
    /// Configured languages, in display order
    pub languages: Vec<String>,
    /// Stored per-language results (may be partial while loading or errored)
    pub results: HashMap<String, LanguageResult>,
    /// User-facing failure message, present only on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TrendsResponse {
    pub fn from_session(session: &Session) -> Self {
        let message = match session.status {
            SessionStatus::Error => {
                Some("Unable to retrieve data from GitHub, please try again later.".to_string())
            }
            _ => None,
        };

        Self {
            status: session.status,
            generation: session.generation,
            months: session.window.display_months().to_vec(),
            languages: session.languages.clone(),
            results: session.results.clone(),
            message,
        }
    }
}

/// Query parameters for the chart endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    /// Language to show; defaults to the first configured language
    #[serde(default)]
    pub selected: Option<String>,
}

// ============================================
// REFRESH DTOs
// ============================================

/// Refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Status: "accepted"
    pub status: String,
    /// Generation of the session being replaced
    pub previous_generation: u64,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub session: SessionStatus,
    pub uptime_seconds: u64,
    pub version: String,
}
