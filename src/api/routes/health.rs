//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (all languages collected)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::collector::SessionStatus;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Returns 200 only once the current session has results for every
/// configured language.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    let session = state.session.read().await;
    match session.status {
        SessionStatus::Ready => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with session details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let session = state.session.read().await;

    let overall_status = match session.status {
        SessionStatus::Ready => "healthy",
        SessionStatus::Loading => "starting",
        SessionStatus::Error => "unhealthy",
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        session: session.status,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
