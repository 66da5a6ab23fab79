//! Trends Routes
//!
//! The inbound contract of the service: per-language results, the chart
//! view model, and the refresh trigger.
//!
//! - GET /api/v1/trends - Session status and all stored results
//! - GET /api/v1/trends/:language - One language's result
//! - GET /api/v1/chart - Chart view model (gated on readiness)
//! - POST /api/v1/refresh - Start a fresh collection session

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ChartParams, RefreshResponse, TrendsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::chart::ChartView;
use crate::collector::{LanguageResult, SessionStatus};

/// GET /api/v1/trends
///
/// Always answers, whatever the session state; partial results are included
/// while loading or after an error.
pub async fn get_trends(State(state): State<Arc<AppState>>) -> Json<TrendsResponse> {
    let session = state.session.read().await;
    Json(TrendsResponse::from_session(&session))
}

/// GET /api/v1/trends/:language
pub async fn get_language(
    State(state): State<Arc<AppState>>,
    Path(language): Path<String>,
) -> ApiResult<Json<LanguageResult>> {
    let session = state.session.read().await;
    session
        .results
        .get(&language)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no results for language '{language}'")))
}

/// GET /api/v1/chart
///
/// The chart view assumes every configured language has a result, so this
/// is gated on session readiness: 503 while loading or errored.
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartParams>,
) -> ApiResult<Json<ChartView>> {
    let session = state.session.read().await;

    match session.status {
        SessionStatus::Loading => {
            return Err(ApiError::Unavailable("still collecting data".into()))
        }
        SessionStatus::Error => {
            return Err(ApiError::Unavailable(
                "Unable to retrieve data from GitHub, please try again later.".into(),
            ))
        }
        SessionStatus::Ready => {}
    }

    let mut view = ChartView::build(&session.results, &session.languages);
    if let Some(selected) = &params.selected {
        if !view.select(selected) {
            return Err(ApiError::NotFound(format!("unknown language '{selected}'")));
        }
    }

    Ok(Json(view))
}

/// POST /api/v1/refresh
///
/// Starts a fresh session (new month window, new fetches) in the background
/// and returns immediately. The server-side equivalent of a page reload.
pub async fn refresh(State(state): State<Arc<AppState>>) -> (StatusCode, Json<RefreshResponse>) {
    let previous_generation = state.session.read().await.generation;

    let collector = Arc::clone(&state.collector);
    tokio::spawn(async move { collector.refresh().await });

    (
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            status: "accepted".to_string(),
            previous_generation,
        }),
    )
}
