//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//! Every handler is stateless apart from the server's default configs.

use super::{
    AppState,
    types::{
        AnalyzeResponse, DetectResponse, GenerateRequest, GenerateResponse, HealthResponse,
        SeriesRequest,
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use urgency_core::{UrgencyDetector, UrgencyError, WeekRow, analyze, generate, rows};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CONFIG HANDLER
// =============================================================================

/// The server's default detector config.
pub async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.config))
}

// =============================================================================
// DETECT HANDLER
// =============================================================================

fn detect_rows(
    request: &SeriesRequest,
    state: &AppState,
) -> Result<Vec<WeekRow>, UrgencyError> {
    let config = request.resolve(state.config)?;
    let flags = UrgencyDetector::new(config)?.detect(&request.weeks)?;
    rows(&request.weeks, &flags)
}

/// Flag urgent weeks.
pub async fn detect_handler(
    State(state): State<AppState>,
    Json(request): Json<SeriesRequest>,
) -> impl IntoResponse {
    match detect_rows(&request, &state) {
        Ok(rows) => {
            let response = DetectResponse::success(rows);
            tracing::debug!(
                weeks = request.weeks.len(),
                urgent = response.urgent_weeks,
                "Detection served"
            );
            (StatusCode::OK, Json(response))
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(DetectResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// ANALYZE HANDLER
// =============================================================================

/// Run detection and the full report.
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<SeriesRequest>,
) -> impl IntoResponse {
    let result = request
        .resolve(state.config)
        .and_then(|config| analyze(&request.weeks, &config));

    match result {
        Ok(report) => (StatusCode::OK, Json(AnalyzeResponse::success(report))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AnalyzeResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// GENERATE HANDLER
// =============================================================================

/// Generate a synthetic weekly series.
pub async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> impl IntoResponse {
    let config = request.to_config(&state.synthetic);

    match generate(&config) {
        Ok(weeks) => {
            let series = weeks.into_iter().map(|w| w.record).collect();
            (
                StatusCode::OK,
                Json(GenerateResponse::success(config.seed, series)),
            )
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(GenerateResponse::error(config.seed, e.to_string())),
        ),
    }
}
