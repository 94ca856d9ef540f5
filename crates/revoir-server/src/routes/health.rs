//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cards: usize,
    pub version: String,
}

/// Health check endpoint.
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let cards = state.store.count_cards().map_err(ApiError::from)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        cards,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
