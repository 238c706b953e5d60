//! Cache maintenance endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tracing::info;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub success: bool,
    pub cleared_lessons: usize,
    pub cleared_months: usize,
}

/// POST /api/cache/clear
///
/// Drops every generated lesson and every loaded curriculum month.
pub async fn clear_caches(State(state): State<AppState>) -> Json<CacheClearResponse> {
    let cleared_lessons = state.generator.cache().clear().await;
    let cleared_months = state.curriculum.clear_cache().await;
    info!(cleared_lessons, cleared_months, "Caches cleared");

    Json(CacheClearResponse {
        success: true,
        cleared_lessons,
        cleared_months,
    })
}

pub fn cache_routes() -> Router<AppState> {
    Router::new().route("/api/cache/clear", post(clear_caches))
}
