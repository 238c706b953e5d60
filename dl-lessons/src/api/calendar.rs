//! Calendar and topic search endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::curriculum::{CalendarEntry, DailyTopic};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub success: bool,
    pub year: i32,
    pub days: Vec<CalendarEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub results: Vec<DailyTopic>,
}

/// GET /api/calendar?year=
pub async fn get_calendar(
    State(state): State<AppState>,
    params: Result<Query<CalendarParams>, QueryRejection>,
) -> ApiResult<Json<CalendarResponse>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let year = params.year.unwrap_or_else(|| Utc::now().year());
    if !(1..=9999).contains(&year) {
        return Err(ApiError::BadRequest(format!("Invalid year: {}", year)));
    }

    let days = state.curriculum.calendar(year).await?;
    Ok(Json(CalendarResponse {
        success: true,
        year,
        days,
    }))
}

/// GET /api/search?q=
pub async fn search_topics(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let results = state.curriculum.search(&params.q).await?;
    Ok(Json(SearchResponse {
        success: true,
        query: params.q.trim().to_string(),
        count: results.len(),
        results,
    }))
}

pub fn calendar_routes() -> Router<AppState> {
    Router::new()
        .route("/api/calendar", get(get_calendar))
        .route("/api/search", get(search_topics))
}
