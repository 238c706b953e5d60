//! Curriculum lookup endpoints

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::curriculum::{DailyTopic, MonthlyCurriculum};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct TopicResponse {
    pub success: bool,
    pub topic: DailyTopic,
}

#[derive(Debug, Serialize)]
pub struct CurriculumResponse {
    pub success: bool,
    pub curriculum: MonthlyCurriculum,
}

/// GET /api/curriculum/day/:day
pub async fn get_day(
    State(state): State<AppState>,
    day: Result<Path<u32>, PathRejection>,
) -> ApiResult<Json<TopicResponse>> {
    let Path(day) = day.map_err(|_| ApiError::BadRequest("Invalid day of year".to_string()))?;
    let topic = state.curriculum.load_daily_topic(day).await?;
    Ok(Json(TopicResponse {
        success: true,
        topic,
    }))
}

/// GET /api/curriculum/month/:month
pub async fn get_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<Json<CurriculumResponse>> {
    let curriculum = state.curriculum.curriculum_for_month(&month).await?;
    Ok(Json(CurriculumResponse {
        success: true,
        curriculum: curriculum.as_ref().clone(),
    }))
}

pub fn curriculum_routes() -> Router<AppState> {
    Router::new()
        .route("/api/curriculum/day/:day", get(get_day))
        .route("/api/curriculum/month/:month", get(get_month))
}
