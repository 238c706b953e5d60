//! Daily lesson endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

use super::lessons::GeneratedLessonResponse;
use crate::daily::{self, DailyParams};
use crate::{ApiError, ApiResult, AppState};

/// GET /api/daily-lesson?day=&age=&tone=&language=
pub async fn get_daily_lesson(
    State(state): State<AppState>,
    params: Result<Query<DailyParams>, QueryRejection>,
) -> ApiResult<Json<GeneratedLessonResponse>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = params.resolve(daily::today())?;

    let lesson = daily::daily_lesson(&state.generator, &state.curriculum, &request).await?;

    Ok(Json(GeneratedLessonResponse {
        success: true,
        lesson: lesson.as_ref().clone(),
    }))
}

pub fn daily_routes() -> Router<AppState> {
    Router::new().route("/api/daily-lesson", get(get_daily_lesson))
}
