//! Lesson listing and generation endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use dl_common::GeneratedLesson;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::lesson::{LessonDna, LessonRequest, LessonSummary};
use crate::{ApiError, ApiResult, AppState};

const DEFAULT_LANGUAGE: &str = "english";

#[derive(Debug, Serialize)]
pub struct LessonListResponse {
    pub success: bool,
    pub lessons: Vec<LessonSummary>,
}

#[derive(Debug, Serialize)]
pub struct LessonDnaResponse {
    pub success: bool,
    pub lesson: LessonDna,
}

#[derive(Debug, Serialize)]
pub struct GeneratedLessonResponse {
    pub success: bool,
    pub lesson: GeneratedLesson,
}

/// POST /api/generate body
///
/// Field names follow the web client (`lessonId`, `forceRegenerate`);
/// snake_case spellings are accepted too.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(rename = "lessonId", alias = "lesson_id")]
    pub lesson_id: Option<String>,
    pub age: Option<i64>,
    pub tone: Option<String>,
    pub language: Option<String>,
    #[serde(rename = "forceRegenerate", alias = "force_regenerate", default)]
    pub force_regenerate: bool,
}

/// GET /api/lessons
pub async fn list_lessons(State(state): State<AppState>) -> Json<LessonListResponse> {
    Json(LessonListResponse {
        success: true,
        lessons: state.generator.library().summaries(),
    })
}

/// GET /api/lessons/:id
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> ApiResult<Json<LessonDnaResponse>> {
    let dna = state
        .generator
        .library()
        .get(&lesson_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Lesson '{}' not found", lesson_id)))?;

    Ok(Json(LessonDnaResponse {
        success: true,
        lesson: dna,
    }))
}

/// POST /api/generate
pub async fn generate_lesson(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> ApiResult<Json<GeneratedLessonResponse>> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (lesson_id, age, tone) = match (body.lesson_id, body.age, body.tone) {
        (Some(id), Some(age), Some(tone)) if !id.trim().is_empty() => (id, age, tone),
        _ => {
            return Err(ApiError::BadRequest(
                "Missing required fields: lessonId, age, tone".to_string(),
            ))
        }
    };
    let language = body
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    info!(lesson_id = %lesson_id, age, tone = %tone, language = %language, "Generate request");

    let request = LessonRequest::new(lesson_id, age, tone, language)
        .force_regenerate(body.force_regenerate);
    let lesson = state.generator.generate(&request).await?;

    Ok(Json(GeneratedLessonResponse {
        success: true,
        lesson: lesson.as_ref().clone(),
    }))
}

pub fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route("/api/lessons", get(list_lessons))
        .route("/api/lessons/:id", get(get_lesson))
        .route("/api/generate", post(generate_lesson))
}
