//! HTTP handlers for dl-tts

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::service::{SynthesisRequest, TtsStatus};
use crate::voice::{voice_profiles, VoiceProfile};
use crate::{ApiError, ApiResult, AppState};

const DEFAULT_REFERENCE_VOICE: &str = "kelly";

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub success: bool,
    pub audio_url: String,
    pub duration: f64,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<TtsStatus> {
    Json(state.service.status().await)
}

/// GET /voices
pub async fn voices() -> Json<BTreeMap<&'static str, VoiceProfile>> {
    Json(voice_profiles())
}

/// POST /synthesize
pub async fn synthesize(
    State(state): State<AppState>,
    body: Result<Json<SynthesisRequest>, JsonRejection>,
) -> ApiResult<Json<SynthesizeResponse>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let result = state.service.synthesize(&request).await?;

    Ok(Json(SynthesizeResponse {
        success: true,
        audio_url: result.audio_url,
        duration: result.duration,
        cached: result.cached,
    }))
}

/// POST /upload-reference-voice
///
/// Multipart form: `file` (audio bytes), optional `voice` (default `kelly`).
pub async fn upload_reference_voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut audio: Option<Vec<u8>> = None;
    let mut voice = DEFAULT_REFERENCE_VOICE.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                audio = Some(bytes.to_vec());
            }
            Some("voice") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if !text.trim().is_empty() {
                    voice = text;
                }
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let audio = audio.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    let url = state.service.upload_reference_voice(audio, &voice).await?;

    Ok(Json(UploadResponse {
        success: true,
        message: "Reference voice uploaded successfully".to_string(),
        url,
    }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "dl-tts".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: now
            .signed_duration_since(state.startup_time)
            .num_seconds()
            .max(0) as u64,
        timestamp: now,
    })
}

/// Unknown paths
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

pub fn tts_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/voices", get(voices))
        .route("/synthesize", post(synthesize))
        .route("/upload-reference-voice", post(upload_reference_voice))
        .route("/health", get(health_check))
}
