//! Error types for dl-tts

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dl_common::api::ErrorResponse;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (400)
    #[error("{0}")]
    BadRequest(String),

    /// dl-common error, mapped by its own category
    #[error(transparent)]
    Common(#[from] dl_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", msg),
            ),
            ApiError::Common(ref err) => (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.to_response(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %body.error, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
