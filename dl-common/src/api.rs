//! Shared API response types
//!
//! Every DailyLesson HTTP service answers with a JSON object carrying a
//! `success` flag. Failures look like:
//!
//! ```json
//! { "success": false, "error": "Lesson 'x' not found", "code": "NOT_FOUND" }
//! ```

use serde::{Deserialize, Serialize};

use crate::Error;

/// Failure body shared by all services
///
/// # Examples
///
/// ```
/// use dl_common::api::ErrorResponse;
///
/// let body = ErrorResponse::new("BAD_REQUEST", "Missing required fields");
/// assert!(!body.success);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }
}

impl Error {
    /// HTTP status code used when this error reaches a request handler boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::InsufficientCredits { .. } => 402,
            Error::NotFound(_) => 404,
            Error::Upstream { .. } => 502,
            Error::Timeout(_) => 504,
            Error::Io(_) | Error::Json(_) | Error::Config(_) | Error::Internal(_) => 500,
        }
    }

    /// Machine-readable code for the response envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "BAD_REQUEST",
            Error::InsufficientCredits { .. } => "INSUFFICIENT_CREDITS",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Upstream { .. } => "UPSTREAM_ERROR",
            Error::Timeout(_) => "TIMEOUT",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message shown to API callers
    ///
    /// Validation and lookup errors carry their bare message; the rest keep
    /// the category prefix from `Display`.
    pub fn public_message(&self) -> String {
        match self {
            Error::InvalidInput(msg) | Error::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Convert into the shared failure body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::upstream("Heygen API", "x").status_code(), 502);
        assert_eq!(Error::Timeout("x".into()).status_code(), 504);
        assert_eq!(
            Error::InsufficientCredits { available: 0, requested: 1 }.status_code(),
            402
        );
        assert_eq!(Error::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_response_serializes_envelope() {
        let body = Error::NotFound("Lesson 'nope' not found".into()).to_response();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Lesson 'nope' not found");
        assert_eq!(json["code"], "NOT_FOUND");
    }
}
