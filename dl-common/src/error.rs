//! Common error types for DailyLesson

use thiserror::Error;

/// Common result type for DailyLesson operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across DailyLesson services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An external service (video, speech, storage) answered with an error
    #[error("{service} error: {message}")]
    Upstream { service: String, message: String },

    /// A bounded wait ran out
    #[error("{0}")]
    Timeout(String),

    /// Credit balance too small for the requested debit
    #[error("Insufficient credits: balance {available}, requested {requested}")]
    InsufficientCredits { available: i64, requested: i64 },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for [`Error::Upstream`]
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Timeout(format!("HTTP request timed out: {}", err));
        }
        let service = err
            .url()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "HTTP".to_string());
        Error::Upstream {
            service,
            message: err.to_string(),
        }
    }
}
