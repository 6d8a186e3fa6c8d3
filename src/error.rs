use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// A form field that failed its bounds check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// Errors that cross into the HTTP layer
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Missing or unparseable field: {0}")]
    MissingField(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "error": err.message, "field": err.field})),
            )
                .into_response(),
            AppError::MissingField(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"status": "error", "error": detail})),
            )
                .into_response(),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": RATE_LIMIT_MESSAGE})),
            )
                .into_response(),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"status": "error", "error": "Unauthorized: invalid API key"})),
            )
                .into_response(),
        }
    }
}
