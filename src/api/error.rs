//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::engine::EngineError;

/// Structured error response body for browser clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Session is already submitted")]
    SessionSubmitted,
    #[error("Analysis superseded by a newer request")]
    Superseded,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::SessionSubmitted => (
                StatusCode::CONFLICT,
                "SESSION_SUBMITTED",
                "Session is already submitted".to_string(),
            ),
            ApiError::Superseded => (
                StatusCode::CONFLICT,
                "SUPERSEDED",
                "Analysis superseded by a newer request".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::AlreadySubmitted => ApiError::SessionSubmitted,
            EngineError::UnknownItem(id) => ApiError::BadRequest(format!("unknown item id '{id}'")),
            EngineError::LayoutMismatch(layout) => {
                ApiError::BadRequest(format!("operation not available for {layout} layout"))
            }
        }
    }
}
