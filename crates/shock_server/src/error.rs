//! Request-level errors and their JSON rendering.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shock_core::types::ShockError;
use thiserror::Error;

/// Errors a handler can return; each maps to one HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty or malformed request input.
    #[error("{0}")]
    InvalidInput(String),

    /// The simulation window contains no trading days.
    #[error("{0}")]
    EmptySeries(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::EmptySeries(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shorthand for a missing required field.
    pub fn missing(field: &str) -> Self {
        ApiError::InvalidInput(format!("No {} provided", field))
    }
}

/// Error envelope: `{"status": "error", "message": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always "error"
    pub status: &'static str,
    /// Human-readable cause
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ShockError> for ApiError {
    fn from(err: ShockError) -> Self {
        match err {
            ShockError::InvalidInput(_)
            | ShockError::InvalidSeverity(_)
            | ShockError::InvalidDate { .. }
            | ShockError::DateParse(_) => ApiError::InvalidInput(err.to_string()),
            ShockError::InvalidSeries(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}
