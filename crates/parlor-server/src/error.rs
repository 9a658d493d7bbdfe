//! Turn error → HTTP response mapping.
//!
//! User-facing conditions (validation, not-found) keep their messages;
//! internal details are sanitized out of 5xx bodies and logged instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use parlor_engine::TurnError;

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// API error wrapper implementing [`IntoResponse`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// A 400 with a caller-facing message.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Status code this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::EmptyMessage => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Message is required".into(),
            },
            TurnError::InvalidEmail => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Valid email is required".into(),
            },
            TurnError::SessionNotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: "Session not found".into(),
            },
            TurnError::Completion(e) => {
                error!(error = %e, "completion upstream failure");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    message: "AI service is unavailable".into(),
                }
            }
            TurnError::Store(e) => {
                // Internal detail (paths, SQL) stays in the logs
                error!(error = %e, "storage failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal error".into(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
