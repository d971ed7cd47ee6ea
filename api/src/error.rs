//! Unified error types for the Roulette API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core game logic and storage errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - game rules and persistence
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("At least {required} participants required, {available} available")]
    InsufficientParticipants { required: usize, available: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    /// Lock timeout or a concurrent write won the version race
    #[error("Game is busy: {0}")]
    Retryable(String),
}

impl DomainError {
    /// Whether the caller may simply try the same request again
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Retryable(_) | DomainError::Storage(_))
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    retryable: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(e @ DomainError::InsufficientParticipants { .. }) => (
                StatusCode::BAD_REQUEST,
                "Insufficient participants",
                Some(format!("{}. Add more names before spinning.", e)),
            ),
            AppError::Domain(DomainError::Retryable(msg)) => {
                tracing::warn!("Retryable contention: {}", msg);
                (StatusCode::CONFLICT, "Game is busy", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Storage(msg)) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage unavailable",
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let retryable = matches!(&self, AppError::Domain(e) if e.is_retryable());

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
            retryable,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_participants_message() {
        let err = DomainError::InsufficientParticipants {
            required: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "At least 2 participants required, 1 available"
        );
    }

    #[test]
    fn only_contention_and_storage_are_retryable() {
        assert!(DomainError::Retryable("lock".into()).is_retryable());
        assert!(DomainError::Storage("down".into()).is_retryable());
        assert!(!DomainError::Validation("empty".into()).is_retryable());
        assert!(!DomainError::InsufficientParticipants {
            required: 2,
            available: 0
        }
        .is_retryable());
    }

    #[test]
    fn status_codes_per_error_kind() {
        let cases = [
            (
                AppError::Domain(DomainError::Validation("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Domain(DomainError::InsufficientParticipants {
                    required: 2,
                    available: 1,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Domain(DomainError::Retryable("x".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Domain(DomainError::Storage("x".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn error_body_omits_retryable_when_false() {
        let body = ErrorResponse {
            error: "Validation error".to_string(),
            details: Some("empty name".to_string()),
            retryable: false,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"error":"Validation error","details":"empty name"}"#
        );
    }
}
