//! Error handling for the Marquee HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Wire format for all HTTP errors: a bare message object.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Application error types that map to HTTP responses.
///
/// Every error is handled at the handler boundary and surfaced to the
/// client as a status code plus a `{"message": ...}` body; no error is
/// fatal to the process.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("invalid rating: {message}")]
    InvalidRating { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("empty collection: {message}")]
    EmptyCollection { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create an invalid request error (missing or malformed input).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an invalid rating error (rating outside the allowed range).
    pub fn invalid_rating(message: impl Into<String>) -> Self {
        Self::InvalidRating {
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an empty collection error (listing with nothing stored).
    pub fn empty_collection(message: impl Into<String>) -> Self {
        Self::EmptyCollection {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, error_code, message) = match self {
            ApiError::InvalidRequest { message } => {
                (StatusCode::BAD_REQUEST, "invalid_request", message)
            }
            ApiError::InvalidRating { message } => {
                (StatusCode::BAD_REQUEST, "invalid_rating", message)
            }
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::EmptyCollection { message } => {
                (StatusCode::NOT_FOUND, "empty_collection", message)
            }
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                e.to_string(),
            ),
        };

        tracing::error!(
            error_id = %error_id,
            error_code = error_code,
            status_code = %status.as_u16(),
            "request error"
        );

        // Hide internal error details outside debug builds.
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
