//! Error types for pretalab-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// A failed request, rendered as `{ "message": ..., "error"?: ... }`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// `detail` is only present when the server is configured to expose it
    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, detail: impl ToString, expose: bool) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: expose.then(|| detail.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The user-facing message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message }
            | ApiError::NotFound { message }
            | ApiError::Unauthorized { message }
            | ApiError::Internal { message, .. } => message,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match &self {
            ApiError::Internal { detail, .. } => detail.as_deref(),
            _ => None,
        };
        let body = ErrorBody {
            message: self.message(),
            error,
        };
        (self.status(), Json(body)).into_response()
    }
}
