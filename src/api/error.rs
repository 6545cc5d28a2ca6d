//! Shared error handling for API endpoints.
//!
//! This is the only place errors turn into HTTP responses: a status code and
//! a JSON body of the form `{"error": "<message>"}`.

use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::AuthError;

/// API error type with automatic response conversion.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unauthorized(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg) | ApiError::Unauthorized(msg) | ApiError::Internal(msg) => msg,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let message = e.to_string();
        if e.status_code().is_server_error() {
            ApiError::Internal(message)
        } else {
            ApiError::Unauthorized(message)
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::Unauthorized(msg) | ApiError::Internal(msg) => msg,
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "No route");
    ApiError::not_found("Page not found.")
}
