//! API error handling.
//!
//! Every failure is rendered through the [`ApiErrorResponse`] envelope with a
//! stable error code.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response::ApiErrorResponse;
use crate::error::Error;

/// Caller is not authenticated or not a known member.
pub const CODE_UNAUTHENTICATED: &str = "AUTH_001";
/// Unhandled server-side failure.
pub const CODE_INTERNAL: &str = "COMMON_001";
/// Request failed validation.
pub const CODE_VALIDATION: &str = "COMMON_400";
/// Requested resource does not exist for this caller.
pub const CODE_NOT_FOUND: &str = "COMMON_404";

/// API error type that can be converted to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Create a 401 Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, CODE_UNAUTHENTICATED, message)
    }

    /// Create a 404 Not Found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, CODE_NOT_FOUND, message)
    }

    /// Create a 422 Unprocessable Entity error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, CODE_VALIDATION, message)
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, CODE_INTERNAL, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse::new(self.code, self.message);
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_unauthenticated() {
            return match err {
                Error::Unauthenticated(msg) => ApiError::unauthorized(msg),
                other => ApiError::unauthorized(other.to_string()),
            };
        }

        match err {
            Error::NotFound { entity_type, id } => {
                ApiError::not_found(format!("{} with id '{}' not found", entity_type, id))
            }
            Error::Validation(msg) => ApiError::validation(msg),
            Error::DatabaseSqlx(e) => {
                tracing::error!(error = %e, "Database error");
                ApiError::internal(format!("Database error: {}", e))
            }
            conflict @ Error::Conflict { .. } => {
                tracing::error!(error = %conflict, "Unrecovered uniqueness conflict");
                ApiError::internal(conflict.to_string())
            }
            other => {
                tracing::error!(error = %other, "Unexpected error");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
