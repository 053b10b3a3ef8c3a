//! Uniform response envelope.

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome marker carried by every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Error details for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable error code for programmatic handling, e.g. `AUTH_001`
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Wrapper for every API response.
///
/// Exactly one of `data` and `error` is populated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            error: None,
        }
    }
}

/// Body of every failed request: the envelope with `data` always null.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub status: ResponseStatus,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub error: ErrorBody,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// HTTP 200 success body.
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// HTTP 201 success body.
pub fn created<T>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "SUCCESS", "data": 42, "error": null})
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let json = serde_json::to_value(ApiErrorResponse::new("AUTH_001", "nope")).unwrap();
        assert_eq!(json["status"], "ERROR");
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "AUTH_001");
        assert_eq!(json["error"]["message"], "nope");
    }
}
