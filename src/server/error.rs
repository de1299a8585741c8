//! Error envelope returned by every route: `{"error": {"code", "message", "details"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::GatewayError;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn bad_request(message: &str, details: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message, details)
    }

    pub fn unauthorized(message: &str, details: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message, details)
    }

    pub fn not_found(details: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found", details)
    }

    /// Failure of a proxied call; `message` names the operation.
    pub fn upstream(message: &str, err: GatewayError) -> Self {
        error!("{}: {}", message, err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR", message, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "details": self.details,
            }
        });
        (self.status, Json(body)).into_response()
    }
}
