//! API error handling
//!
//! Author: hephaex@gmail.com

use atlas_core::AtlasError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    #[schema(example = "SERVICE_UNAVAILABLE")]
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn validation(details: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", "Request body failed validation").with_details(details)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new("SERVICE_UNAVAILABLE", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Body did not match the endpoint schema
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Carries the client-facing message only, never the cause
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a failure the endpoint does not declare, logging it with full detail.
    ///
    /// The client only sees `generic_message`.
    pub fn from_service(err: AtlasError, generic_message: &str) -> Self {
        tracing::error!(error = ?err, "Unexpected service failure");
        AppError::Internal(generic_message.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::validation(details),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::not_found(msg)),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::service_unavailable(msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error(msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        AppError::Validation(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
