//! Error handling for the Reckon API
//!
//! Calculator failures keep the plain-text body the service has always
//! returned; extraction failures are rendered as a small JSON document with a
//! stable `code`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use reckon_calculator::CalculatorError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use utoipa::ToSchema;

/// API error type with automatic HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    /// The calculator rejected the operands (400 Bad Request)
    #[error(transparent)]
    Calculation(#[from] CalculatorError),

    /// Query, path or body could not be bound (400 Bad Request)
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },
}

impl ApiError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Calculation(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code string for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Calculation(err) => err.error_code(),
            ApiError::Validation { .. } => "VALIDATION_ERROR",
        }
    }

    /// Convert to ApiErrorResponse format for JSON serialization
    pub fn to_response(&self) -> ApiErrorResponse {
        let field = match self {
            ApiError::Validation { field, .. } => field.clone(),
            _ => None,
        };
        ApiErrorResponse { code: self.error_code().to_string(), message: self.to_string(), field }
    }

    /// Create a validation error for a specific field
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }
}

/// JSON-serializable error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "Validation error: Failed to deserialize query string")]
    pub message: String,

    /// Offending input, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Calculation(CalculatorError::DivisionByZero) => {
                warn!(error = %self, "Rejected calculation");
                (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], self.to_string())
                    .into_response()
            }
            _ => {
                warn!(error = %self, code = self.error_code(), "Rejected request");
                (status, Json(self.to_response())).into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation_field("body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation_field("query", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation_field("path", rejection.body_text())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculator_errors_are_client_errors() {
        let err = ApiError::from(CalculatorError::DivisionByZero);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "DIVISION_BY_ZERO");
        assert_eq!(err.to_string(), "Cannot divide by zero.");
    }

    #[test]
    fn division_by_zero_renders_as_plain_text() {
        let response = ApiError::from(CalculatorError::DivisionByZero).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }

    #[test]
    fn validation_errors_carry_field() {
        let body = ApiError::validation_field("operation", "unknown").to_response();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.field.as_deref(), Some("operation"));
        assert_eq!(body.message, "Validation error: unknown");
    }
}
