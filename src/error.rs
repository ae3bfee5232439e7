//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{FieldViolation, ResourceError};

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Body or path could not be decoded into the resource type
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, error_code: &str) -> Self {
        Self {
            error: error.into(),
            error_code: error_code.to_string(),
            details: None,
            violations: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                let mut body = ErrorResponse::new("Invalid request", "invalid_request");
                body.details = Some(msg);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Resource(ResourceError::Validation(violations)) => {
                let mut body = ErrorResponse::new("Validation failed", "validation_failed");
                body.violations = Some(violations);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Resource(err @ ResourceError::IdentityMismatch { .. }) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(err.to_string(), "identity_mismatch"),
            ),
            AppError::Resource(ResourceError::ConstraintViolation(msg)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg, "constraint_violation"),
            ),

            // 404 Not Found, no body
            AppError::Resource(ResourceError::NotFound { .. }) => {
                return StatusCode::NOT_FOUND.into_response();
            }

            // 500 Internal Server Error
            AppError::Resource(err @ ResourceError::ConcurrencyConflict { .. }) => {
                tracing::error!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(err.to_string(), "concurrency_conflict"),
                )
            }
            AppError::Resource(ResourceError::StoreUnavailable(e)) => {
                tracing::error!("Store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error", "internal_error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_not_found_is_404() {
        let response = AppError::from(ResourceError::not_found("shipper", 4)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_client_errors_are_400() {
        let errors = vec![
            AppError::InvalidRequest("expected value at line 1".to_string()),
            AppError::from(ResourceError::Validation(vec![FieldViolation::new(
                "product_name",
                "product_name is required",
            )])),
            AppError::from(ResourceError::IdentityMismatch {
                path: "1".to_string(),
                body: "2".to_string(),
            }),
            AppError::from(ResourceError::ConstraintViolation(
                "Cannot delete supplier with dependent products.".to_string(),
            )),
        ];

        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_server_errors_are_500() {
        let conflict = AppError::from(ResourceError::ConcurrencyConflict {
            kind: "product",
            id: "1".to_string(),
        });
        assert_eq!(
            conflict.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let unavailable = AppError::from(ResourceError::StoreUnavailable(StoreError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        assert_eq!(
            unavailable.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_failure_body_is_opaque() {
        let err = AppError::from(ResourceError::StoreUnavailable(StoreError::Database(
            sqlx::Error::PoolClosed,
        )));
        assert!(err.to_string().contains("Store unavailable"));
    }
}
