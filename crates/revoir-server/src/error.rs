//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from revoir-core errors
impl From<revoir_core::RevoirError> for ApiError {
    fn from(err: revoir_core::RevoirError) -> Self {
        use revoir_core::RevoirError;

        match err {
            RevoirError::Validation { message, .. } => ApiError::validation(message),
            RevoirError::NotFound { message, .. } => ApiError::not_found(message),
            RevoirError::Conflict { message, .. } => ApiError::conflict(message),
            RevoirError::Database { message, .. } => {
                ApiError::internal(format!("Database error: {}", message))
            }
            RevoirError::Configuration(msg) => ApiError::bad_request(msg),
            RevoirError::Io(e) => ApiError::internal(format!("IO error: {}", e)),
            RevoirError::Serialization(e) => {
                ApiError::internal(format!("Serialization error: {}", e))
            }
            RevoirError::Internal(msg) => ApiError::internal(msg),
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use revoir_core::RevoirError;

    #[test]
    fn test_invalid_quality_maps_to_422() {
        let err = ApiError::from(RevoirError::invalid_quality(9));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(RevoirError::card_not_found("some-id"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_review_conflict_maps_to_409() {
        let err = ApiError::from(RevoirError::review_conflict("some-id"));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "CONFLICT");
    }

    #[test]
    fn test_database_maps_to_500() {
        let err = ApiError::from(RevoirError::database("disk gone"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
