//! API error types and their HTTP mapping.
//!
//! Every handler returns `ApiResult<T>`. Errors bubbling up from the
//! domain and database layers are converted into `ApiError` variants,
//! which in turn render as the standard JSON error envelope:
//!
//! ```json
//! { "success": false, "message": "Product not found: abc123" }
//! ```
//!
//! | Variant         | Status |
//! |-----------------|--------|
//! | InvalidInput    | 400    |
//! | Conflict        | 400    |
//! | Unauthenticated | 401    |
//! | Forbidden       | 403    |
//! | NotFound        | 404    |
//! | Internal        | 500    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use storefront_core::{CoreError, ValidationError};
use storefront_db::DbError;

use crate::response::ApiResponse;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    /// Request failed validation (missing field, bad value, stock shortfall).
    #[error("{0}")]
    InvalidInput(String),

    /// Request conflicts with existing state (duplicate email, duplicate name).
    #[error("{0}")]
    Conflict(String),

    /// No valid credential was presented.
    #[error("{0}")]
    Unauthenticated(String),

    /// Credential is valid but the caller's role does not permit the action.
    #[error("{0}")]
    Forbidden(String),

    /// The referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected server-side failure.
    #[error("Server error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) | CoreError::OrderNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::InsufficientStock { .. } | CoreError::InvalidStatus(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            CoreError::Validation(inner) => ApiError::InvalidInput(inner.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            other => {
                tracing::error!(error = %other, "Database error");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

// =============================================================================
// HTTP Response
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body: ApiResponse<()> = ApiResponse::error(self.to_string());
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::ProductNotFound("p1".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Product not found: p1");

        let err: ApiError = CoreError::InsufficientStock {
            name: "Widget".to_string(),
            available: 2,
            requested: 5,
        }
        .into();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(err.to_string().contains("Not enough stock"));
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::NotFound {
            entity: "Order".to_string(),
            id: "o1".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = DbError::UniqueViolation {
            field: "users.email".to_string(),
            value: "ada@example.com".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
