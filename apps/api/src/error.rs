//! API error types with HTTP response mapping.
//!
//! ## Taxonomy
//! ```text
//! InvalidInput     400  malformed or missing request fields
//! Conflict         400  duplicate email (wire contract of the storefront)
//! Unauthorized     401  missing token / bad credentials
//! PaymentRequired  402  simulated gateway decline
//! Forbidden        403  invalid or expired token, missing admin role
//! NotFound         404  missing user/product/order (or not owned)
//! AlreadyPaid      409  settlement attempted on a paid order
//! StockConflict    409  stock guard miss during settlement
//! Internal         500  unexpected store failure (details logged, not leaked)
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use bazaar_core::ValidationError;
use bazaar_db::DbError;

use crate::response::ApiResponse;

/// API-level error type that renders into the response envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PaymentRequired(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    AlreadyPaid(String),

    #[error("{0}")]
    StockConflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyPaid(_) | ApiError::StockConflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                // Never leak store internals to the client.
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, axum::Json(ApiResponse::error(message))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => {
                ApiError::Conflict("User with this email already exists".to_string())
            }
            DbError::ForeignKeyViolation { .. } => {
                ApiError::InvalidInput("Unknown product in order items".to_string())
            }
            DbError::InsufficientStock { .. } => ApiError::StockConflict(err.to_string()),
            DbError::AlreadyPaid { .. } => {
                ApiError::AlreadyPaid("Order is already paid".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PaymentRequired("x".into()).status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ApiError::StockConflict("x".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_db_error_translation() {
        let err: ApiError = DbError::InsufficientStock {
            product_id: "p1".to_string(),
            requested: 3,
        }
        .into();
        assert!(matches!(err, ApiError::StockConflict(_)));

        let err: ApiError = DbError::AlreadyPaid {
            order_id: "o1".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::AlreadyPaid(_)));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = DbError::not_found("Order", "o1").into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
