//! # Error Types
//!
//! Validation errors for bazaar-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError (this crate)
//!      │  input fails a business rule
//!      ▼
//! DbError (bazaar-db)      - database operation failures
//!      │
//!      ▼
//! ApiError (apps/api)      - HTTP status + response envelope
//! ```
//!
//! Errors are enum variants carrying context, never bare strings.

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any business logic or database access runs. Each variant
/// maps to a 400-class response in the API layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// A field has an invalid format.
    #[error("{field} is invalid: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// An order line quantity is out of range.
    #[error("quantity {requested} is out of range (must be 1..={max})")]
    InvalidQuantity { requested: i64, max: i64 },

    /// A line item carries a negative price snapshot.
    #[error("item price must not be negative")]
    NegativePrice,

    /// A line total or order total cannot be represented in cents.
    #[error("item price is too large")]
    PriceOverflow,

    /// An order was submitted without any items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// An order was submitted with too many lines.
    #[error("order cannot have more than {max} lines")]
    TooManyLines { max: usize },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;
