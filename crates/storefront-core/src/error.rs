//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  storefront-core errors (this file)                                 │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  storefront-db errors (separate crate)                              │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  API errors (apps/api)                                              │
//! │  └── ApiError         - What the HTTP client sees (status + JSON)   │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, ID, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// The API layer translates them to HTTP status codes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist in the database
    /// - Product was deleted while an order referenced it by id
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order cannot be found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Insufficient stock to fulfill an order line.
    ///
    /// ## When This Occurs
    /// - Requested quantity exceeds the product's current stock
    ///
    /// ## Example Message
    /// `Not enough stock for product: Widget. Available: 3`
    #[error("Not enough stock for product: {name}. Available: {available}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Order status value is not one of Pending, Shipped, Delivered.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate product name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            name: "Widget".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Not enough stock for product: Widget. Available: 3"
        );
    }

    #[test]
    fn test_product_not_found_names_the_id() {
        let err = CoreError::ProductNotFound("abc-123".to_string());
        assert_eq!(err.to_string(), "Product not found: abc-123");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
