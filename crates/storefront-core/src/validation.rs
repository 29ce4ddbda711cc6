//! # Validation Module
//!
//! Input validation for the storefront backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: HTTP deserialization (serde)                              │
//! │  └── Type validation (numbers are numbers, etc.)                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE — explicit business rule validation           │
//! │  └── Runs BEFORE any mutation; returns a typed failure              │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / UNIQUE constraints                                  │
//! │  └── CHECK (price_cents >= 0, status/role value sets)               │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Widget").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product description.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 2000 characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > 2000 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 2000,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain exactly one `@` with text on both sides
/// - Must be at most 254 characters
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like user@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - Must be at least 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a low-stock threshold.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_low_stock_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::OutOfRange {
            field: "lowStockThreshold".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates an order's requested item list before any store access.
///
/// ## Rules
/// - The list must be non-empty
/// - Every quantity must pass [`validate_quantity`]
///
/// ## Usage
/// Called first by the order placement workflow, so an empty request fails
/// before any product lookup or stock mutation happens.
pub fn validate_order_items<'a, I>(quantities: I) -> ValidationResult<()>
where
    I: IntoIterator<Item = &'a i64>,
{
    let mut any = false;
    for qty in quantities {
        any = true;
        validate_quantity(*qty)?;
    }

    if !any {
        return Err(ValidationError::Required {
            field: "orderItems".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("A useful widget").is_ok());
        assert!(validate_description("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter2!").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(100).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_order_items_rejects_empty() {
        let empty: Vec<i64> = vec![];
        assert!(validate_order_items(&empty).is_err());
        assert!(validate_order_items(&[2, 1]).is_ok());
        assert!(validate_order_items(&[2, 0]).is_err());
    }
}
