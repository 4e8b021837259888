//! # Validation Module
//!
//! Input validation for registration and order creation.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: API handler (deserialization, type validation)
//!      │
//!      ▼
//! Layer 2: THIS MODULE - business rule validation
//!      │
//!      ▼
//! Layer 3: Database - NOT NULL / UNIQUE / CHECK / FK constraints
//! ```
//!
//! Defense in depth: the database constraints backstop anything a race
//! slips past this layer (notably the unique email check).

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::NewOrderItem;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// Validates a display name: non-empty, at most 255 characters.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    if name.len() > 255 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 255,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Deliberately shallow: non-empty, bounded length, has exactly one `@`
/// with something on each side. Real verification happens when mail is
/// actually sent; this only catches obvious typos.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }
    if email.len() > 255 {
        return Err(ValidationError::TooLong {
            field: "email",
            max: 255,
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must be a valid email address",
        }),
    }
}

/// Validates a password: non-empty, bounded length.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }
    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password",
            max: 128,
        });
    }

    Ok(())
}

/// Validates a single order line quantity.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 || quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::InvalidQuantity {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the item list of a new order and returns the computed total.
///
/// The returned total is what the line snapshots actually add up to. The
/// API layer records the client-supplied total regardless (documented
/// trust gap) but can compare against this value to log discrepancies.
pub fn validate_order_items(items: &[NewOrderItem]) -> ValidationResult<Money> {
    if items.is_empty() {
        return Err(ValidationError::EmptyOrder);
    }
    if items.len() > MAX_ORDER_LINES {
        return Err(ValidationError::TooManyLines {
            max: MAX_ORDER_LINES,
        });
    }

    let mut total = Money::zero();
    for item in items {
        validate_quantity(item.quantity)?;
        if item.price_cents < 0 {
            return Err(ValidationError::NegativePrice);
        }

        // Quantity and price are each in range, but their product (or the
        // running sum) can still exceed i64.
        let line = item.line_total().ok_or(ValidationError::PriceOverflow)?;
        total = total
            .checked_add(line)
            .ok_or(ValidationError::PriceOverflow)?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, price_cents: i64) -> NewOrderItem {
        NewOrderItem {
            product_id: "p1".to_string(),
            quantity,
            price_cents,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("John Doe").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"x".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("pw123456").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_order_items_total() {
        let total = validate_order_items(&[item(2, 1000), item(1, 500)]).unwrap();
        assert_eq!(total.cents(), 2500);
    }

    #[test]
    fn test_validate_order_items_rejects_empty() {
        assert_eq!(validate_order_items(&[]), Err(ValidationError::EmptyOrder));
    }

    #[test]
    fn test_validate_order_items_rejects_bad_lines() {
        assert!(validate_order_items(&[item(0, 1000)]).is_err());
        assert!(validate_order_items(&[item(1, -5)]).is_err());
    }

    #[test]
    fn test_validate_order_items_rejects_overflowing_totals() {
        // A single line whose product overflows.
        assert_eq!(
            validate_order_items(&[item(2, i64::MAX)]),
            Err(ValidationError::PriceOverflow)
        );

        // Lines that are individually fine but whose sum overflows.
        assert_eq!(
            validate_order_items(&[item(1, i64::MAX), item(1, 1)]),
            Err(ValidationError::PriceOverflow)
        );
    }
}
