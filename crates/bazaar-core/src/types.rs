//! # Domain Types
//!
//! Core domain types used throughout Bazaar.
//!
//! ## Entity Relationships
//! ```text
//! User 1──* Order 1──* OrderItem *──1 Product
//!              │
//!              └────1──* Payment (append-only attempt log)
//! ```
//!
//! Every entity uses a UUIDv4 string as its primary key; money fields are
//! integer cents. Enums are stored as lowercase text in SQLite, which the
//! optional `sqlx` feature wires up via `sqlx::Type` derives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// Authorization role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

/// A registered account.
///
/// The password hash never leaves the server: it is skipped during
/// serialization so the struct can double as the profile payload for
/// `/api/auth/me`.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login email, unique across the store.
    pub email: String,

    /// Argon2 password hash. Never serialized.
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password_hash: String,

    pub role: Role,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry available for purchase.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalog.
    pub name: String,

    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    pub image_url: Option<String>,

    pub category: Option<String>,

    /// Available inventory. Decremented only on confirmed payment.
    pub stock: i64,

    /// Average rating in tenths (45 = 4.5 stars). Integer to avoid
    /// floating point in the database.
    pub rating_tenths: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting successful payment.
    Pending,
    /// Paid, being prepared for shipment.
    Processing,
    Shipped,
    Delivered,
}

/// Payment state of an order.
///
/// `created(pending/pending) → payment attempted → {paid | failed}`.
/// A failed attempt leaves the order retryable; a later attempt may still
/// transition it to `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// How the customer chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Paypal,
    Cash,
}

/// A customer's purchase intent, pending payment confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,

    /// Owning user. Nullable: set to NULL when the account is deleted so
    /// the order history survives.
    pub user_id: Option<String>,

    /// Shipping contact snapshot, supplied at checkout.
    pub customer_name: String,
    pub customer_email: String,

    /// Order total in cents, as submitted by the client.
    pub total_amount_cents: i64,

    pub shipping_address: Option<String>,

    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One product line within an order.
///
/// ## Snapshot Pattern
/// The price is copied from the request at order time. Catalog price
/// changes after checkout never affect an existing order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price snapshot in cents.
    pub price_cents: i64,
}

/// Input for a single order line at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i64,
    /// Client-supplied unit price snapshot in cents.
    pub price_cents: i64,
}

impl NewOrderItem {
    /// Line total (quantity x unit price), `None` when it cannot be
    /// represented in cents. Both values are client-supplied, so the
    /// product can exceed `i64` even though each factor is in range.
    pub fn line_total(&self) -> Option<Money> {
        Money::from_cents(self.price_cents).checked_mul(self.quantity)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Outcome of a single payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

/// Record of one payment attempt against an order.
///
/// Append-only: retries insert new rows, nothing is ever updated. An order
/// can therefore carry several failed rows and at most one succeeded row
/// under normal operation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub payment_method: PaymentMethod,
    /// Charged amount in cents; 0 for failed attempts.
    pub amount_cents: i64,
    pub status: PaymentOutcome,
    /// Gateway transaction reference, present on success.
    pub transaction_id: Option<String>,
    pub card_last4: Option<String>,
    pub card_brand: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_default() {
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_line_total() {
        let item = NewOrderItem {
            product_id: "p1".to_string(),
            quantity: 3,
            price_cents: 1099,
        };
        assert_eq!(item.line_total().unwrap().cents(), 3297);
    }

    #[test]
    fn test_line_total_overflow_is_none() {
        let item = NewOrderItem {
            product_id: "p1".to_string(),
            quantity: 2,
            price_cents: i64::MAX,
        };
        assert!(item.line_total().is_none());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"paid\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"card\"").unwrap(),
            PaymentMethod::Card
        );
    }
}
