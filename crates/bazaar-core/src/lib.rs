//! # bazaar-core: Pure Business Logic for Bazaar
//!
//! Domain types and business rules for the Bazaar storefront. This crate
//! performs no I/O: no database access, no network, no file system. The
//! database layer lives in `bazaar-db`, the HTTP surface in `apps/api`.
//!
//! ## Module Organization
//!
//! - [`money`] - Integer-cents monetary values
//! - [`types`] - Domain entities (User, Product, Order, OrderItem, Payment)
//! - [`card`] - Card detail validation and last4/brand derivation
//! - [`validation`] - Input validation for registration and order creation
//! - [`error`] - Validation error types

pub mod card;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use card::CardDetails;
pub use error::ValidationError;
pub use money::Money;
pub use types::{
    NewOrderItem, Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentOutcome,
    PaymentStatus, Product, Role, User,
};

/// Maximum quantity allowed for a single order line.
pub const MAX_ITEM_QUANTITY: i64 = 1_000;

/// Maximum number of lines in a single order.
pub const MAX_ORDER_LINES: usize = 100;
