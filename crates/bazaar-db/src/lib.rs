//! # bazaar-db: Database Layer for Bazaar
//!
//! SQLite persistence for the Bazaar storefront, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! API handler (apps/api)
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                bazaar-db (THIS CRATE)                │
//! │                                                      │
//! │  Database (pool.rs)   Repositories     Migrations    │
//! │  SqlitePool, WAL      user / product   embedded SQL  │
//! │  connection mgmt      / order          (migrations/) │
//! └──────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! SQLite database file (or :memory: in tests)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./bazaar.db")).await?;
//! let products = db.products().list().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::{
    AdminOrderSummary, NewOrder, OrderItemDetail, OrderRepository, OrderSummary, SuccessfulPayment,
};
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::user::{NewUser, UserRepository};
