//! # Repository Module
//!
//! Repository implementations for database access. One repository per
//! aggregate: users, products, orders (orders own their items and
//! payments).

pub mod order;
pub mod product;
pub mod user;
