//! HTTP route handlers, grouped by resource.

pub mod auth;
pub mod dev;
pub mod health;
pub mod orders;
pub mod payments;
pub mod products;
