//! # Bazaar API Server
//!
//! REST API for the Bazaar storefront: registration and login, a public
//! product catalog, authenticated order placement, and simulated payment
//! processing.
//!
//! ## Architecture
//! ```text
//! HTTP client
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                  apps/api (THIS CRATE)               │
//! │                                                      │
//! │  routes/        auth.rs         payment.rs           │
//! │  handlers       JWT + argon2    gateway trait        │
//! │                                                      │
//! │  error.rs → envelope: {success, data?, error?}       │
//! └──────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! bazaar-db (repositories over SQLite)
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod payment;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use bazaar_core::Role;
use bazaar_db::{Database, NewUser};

use crate::auth::JwtManager;
use crate::error::ApiError;
use crate::payment::PaymentGateway;

/// Shared application state, one per server.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub gateway: Arc<dyn PaymentGateway>,
}

/// Builds the full application router.
pub fn create_app(state: Arc<AppState>) -> Router {
    // CORS is wide open: the storefront frontend is served from a
    // different origin in development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/products", get(routes::products::list))
        .route("/api/products/{id}", get(routes::products::get_by_id))
        .route("/api/orders/create", post(routes::orders::create))
        .route("/api/orders/my-orders", get(routes::orders::my_orders))
        .route("/api/orders/{id}", get(routes::orders::get_by_id))
        .route("/api/payments/process", post(routes::payments::process))
        .route("/api/admin/orders", get(routes::orders::list_all))
        .route("/api/reset-db", post(routes::dev::reset_db))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Seeds sample accounts and the catalog on an empty database.
///
/// Both sample accounts use the password `password123`.
pub async fn seed_sample_data(db: &Database) -> Result<(), ApiError> {
    if db.users().count().await? == 0 {
        db.users()
            .insert(NewUser {
                name: "Admin User".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: auth::hash_password("password123")?,
                role: Role::Admin,
            })
            .await?;

        db.users()
            .insert(NewUser {
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                password_hash: auth::hash_password("password123")?,
                role: Role::Customer,
            })
            .await?;

        info!("Seeded sample accounts");
    }

    bazaar_db::seed::seed_products(db.pool()).await?;

    Ok(())
}
