//! Registration, login and current-user endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use bazaar_core::{validation, Role, User};
use bazaar_db::NewUser;

use crate::auth::{self, AuthUser};
use crate::error::ApiError;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

/// Registration request body.
///
/// Fields default to empty so a missing field reaches the validators and
/// comes back as a 400 envelope rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token plus the user it was issued for.
#[derive(Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// `POST /api/auth/register`
///
/// Creates a customer account and returns a fresh token. Self-service
/// registration never grants the admin role.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthPayload> {
    validation::validate_name(&req.name)?;
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;

    let email = req.email.trim().to_lowercase();

    // Friendly pre-check; the UNIQUE index backstops the race.
    if state.db.users().find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let user = state
        .db
        .users()
        .insert(NewUser {
            name: req.name.trim().to_string(),
            email,
            password_hash: auth::hash_password(&req.password)?,
            role: Role::Customer,
        })
        .await?;

    info!(user_id = %user.id, "User registered");

    let token = state.jwt.issue(&user)?;
    Ok(ApiResponse::ok(AuthPayload { token, user }))
}

/// `POST /api/auth/login`
///
/// Bad email and bad password answer identically: no account enumeration.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthPayload> {
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;

    let email = req.email.trim().to_lowercase();

    let user = state
        .db
        .users()
        .find_by_email(&email)
        .await?
        .filter(|user| auth::verify_password(&req.password, &user.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    info!(user_id = %user.id, "User logged in");

    let token = state.jwt.issue(&user)?;
    Ok(ApiResponse::ok(AuthPayload { token, user }))
}

/// `GET /api/auth/me`
///
/// Re-reads the store, so the response reflects current data even when
/// the token claims are stale.
pub async fn me(State(state): State<Arc<AppState>>, AuthUser(claims): AuthUser) -> ApiResult<User> {
    let user = state
        .db
        .users()
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(user))
}
