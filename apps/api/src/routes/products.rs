//! Public product catalog endpoints. No authentication required.

use std::sync::Arc;

use axum::extract::{Path, State};

use bazaar_core::Product;

use crate::error::ApiError;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

/// `GET /api/products`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Product>> {
    let products = state.db.products().list().await?;
    Ok(ApiResponse::ok(products))
}

/// `GET /api/products/{id}`
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(ApiResponse::ok(product))
}
