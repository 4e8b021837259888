//! Order endpoints: checkout, listings and the admin overview.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bazaar_core::{validation, NewOrderItem, Order};
use bazaar_db::{AdminOrderSummary, NewOrder, OrderItemDetail, OrderSummary};

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

/// Checkout request body.
///
/// Contact fields default to the token claims when omitted; the item
/// list must be present and non-empty.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
    #[serde(default)]
    pub total_amount_cents: i64,
    #[serde(default)]
    pub shipping_address: Option<String>,
}

#[derive(Serialize)]
pub struct OrderCreated {
    pub order_id: String,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// `POST /api/orders/create`
///
/// Creates a pending order. Stock is not reserved here; it only moves
/// when a payment settles.
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<OrderCreated> {
    let computed_total = validation::validate_order_items(&req.items)?;
    if req.total_amount_cents < 0 {
        return Err(ApiError::InvalidInput("total_amount_cents must not be negative".to_string()));
    }

    // The client-supplied total is recorded as-is. A mismatch against the
    // line snapshots is worth an operator's attention, not a rejection.
    if computed_total.cents() != req.total_amount_cents {
        warn!(
            user_id = %claims.sub,
            supplied = req.total_amount_cents,
            computed = computed_total.cents(),
            "Order total does not match line items"
        );
    }

    let order = state
        .db
        .orders()
        .create(NewOrder {
            user_id: claims.sub.clone(),
            customer_name: req.customer_name.unwrap_or_else(|| claims.name.clone()),
            customer_email: req.customer_email.unwrap_or_else(|| claims.email.clone()),
            total_amount_cents: req.total_amount_cents,
            shipping_address: req.shipping_address,
            items: req.items,
        })
        .await?;

    info!(order_id = %order.id, user_id = %claims.sub, "Order created");

    Ok(ApiResponse::ok(OrderCreated {
        order_id: order.id,
        message: "Order created successfully! Please proceed to payment.",
    }))
}

/// `GET /api/orders/my-orders`
pub async fn my_orders(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<OrderSummary>> {
    let orders = state.db.orders().list_for_user(&claims.sub).await?;
    Ok(ApiResponse::ok(orders))
}

/// `GET /api/orders/{id}`
///
/// Someone else's order id answers 404, same as a missing one.
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<OrderDetail> {
    let order = state
        .db
        .orders()
        .find_for_user(&id, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    let items = state.db.orders().items_with_products(&order.id).await?;

    Ok(ApiResponse::ok(OrderDetail { order, items }))
}

/// `GET /api/admin/orders`
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
) -> ApiResult<Vec<AdminOrderSummary>> {
    let orders = state.db.orders().list_all().await?;
    Ok(ApiResponse::ok(orders))
}
