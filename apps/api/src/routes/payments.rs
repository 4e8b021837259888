//! Payment processing endpoint.
//!
//! ## Settlement Flow
//! ```text
//! verify order ownership (404 otherwise)
//!      │
//!      ▼
//! already paid? → 409, gateway never charged
//!      │
//!      ▼
//! card? → validate card details (400 otherwise)
//!      │
//!      ▼
//! gateway.charge(total)
//!      ├── Approved → record_success: paid/processing, stock -= qty,
//!      │   payment row  (guard miss → 409, nothing changes)
//!      └── Declined → record_failure: payment row, 402
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bazaar_core::{CardDetails, PaymentMethod, PaymentStatus};
use bazaar_db::SuccessfulPayment;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::payment::GatewayOutcome;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    #[serde(default)]
    pub order_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub card_details: Option<CardDetails>,
}

#[derive(Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub message: &'static str,
    pub order_id: String,
}

/// `POST /api/payments/process`
///
/// Attempts are not idempotent: every call charges the gateway again and
/// appends a payment row. A failed attempt leaves the order retryable.
pub async fn process(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<ProcessPaymentRequest>,
) -> ApiResult<PaymentReceipt> {
    // Ownership first: a foreign order id is indistinguishable from a
    // missing one.
    let order = state
        .db
        .orders()
        .find_for_user(&req.order_id, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    // A paid order never reaches the gateway again; the repository fence
    // backstops this check against concurrent attempts.
    if order.payment_status == PaymentStatus::Paid {
        return Err(ApiError::AlreadyPaid("Order is already paid".to_string()));
    }

    let method = req.payment_method.unwrap_or(PaymentMethod::Card);

    let card = match (method, req.card_details) {
        (PaymentMethod::Card, card) => {
            let card = card
                .filter(|c| c.validate().is_ok())
                .ok_or_else(|| ApiError::InvalidInput("Invalid card details".to_string()))?;
            Some(card)
        }
        (_, _) => None,
    };

    match state.gateway.charge(order.total_amount_cents) {
        GatewayOutcome::Approved { transaction_id } => {
            state
                .db
                .orders()
                .record_success(
                    &order.id,
                    SuccessfulPayment {
                        method,
                        amount_cents: order.total_amount_cents,
                        transaction_id: transaction_id.clone(),
                        card_last4: card.as_ref().map(|c| c.last4()),
                        card_brand: card.as_ref().map(|c| c.brand().to_string()),
                    },
                )
                .await?;

            info!(order_id = %order.id, %transaction_id, "Payment settled");

            Ok(ApiResponse::ok(PaymentReceipt {
                transaction_id,
                message: "Payment successful! Your order is being processed.",
                order_id: order.id,
            }))
        }
        GatewayOutcome::Declined => {
            state.db.orders().record_failure(&order.id, method).await?;

            warn!(order_id = %order.id, "Payment declined by gateway");

            Err(ApiError::PaymentRequired(
                "Payment failed. Please try again or use a different payment method.".to_string(),
            ))
        }
    }
}
