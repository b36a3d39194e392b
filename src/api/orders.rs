//! Cart, billing, and order management endpoints

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::db::orders::{self, BillingInfo, CartSubmission};
use crate::error::ApiError;
use crate::state::AppState;

use super::{EnvelopeResult, envelope};

/// POST /v1/cart
///
/// Persists the cart and hands the (user_id, order_id) pair back to the
/// client, which must echo both in the following billing call. No
/// server-held correlation state exists between the two requests.
pub async fn submit_cart(
    State(state): State<AppState>,
    Json(cart): Json<CartSubmission>,
) -> EnvelopeResult {
    if cart.lines.is_empty() {
        return Err(ApiError::validation("cart is empty"));
    }

    let (user_id, order_id) = orders::submit_cart(&state.pool, &cart).await?;

    Ok(envelope(
        "response",
        serde_json::json!({ "user_id": user_id, "order_id": order_id }),
    ))
}

/// POST /v1/billing
pub async fn attach_billing(
    State(state): State<AppState>,
    Json(bill): Json<BillingInfo>,
) -> EnvelopeResult {
    if bill.order_id <= 0 {
        return Err(ApiError::validation("order_id is required"));
    }
    if bill.name.is_empty() || bill.address.is_empty() {
        return Err(ApiError::validation("name and address are required"));
    }

    match orders::attach_billing(&state.pool, &bill).await {
        Ok(()) => Ok(envelope("response", serde_json::json!({ "ok": true }))),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            Err(ApiError::validation("unknown order"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /v1/admin/orders
pub async fn list_orders(State(state): State<AppState>) -> EnvelopeResult {
    let list = orders::list(&state.pool).await?;
    Ok(envelope("orders", list))
}

#[derive(Deserialize)]
pub struct OrderStatusRequest {
    pub id: i32,
    pub status: String,
}

/// POST /v1/admin/orderstatus
pub async fn update_status(
    State(state): State<AppState>,
    Json(req): Json<OrderStatusRequest>,
) -> EnvelopeResult {
    if req.status.is_empty() {
        return Err(ApiError::validation("status is required"));
    }

    if !orders::update_status(&state.pool, req.id, &req.status).await? {
        return Err(ApiError::NotFound("order"));
    }

    Ok(envelope("response", serde_json::json!({ "ok": true })))
}
