//! Order route handlers: checkout and order history.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use trendora_commerce::models::{Order, OrderItem, ShippingAddress};
use trendora_core::{OrderId, ShippingMethod};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Body for `POST /api/orders`.
///
/// The client submits the items and the computed total it displayed at
/// checkout; the server validates shape, not arithmetic.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub shipping_method: ShippingMethod,
    pub total_amount: Decimal,
}

/// `POST /api/orders` - create an order from checkout data, then clear the
/// user's cart.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .orders()
        .create(
            user_id,
            body.items,
            body.shipping_address,
            body.shipping_method,
            body.total_amount,
        )
        .await?;

    // The order snapshot is already persisted; a failure clearing the cart
    // must not undo the checkout.
    if let Err(e) = state.carts().clear(user_id).await {
        tracing::warn!(error = %e, %user_id, "cart not cleared after checkout");
    }

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders/myorders` - the caller's order history, newest first.
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders().list_for_user(user_id).await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}` - a single order. Orders owned by other users are
/// indistinguishable from missing ones.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.orders().get_for_user(user_id, id).await?;
    Ok(Json(order))
}
