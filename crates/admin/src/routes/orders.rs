//! Order management route handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use trendora_commerce::models::Order;
use trendora_core::{OrderId, OrderStatus};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Body for `PUT /orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// `GET /orders` - all orders across users, newest first.
pub async fn index(State(state): State<AppState>, _: RequireAdmin) -> Result<Json<Vec<Order>>> {
    let orders = state.orders().list_all().await?;
    Ok(Json(orders))
}

/// `GET /orders/{id}` - a single order regardless of owner.
pub async fn show(
    State(state): State<AppState>,
    _: RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.orders().get(id).await?;
    Ok(Json(order))
}

/// `PUT /orders/{id}/pay` - confirm payment. Idempotent: repeating the call
/// leaves the original payment timestamp untouched.
pub async fn pay(
    State(state): State<AppState>,
    _: RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.orders().mark_paid(id).await?;
    Ok(Json(order))
}

/// `PUT /orders/{id}/deliver` - confirm delivery, same idempotence policy
/// as payment.
pub async fn deliver(
    State(state): State<AppState>,
    _: RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.orders().mark_delivered(id).await?;
    Ok(Json(order))
}

/// `PUT /orders/{id}/status` - move the workflow status. Disallowed
/// transitions are rejected with 400.
pub async fn set_status(
    State(state): State<AppState>,
    _: RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<Order>> {
    let order = state.orders().set_status(id, body.status).await?;
    Ok(Json(order))
}
