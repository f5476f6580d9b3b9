//! Cart route handlers.
//!
//! All cart routes operate on the authenticated user's single cart. The
//! cart is created lazily on first read or add; update/remove/clear require
//! it to already exist. Quantity bounds are enforced here at the API edge,
//! the aggregate itself applies whatever it is given.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use trendora_commerce::models::Cart;
use trendora_commerce::pricing::{self, CartTotals};
use trendora_core::{CartItemId, ProductId, ShippingMethod};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Body for `POST /api/cart/add`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Body for `PUT /api/cart/update/{item_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// Query for `GET /api/cart/quote`.
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    #[serde(default)]
    pub shipping_method: ShippingMethod,
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// `GET /api/cart` - the user's cart, created empty when absent.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Cart>> {
    let cart = state.carts().get_or_create(user_id).await?;
    Ok(Json(cart))
}

/// `POST /api/cart/add` - add a product, merging with an existing line for
/// the same product.
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    validate_quantity(body.quantity)?;
    let cart = state
        .carts()
        .add_item(user_id, body.product_id, body.quantity, body.size, body.color)
        .await?;
    Ok(Json(cart))
}

/// `PUT /api/cart/update/{item_id}` - set a line's quantity to an absolute
/// value.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Cart>> {
    validate_quantity(body.quantity)?;
    let cart = state
        .carts()
        .update_item_quantity(user_id, item_id, body.quantity)
        .await?;
    Ok(Json(cart))
}

/// `DELETE /api/cart/remove/{item_id}` - remove a line. Removing an absent
/// line succeeds with the cart unchanged.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<Cart>> {
    let cart = state.carts().remove_item(user_id, item_id).await?;
    Ok(Json(cart))
}

/// `DELETE /api/cart/clear` - empty the cart in place.
pub async fn clear(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Cart>> {
    let cart = state.carts().clear(user_id).await?;
    Ok(Json(cart))
}

/// `GET /api/cart/quote` - subtotal, shipping, and grand total for the
/// current cart and a shipping method (default: standard).
pub async fn quote(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<CartTotals>> {
    let cart = state.carts().get_or_create(user_id).await?;
    Ok(Json(pricing::quote(&cart.items, query.shipping_method)))
}
