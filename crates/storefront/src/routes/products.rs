//! Catalog route handlers.

use axum::Json;
use axum::extract::{Path, State};

use trendora_commerce::models::Product;
use trendora_core::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/products` - the full catalog.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.store().list_products().await.map_err(|e| {
        tracing::error!(error = %e, "catalog listing failed");
        AppError::Internal(e.to_string())
    })?;
    Ok(Json(products))
}

/// `GET /api/products/{id}` - a single product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state
        .store()
        .find_product(id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;
    Ok(Json(product))
}
