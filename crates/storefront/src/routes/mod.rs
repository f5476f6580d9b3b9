//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Liveness check
//! GET    /health/ready                - Readiness check (store reachable)
//!
//! # Products (public)
//! GET    /api/products                - Product listing
//! GET    /api/products/{id}           - Product detail
//!
//! # Cart (requires bearer session token)
//! GET    /api/cart                    - Current cart (created lazily)
//! POST   /api/cart/add                - Add a product (merges on product ID)
//! PUT    /api/cart/update/{item_id}   - Set a line's quantity
//! DELETE /api/cart/remove/{item_id}   - Remove a line
//! DELETE /api/cart/clear              - Empty the cart
//! GET    /api/cart/quote              - Subtotal/shipping/total quote
//!
//! # Orders (requires bearer session token)
//! POST   /api/orders                  - Checkout: create order, clear cart
//! GET    /api/orders/myorders         - Caller's order history
//! GET    /api/orders/{id}             - A single owned order
//! ```

pub mod cart;
pub mod orders;
pub mod products;

use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Router, extract::State};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update/{item_id}", put(cart::update))
        .route("/remove/{item_id}", delete(cart::remove))
        .route("/clear", delete(cart::clear))
        .route("/quote", get(cart::quote))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/myorders", get(orders::my_orders))
        .route("/{id}", get(orders::show))
}

/// Build the full storefront router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
        // The span declares request_id empty; the middleware inside fills
        // it in once the header is resolved.
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the record store is reachable before returning OK.
/// Returns 503 Service Unavailable otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
