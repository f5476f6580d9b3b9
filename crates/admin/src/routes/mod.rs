//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (store reachable)
//!
//! # Orders (all require the admin bearer token)
//! GET  /orders              - All orders across users, newest first
//! GET  /orders/{id}         - A single order
//! PUT  /orders/{id}/pay     - Confirm payment (idempotent)
//! PUT  /orders/{id}/deliver - Confirm delivery (idempotent)
//! PUT  /orders/{id}/status  - Workflow status transition
//! ```

pub mod orders;

use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Router, extract::State};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/pay", put(orders::pay))
        .route("/{id}/deliver", put(orders::deliver))
        .route("/{id}/status", put(orders::set_status))
}

/// Build the full admin router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/orders", order_routes())
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
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
