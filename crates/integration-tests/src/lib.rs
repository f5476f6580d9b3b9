//! Integration test harness for Trendora.
//!
//! Builds the storefront and admin routers in-process over a shared
//! in-memory record store, so the full HTTP surface (routing, extractors,
//! error mapping, JSON bodies) is exercised without a running database or
//! network listener. Requests are driven through `tower::ServiceExt::oneshot`.
//!
//! ```bash
//! cargo test -p trendora-integration-tests
//! ```

use std::net::IpAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use trendora_commerce::models::{NewProduct, Product};
use trendora_commerce::store::{CommerceStore, MemoryStore};
use trendora_core::UserId;

/// Admin bearer token used by the in-process admin router.
pub const ADMIN_TOKEN: &str = "integration-admin-token-4f9d2c81a7b3";

const LOCALHOST: &str = "127.0.0.1";

/// Both routers plus the store they share.
pub struct TestStack {
    pub storefront: Router,
    pub admin: Router,
    pub store: Arc<dyn CommerceStore>,
}

/// Build a fresh stack over an empty in-memory store.
#[must_use]
pub fn stack() -> TestStack {
    let store: Arc<dyn CommerceStore> = Arc::new(MemoryStore::new());

    let host: IpAddr = LOCALHOST.parse().expect("localhost");

    let storefront_config = trendora_storefront::config::StorefrontConfig {
        database_url: SecretString::from("postgres://unused/in-memory"),
        host,
        port: 3000,
    };
    let storefront = trendora_storefront::router(trendora_storefront::AppState::new(
        storefront_config,
        Arc::clone(&store),
    ));

    let admin_config = trendora_admin::config::AdminConfig {
        database_url: SecretString::from("postgres://unused/in-memory"),
        host,
        port: 3001,
        api_token: SecretString::from(ADMIN_TOKEN),
    };
    let admin = trendora_admin::router(trendora_admin::AppState::new(
        admin_config,
        Arc::clone(&store),
    ));

    TestStack {
        storefront,
        admin,
        store,
    }
}

/// Seed a catalog product.
pub async fn seed_product(store: &Arc<dyn CommerceStore>, name: &str, price: i64) -> Product {
    store
        .insert_product(NewProduct {
            name: name.to_owned(),
            description: format!("{name} description"),
            price: Decimal::from(price),
            image: format!("/images/{}.jpg", name.to_lowercase().replace(' ', "-")),
            category: "Apparel".to_owned(),
            stock: 50,
            sizes: vec!["M".to_owned(), "L".to_owned()],
            colors: vec!["black".to_owned()],
        })
        .await
        .expect("seed product")
}

/// Record a session token for a user and return it.
pub async fn mint_session(store: &Arc<dyn CommerceStore>, user_id: i32) -> String {
    let token = format!("session-for-user-{user_id}");
    store
        .insert_session(&token, UserId::new(user_id))
        .await
        .expect("mint session");
    token
}

/// Build a request with an optional bearer token and optional JSON body.
#[must_use]
pub fn request(
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// Drive one request through a router and decode the JSON response.
///
/// Returns `Value::Null` for empty or non-JSON bodies (e.g., `/health`).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
