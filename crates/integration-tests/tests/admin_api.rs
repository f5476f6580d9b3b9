//! Admin API tests: token auth and the order lifecycle.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use trendora_integration_tests::{
    ADMIN_TOKEN, TestStack, mint_session, request, seed_product, send, stack,
};

async fn place_order(stack: &TestStack, user_id: i32, total: &str) -> Value {
    let product = seed_product(&stack.store, "Lifecycle Jacket", 40).await;
    let token = mint_session(&stack.store, user_id).await;
    let (status, order) = send(
        &stack.storefront,
        request(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{ "product_id": product.id, "quantity": 2, "size": "M", "color": null }],
                "shipping_address": {
                    "first_name": "Grace",
                    "last_name": "Hopper",
                    "address": "1 Compiler Court",
                    "city": "Arlington",
                    "state": "VA",
                    "country": "US",
                    "postal_code": "22202"
                },
                "shipping_method": "standard",
                "total_amount": total
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    order
}

#[tokio::test]
async fn test_admin_routes_require_the_admin_token() {
    let stack = stack();

    for token in [None, Some("wrong-token")] {
        let (status, body) = send(&stack.admin, request(Method::GET, "/orders", token, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized as admin");
    }

    // A customer session token is not an admin credential.
    let customer = mint_session(&stack.store, 1).await;
    let (status, _) = send(
        &stack.admin,
        request(Method::GET, "/orders", Some(&customer), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_sees_orders_across_users() {
    let stack = stack();
    place_order(&stack, 1, "90").await;
    place_order(&stack, 2, "90").await;

    let (status, body) = send(
        &stack.admin,
        request(Method::GET, "/orders", Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    // Newest first.
    let first = body[0]["id"].as_i64().expect("id");
    let second = body[1]["id"].as_i64().expect("id");
    assert!(first > second);
}

#[tokio::test]
async fn test_payment_and_delivery_are_idempotent() {
    let stack = stack();
    let order = place_order(&stack, 1, "90").await;
    let pay_path = format!("/orders/{}/pay", order["id"]);

    let (status, paid) = send(
        &stack.admin,
        request(Method::PUT, &pay_path, Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["payment_status"], "paid");
    let first_paid_at = paid["paid_at"].clone();
    assert!(!first_paid_at.is_null());

    // Repeating keeps the original timestamp.
    let (status, again) = send(
        &stack.admin,
        request(Method::PUT, &pay_path, Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["paid_at"], first_paid_at);

    let deliver_path = format!("/orders/{}/deliver", order["id"]);
    let (status, delivered) = send(
        &stack.admin,
        request(Method::PUT, &deliver_path, Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(delivered["delivery_status"], "delivered");
    assert!(!delivered["delivered_at"].is_null());
}

#[tokio::test]
async fn test_status_transitions_follow_the_table() {
    let stack = stack();
    let order = place_order(&stack, 1, "90").await;
    let status_path = format!("/orders/{}/status", order["id"]);

    // Pending cannot jump straight to shipped.
    let (status, _) = send(
        &stack.admin,
        request(
            Method::PUT,
            &status_path,
            Some(ADMIN_TOKEN),
            Some(&json!({ "status": "shipped" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for next in ["processing", "shipped", "delivered"] {
        let (status, body) = send(
            &stack.admin,
            request(
                Method::PUT,
                &status_path,
                Some(ADMIN_TOKEN),
                Some(&json!({ "status": next })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{next}");
        assert_eq!(body["status"], next);
    }

    // Delivered is terminal.
    let (status, _) = send(
        &stack.admin,
        request(
            Method::PUT,
            &status_path,
            Some(ADMIN_TOKEN),
            Some(&json!({ "status": "cancelled" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The snapshot survived the whole lifecycle untouched.
    let (status, body) = send(
        &stack.admin,
        request(
            Method::GET,
            &format!("/orders/{}", order["id"]),
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], order["items"]);
    assert_eq!(body["total_amount"], order["total_amount"]);
    assert_eq!(body["shipping_address"], order["shipping_address"]);
}

#[tokio::test]
async fn test_cancellation_from_pending() {
    let stack = stack();
    let order = place_order(&stack, 1, "90").await;

    let (status, body) = send(
        &stack.admin,
        request(
            Method::PUT,
            &format!("/orders/{}/status", order["id"]),
            Some(ADMIN_TOKEN),
            Some(&json!({ "status": "cancelled" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    // Terminal: no way back to the active workflow.
    let (status, _) = send(
        &stack.admin,
        request(
            Method::PUT,
            &format!("/orders/{}/status", order["id"]),
            Some(ADMIN_TOKEN),
            Some(&json!({ "status": "processing" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lifecycle_on_missing_order_is_404() {
    let stack = stack();

    for path in ["/orders/999", "/orders/999/pay", "/orders/999/deliver"] {
        let method = if path.ends_with("999") {
            Method::GET
        } else {
            Method::PUT
        };
        let (status, _) = send(&stack.admin, request(method, path, Some(ADMIN_TOKEN), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }
}
