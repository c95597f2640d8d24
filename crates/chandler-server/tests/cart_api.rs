//! Integration tests for the cart and session routes.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use chandler_server::{CartResponse, ErrorBody};
use chandler_session::SessionConfig;

use common::{cart_key_of, read_json, request, send, test_app, test_app_with};

#[tokio::test]
async fn test_add_item_mints_key_and_returns_envelope() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 2})),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let key = cart_key_of(&response);
    assert_eq!(key.len(), 43);

    let body: CartResponse = read_json(response).await;
    assert_eq!(body.message, "Item added to cart.");
    assert_eq!(body.cart_key.as_str(), key);
    assert_eq!(body.items.len(), 1);
    assert_eq!(body.totals.items_count, 2);
    assert_eq!(body.totals.subtotal.0, 1000);
    assert_eq!(body.totals.tax.0, 100);
    assert_eq!(body.totals.total.0, 1100);
    assert!(body.notices.is_empty());
}

#[tokio::test]
async fn test_echoed_key_addresses_same_cart() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 1})),
        ),
    )
    .await;
    let key = cart_key_of(&response);

    // Echo the key back; the item is still there.
    let response = send(&app, request("GET", "/api/v1/cart", Some(&key), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cart_key_of(&response), key);

    let snapshot: serde_json::Value = read_json(response).await;
    assert_eq!(snapshot["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_cart_without_key_is_empty() {
    let app = test_app();

    let response = send(&app, request("GET", "/api/v1/cart", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot: serde_json::Value = read_json(response).await;
    assert!(snapshot["items"].as_array().unwrap().is_empty());
    assert_eq!(snapshot["totals"]["total"], 0);
}

#[tokio::test]
async fn test_customer_header_reaches_same_cart_across_devices() {
    let app = test_app();

    let mut req = request(
        "POST",
        "/api/v1/cart/items",
        None,
        Some(json!({"product_id": 1, "quantity": 1})),
    );
    req.headers_mut()
        .insert("x-customer-id", "customer-9".parse().unwrap());
    let response = send(&app, req).await;
    let key = cart_key_of(&response);

    // A different "device": no cart key, same customer header.
    let mut req = request("GET", "/api/v1/cart", None, None);
    req.headers_mut()
        .insert("x-customer-id", "customer-9".parse().unwrap());
    let response = send(&app, req).await;

    assert_eq!(cart_key_of(&response), key);
    let snapshot: serde_json::Value = read_json(response).await;
    assert_eq!(snapshot["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_quantity_and_remove() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 1})),
        ),
    )
    .await;
    let key = cart_key_of(&response);
    let body: CartResponse = read_json(response).await;
    let item_key = body.items[0].key.clone();

    let response = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/cart/items/{}", item_key),
            Some(&key),
            Some(json!({"quantity": 4})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: CartResponse = read_json(response).await;
    assert_eq!(body.items[0].quantity, 4);

    let response = send(
        &app,
        request(
            "DELETE",
            &format!("/api/v1/cart/items/{}", item_key),
            Some(&key),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: CartResponse = read_json(response).await;
    assert!(body.items.is_empty());
    assert_eq!(body.totals.total.0, 0);
}

#[tokio::test]
async fn test_sold_individually_rejected_with_domain_code() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 2, "quantity": 2})),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.code, "sold_individually");
    assert_eq!(body.data.status, 400);
}

#[tokio::test]
async fn test_unknown_product_rejected() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 99, "quantity": 1})),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.code, "invalid_product");
}

#[tokio::test]
async fn test_bulk_update_best_effort_over_api() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 1})),
        ),
    )
    .await;
    let key = cart_key_of(&response);
    let body: CartResponse = read_json(response).await;
    let mug_key = body.items[0].key.clone();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            Some(&key),
            Some(json!({"product_id": 3, "quantity": 1})),
        ),
    )
    .await;
    let body: CartResponse = read_json(response).await;
    let sticker_key = body.items[1].key.clone();

    // One unknown key, two valid updates.
    let response = send(
        &app,
        request(
            "PUT",
            "/api/v1/cart/items",
            Some(&key),
            Some(json!({"updates": [
                {"item_key": "does-not-exist", "quantity": 9},
                {"item_key": mug_key, "quantity": 5},
                {"item_key": sticker_key, "quantity": 2},
            ]})),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: CartResponse = read_json(response).await;
    assert_eq!(body.message, "Quantities updated.");
    assert!(body.notices.is_empty());
    assert_eq!(body.items[0].quantity, 5);
    assert_eq!(body.items[1].quantity, 2);
}

#[tokio::test]
async fn test_clear_resets_items_and_every_total_field() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 3})),
        ),
    )
    .await;
    let key = cart_key_of(&response);

    let response = send(&app, request("DELETE", "/api/v1/cart", Some(&key), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: CartResponse = read_json(response).await;
    assert_eq!(body.message, "Cart cleared.");
    assert!(body.items.is_empty());
    assert_eq!(body.totals.items_count, 0);
    assert_eq!(body.totals.subtotal.0, 0);
    assert_eq!(body.totals.tax.0, 0);
    assert_eq!(body.totals.total.0, 0);

    // The key is still valid and still reads as empty.
    let response = send(&app, request("GET", "/api/v1/cart", Some(&key), None)).await;
    assert_eq!(cart_key_of(&response), key);
    let snapshot: serde_json::Value = read_json(response).await;
    assert!(snapshot["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_calculate_totals_idempotent_over_api() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 3})),
        ),
    )
    .await;
    let key = cart_key_of(&response);

    let first: CartResponse = read_json(
        send(
            &app,
            request("POST", "/api/v1/cart/calculate", Some(&key), None),
        )
        .await,
    )
    .await;
    let second: CartResponse = read_json(
        send(
            &app,
            request("POST", "/api/v1/cart/calculate", Some(&key), None),
        )
        .await,
    )
    .await;

    assert_eq!(first.totals, second.totals);
    assert_eq!(second.totals.subtotal.0, 1500);
}

#[tokio::test]
async fn test_session_admin_flow() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 1})),
        ),
    )
    .await;
    let key = cart_key_of(&response);

    // Listed.
    let listing: serde_json::Value =
        read_json(send(&app, request("GET", "/api/v1/sessions", None, None)).await).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["sessions"][0]["cart_key"], key.as_str());

    // Fetchable by key.
    let response = send(
        &app,
        request("GET", &format!("/api/v1/sessions/{}", key), None, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Converted at checkout: record dropped.
    let response = send(
        &app,
        request(
            "DELETE",
            &format!("/api/v1/sessions/{}?reason=converted", key),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        request("GET", &format!("/api/v1/sessions/{}", key), None, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session_unknown_reason_rejected() {
    let app = test_app();

    let response = send(
        &app,
        request(
            "DELETE",
            "/api/v1/sessions/some-key?reason=vaporized",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_session_not_found_before_sweep() {
    let app = test_app_with(SessionConfig::default().with_ttl(Duration::from_millis(30)));

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/cart/items",
            None,
            Some(json!({"product_id": 1, "quantity": 1})),
        ),
    )
    .await;
    let key = cart_key_of(&response);

    tokio::time::sleep(Duration::from_millis(80)).await;

    // No sweep has run, but the record must already read as gone.
    let response = send(
        &app,
        request("GET", &format!("/api/v1/sessions/{}", key), None, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Presenting the dead token mints a fresh key.
    let response = send(&app, request("GET", "/api/v1/cart", Some(&key), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_ne!(cart_key_of(&response), key);
}

#[tokio::test]
async fn test_sweep_endpoint_reports_count() {
    let app = test_app_with(SessionConfig::default().with_ttl(Duration::from_millis(30)));

    for product in [1, 3] {
        send(
            &app,
            request(
                "POST",
                "/api/v1/cart/items",
                None,
                Some(json!({"product_id": product, "quantity": 1})),
            ),
        )
        .await;
    }

    tokio::time::sleep(Duration::from_millis(80)).await;

    let body: serde_json::Value = read_json(
        send(&app, request("POST", "/api/v1/sessions/sweep", None, None)).await,
    )
    .await;
    assert_eq!(body["removed"], 2);

    // A second sweep has nothing left to remove.
    let body: serde_json::Value = read_json(
        send(&app, request("POST", "/api/v1/sessions/sweep", None, None)).await,
    )
    .await;
    assert_eq!(body["removed"], 0);
}
