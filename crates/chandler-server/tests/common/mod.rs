//! Shared helpers for server integration tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use chandler_catalog::{MemoryCatalog, Product};
use chandler_server::{AppState, CART_KEY_HEADER, Server, ServerConfig};
use chandler_session::{MemoryStore, SessionConfig};
use chandler_types::{Money, ObserverSet, ProductId};

/// Products every test catalog carries.
pub fn test_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_tax_rate_bps(1000)
        .with_product(Product::new(ProductId(1), "Mug", Money(500)))
        .with_product(Product::new(ProductId(2), "Poster", Money(1500)).sold_individually())
        .with_product(Product::new(ProductId(3), "Sticker", Money(100)).with_stock(3))
}

/// Router over a fresh in-memory store with the default session config.
pub fn test_app() -> Router {
    test_app_with(SessionConfig::default())
}

/// Router over a fresh in-memory store with a custom session config.
pub fn test_app_with(session_config: SessionConfig) -> Router {
    let observers = ObserverSet::new();
    let state = AppState::new(
        Arc::new(MemoryStore::new(session_config.clone(), observers.clone())),
        Arc::new(test_catalog()),
        observers,
        session_config,
        ServerConfig::new().with_request_logging(false),
    );
    Server::from_state(state).router()
}

/// Build a request, optionally carrying a cart key and a JSON body.
pub fn request(
    method: &str,
    uri: &str,
    cart_key: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = cart_key {
        builder = builder.header(CART_KEY_HEADER, key);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request through a clone of the router.
pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

/// Read the cart key echoed in a response header.
pub fn cart_key_of(response: &Response<Body>) -> String {
    response
        .headers()
        .get(CART_KEY_HEADER)
        .expect("cart key header present")
        .to_str()
        .unwrap()
        .to_string()
}

/// Deserialize a response body.
pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
