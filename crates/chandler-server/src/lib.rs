//! HTTP API server for the Chandler cart service.
//!
//! This crate provides the REST transport over the cart facade and
//! session store:
//!
//! - Cart routes addressed by the `X-Cart-Key` header (minted on first
//!   contact, echoed back on every response)
//! - Session administration routes (listing, deletion, sweep trigger)
//! - A batch endpoint executing an ordered sequence of typed commands
//! - Request logging and the `{code, message, data: {status}}` error
//!   envelope
//!
//! # Example
//!
//! ```ignore
//! use chandler_server::{AppState, Server, ServerConfig};
//!
//! let state = AppState::new(store, catalog, observers, session_config, ServerConfig::new());
//! Server::from_state(state).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ErrorBody, Result, ServerError};
pub use routes::{BatchRequest, BatchResponse, CartResponse};
pub use state::{AppState, CART_KEY_HEADER, CUSTOMER_ID_HEADER};

use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The Chandler HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            // Health routes
            .merge(routes::health_routes())
            // API routes
            .nest("/api/v1", self.api_routes())
            // Request logging (inner layer, runs per request)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::request_logging_middleware,
            ))
            // TraceLayer for detailed HTTP tracing
            .layer(TraceLayer::new_for_http());

        if let Some(cors) = self.cors_layer() {
            router = router.layer(cors);
        }

        router.with_state(self.state.clone())
    }

    /// API routes (v1).
    fn api_routes(&self) -> Router<AppState> {
        use axum::routing::{get, post, put};

        Router::new()
            // Cart endpoints (addressed via the cart-key header)
            .route(
                "/cart",
                get(routes::get_cart_handler).delete(routes::clear_cart_handler),
            )
            .route(
                "/cart/items",
                post(routes::add_item_handler).put(routes::bulk_update_handler),
            )
            .route(
                "/cart/items/{item_key}",
                put(routes::set_quantity_handler).delete(routes::remove_item_handler),
            )
            .route("/cart/calculate", post(routes::calculate_handler))
            // Batch endpoint
            .route("/batch", post(routes::batch_handler))
            // Session administration
            .route("/sessions", get(routes::list_sessions_handler))
            .route(
                "/sessions/{key}",
                get(routes::get_session_handler).delete(routes::delete_session_handler),
            )
            .route("/sessions/sweep", post(routes::sweep_sessions_handler))
    }

    /// CORS layer for configured origins; `None` when no origins are set.
    fn cors_layer(&self) -> Option<CorsLayer> {
        if self.state.config.cors_origins.is_empty() {
            return None;
        }

        let origins: Vec<HeaderValue> = self
            .state
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        let cart_key = HeaderName::from_static(CART_KEY_HEADER);
        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([
                    header::CONTENT_TYPE,
                    cart_key.clone(),
                    HeaderName::from_static(CUSTOMER_ID_HEADER),
                ])
                // Storefront scripts must be able to read the minted key.
                .expose_headers([cart_key]),
        )
    }

    /// Run the server on the configured bind address.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        self.run_on(addr).await
    }

    /// Run the server on a specific address (useful for testing).
    pub async fn run_on(self, addr: SocketAddr) -> Result<()> {
        let router = self.router();

        info!("Starting server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }
}
