//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderMap;

use chandler_cart::CartFacade;
use chandler_catalog::Catalog;
use chandler_session::{Credentials, KeyGenerator, ResolvedKey, SessionConfig, SessionStore};
use chandler_types::{CustomerId, ObserverSet, SessionKey};

use crate::config::ServerConfig;
use crate::error::Result;

/// Request header carrying the client's session key; also set on every
/// cart response so stateless clients can echo it back.
pub const CART_KEY_HEADER: &str = "x-cart-key";

/// Request header the upstream authenticating gateway uses to assert a
/// customer identity.
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session store, shared with the facade.
    pub store: Arc<dyn SessionStore>,

    /// The cart facade all mutations go through.
    pub facade: Arc<CartFacade>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Session expiry configuration (TTL, warning window).
    pub session_config: SessionConfig,

    /// Session key derivation and minting.
    pub keygen: KeyGenerator,
}

impl AppState {
    /// Wire up the application state from its components.
    pub fn new(
        store: Arc<dyn SessionStore>,
        catalog: Arc<dyn Catalog>,
        observers: ObserverSet,
        session_config: SessionConfig,
        config: ServerConfig,
    ) -> Self {
        let facade = Arc::new(CartFacade::new(
            Arc::clone(&store),
            catalog,
            observers,
            session_config.clone(),
        ));
        Self {
            store,
            facade,
            config: Arc::new(config),
            session_config,
            keygen: KeyGenerator::new(),
        }
    }

    /// Resolve the session key for a request from its headers.
    ///
    /// Customer identity wins (deterministic key), then a presented key
    /// that still resolves to a live record, then a freshly minted token.
    pub async fn resolve_key(&self, headers: &HeaderMap) -> Result<ResolvedKey> {
        let customer_id = headers
            .get(CUSTOMER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(CustomerId::new);
        let presented_key = headers
            .get(CART_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(SessionKey::from);

        let credentials = Credentials {
            customer_id,
            presented_key,
        };
        Ok(self
            .keygen
            .resolve(self.store.as_ref(), &credentials)
            .await?)
    }
}
