//! Error taxonomy for cart operations.

use serde::{Deserialize, Serialize};

use chandler_types::SessionKey;

/// A recoverable, user-visible validation notice.
///
/// Notices accumulate during best-effort bulk operations; a response
/// carries either a success message or notices, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Machine-readable code (`sold_individually`, `insufficient_stock`, ...).
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
}

impl Notice {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Error type for cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Domain validation failure; state is unchanged.
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    /// The session key does not resolve to a live cart.
    #[error("Cart not found: {0}")]
    CartNotFound(SessionKey),

    /// The line-item key does not exist in the cart.
    #[error("Item not found in cart: {0}")]
    ItemNotFound(String),

    /// The catalog engine failed; not retried within the request.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Session store failure.
    #[error(transparent)]
    Store(#[from] chandler_session::Error),
}

impl CartError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        CartError::Validation {
            code,
            message: message.into(),
        }
    }
}

impl From<chandler_catalog::CatalogError> for CartError {
    fn from(e: chandler_catalog::CatalogError) -> Self {
        match e {
            // A client naming a product the catalog does not know is a
            // request problem, not an upstream outage.
            chandler_catalog::CatalogError::UnknownProduct(id) => {
                CartError::validation("invalid_product", format!("Product {} does not exist", id))
            }
            chandler_catalog::CatalogError::Unavailable(msg) => CartError::Catalog(msg),
        }
    }
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
