//! Error types for catalog operations.

use chandler_types::ProductId;

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The product id is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The upstream catalog engine could not be reached or failed.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
