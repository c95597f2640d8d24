//! Catalog seam for the Chandler cart service.
//!
//! The cart core never computes prices or taxes itself; it calls through
//! the [`Catalog`] trait for product lookup and totals computation. The
//! production implementation would sit in front of a commerce engine;
//! [`MemoryCatalog`] backs the default server wiring and the test suites.

mod error;
mod memory;
mod product;

use async_trait::async_trait;

use chandler_types::{CartContents, ProductId, Totals};

pub use error::{CatalogError, Result};
pub use memory::MemoryCatalog;
pub use product::Product;

/// Product and pricing authority consumed by the cart core.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up one product.
    async fn product(&self, id: ProductId) -> Result<Product>;

    /// Compute the totals breakdown for a cart's contents.
    ///
    /// Must be a pure function of the contents and catalog state: two
    /// calls over unchanged inputs return identical totals.
    async fn compute_totals(&self, contents: &CartContents) -> Result<Totals>;
}
