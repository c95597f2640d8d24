//! In-memory catalog implementation.

use std::collections::HashMap;

use async_trait::async_trait;

use chandler_types::{CartContents, Money, ProductId, Totals};

use crate::error::{CatalogError, Result};
use crate::product::Product;
use crate::Catalog;

/// Default tax rate: 8.75% in basis points.
pub const DEFAULT_TAX_RATE_BPS: u32 = 875;

/// In-memory catalog with a flat tax rate.
///
/// Backs the default server wiring (seeded from configuration) and the
/// test suites. Tax is computed per line and rounded down, so totals are
/// deterministic for unchanged contents.
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    products: HashMap<ProductId, Product>,
    tax_rate_bps: u32,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self {
            products: HashMap::new(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
        }
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flat tax rate in basis points.
    pub fn with_tax_rate_bps(mut self, bps: u32) -> Self {
        self.tax_rate_bps = bps;
        self
    }

    /// Add a product to the catalog.
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.id, product);
        self
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn product(&self, id: ProductId) -> Result<Product> {
        self.products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::UnknownProduct(id))
    }

    async fn compute_totals(&self, contents: &CartContents) -> Result<Totals> {
        let mut totals = Totals::zero();

        for item in contents.items() {
            let product = self
                .products
                .get(&item.product_id)
                .ok_or(CatalogError::UnknownProduct(item.product_id))?;

            let line_subtotal = product.price.times(item.quantity);
            totals.items_count += item.quantity;
            totals.subtotal += line_subtotal;
            if product.taxable {
                totals.tax += line_subtotal.at_rate_bps(self.tax_rate_bps);
            }
        }

        totals.total = totals.subtotal + totals.tax;
        Ok(totals)
    }
}
