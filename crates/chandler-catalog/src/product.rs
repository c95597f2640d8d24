//! Product data as the cart core sees it.

use serde::{Deserialize, Serialize};

use chandler_types::{Money, ProductId};

/// The slice of product state the cart core needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in minor units.
    pub price: Money,
    /// Whether tax applies to this product's lines.
    pub taxable: bool,
    /// A sold-individually product allows at most one unit per cart.
    #[serde(default)]
    pub sold_individually: bool,
    /// Known stock, if the catalog tracks it. `None` means unbounded.
    #[serde(default)]
    pub stock_quantity: Option<u32>,
}

impl Product {
    /// Convenience constructor for a plain taxable product.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            taxable: true,
            sold_individually: false,
            stock_quantity: None,
        }
    }

    /// Mark the product as sold individually.
    pub fn sold_individually(mut self) -> Self {
        self.sold_individually = true;
        self
    }

    /// Exempt the product from tax.
    pub fn tax_exempt(mut self) -> Self {
        self.taxable = false;
        self
    }

    /// Set a tracked stock quantity.
    pub fn with_stock(mut self, quantity: u32) -> Self {
        self.stock_quantity = Some(quantity);
        self
    }
}
