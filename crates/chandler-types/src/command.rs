//! Typed cart commands.
//!
//! Request payloads are validated into this schema once at the REST
//! boundary; everything past the boundary works with these variants
//! instead of raw JSON. The batch endpoint carries an ordered list of
//! them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::keys::ProductId;
use crate::observer::CartOperation;

/// One quantity change inside a bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdate {
    /// Line-item key to update.
    pub item_key: String,
    /// New quantity; zero removes the line.
    pub quantity: u32,
}

/// A single validated cart operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartCommand {
    /// Add a product (or merge into an existing line with the same
    /// configuration).
    AddItem {
        product_id: ProductId,
        quantity: u32,
        #[serde(default)]
        options: BTreeMap<String, String>,
    },
    /// Set one line's quantity; zero removes the line.
    SetQuantity { item_key: String, quantity: u32 },
    /// Best-effort bulk quantity update.
    BulkSetQuantity { updates: Vec<QuantityUpdate> },
    /// Remove one line.
    RemoveItem { item_key: String },
    /// Empty the cart.
    Clear,
    /// Recompute and persist totals.
    CalculateTotals,
}

impl CartCommand {
    /// The operation label used for observer dispatch and logging.
    pub fn operation(&self) -> CartOperation {
        match self {
            CartCommand::AddItem { .. } => CartOperation::AddItem,
            CartCommand::SetQuantity { .. } => CartOperation::SetQuantity,
            CartCommand::BulkSetQuantity { .. } => CartOperation::BulkSetQuantity,
            CartCommand::RemoveItem { .. } => CartOperation::RemoveItem,
            CartCommand::Clear => CartOperation::Clear,
            CartCommand::CalculateTotals => CartOperation::CalculateTotals,
        }
    }
}
