//! Ordered cart contents.
//!
//! A cart is an ordered mapping from line-item key to line item; insertion
//! order is display order. Line keys are digests of product id plus chosen
//! options, so the same product with different options forms distinct
//! lines and re-adding an identical configuration merges into the existing
//! line.

use std::collections::BTreeMap;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::keys::ProductId;

/// Derive the line-item key for a product and its chosen options.
///
/// Options are folded in sorted order (`BTreeMap` iteration), so the key
/// is independent of the order the client listed them in.
pub fn line_key(product_id: ProductId, options: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"line:");
    hasher.update(product_id.0.to_be_bytes());
    for (name, value) in options {
        hasher.update(b"\x1f");
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }
    let digest = hasher.finalize();
    URL_SAFE_NO_PAD.encode(&digest[..16])
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Key derived from product id + options; see [`line_key`].
    pub key: String,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: u32,
    /// Chosen options (size, color, ...), sorted by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl LineItem {
    /// Build a line item, deriving its key.
    pub fn new(product_id: ProductId, quantity: u32, options: BTreeMap<String, String>) -> Self {
        Self {
            key: line_key(product_id, &options),
            product_id,
            quantity,
            options,
        }
    }
}

/// Ordered collection of line items, keyed by line-item key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartContents {
    items: Vec<LineItem>,
}

impl CartContents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines (not units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line by its key.
    pub fn get(&self, key: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Insert a line, merging quantities when the key already exists.
    /// Returns the key of the affected line.
    pub fn insert(&mut self, item: LineItem) -> String {
        if let Some(existing) = self.items.iter_mut().find(|i| i.key == item.key) {
            existing.quantity += item.quantity;
            existing.key.clone()
        } else {
            let key = item.key.clone();
            self.items.push(item);
            key
        }
    }

    /// Set the quantity of an existing line. Zero removes the line.
    /// Returns `false` when the key is unknown.
    pub fn set_quantity(&mut self, key: &str, quantity: u32) -> bool {
        let Some(position) = self.items.iter().position(|i| i.key == key) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(position);
        } else {
            self.items[position].quantity = quantity;
        }
        true
    }

    /// Remove a line, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<LineItem> {
        let position = self.items.iter().position(|i| i.key == key)?;
        Some(self.items.remove(position))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Digest of the serialized contents; changes whenever the contents
    /// change, so callers can cheaply detect staleness.
    pub fn content_hash(&self) -> String {
        let serialized =
            serde_json::to_vec(&self.items).expect("cart contents serialize infallibly");
        let mut hasher = Sha256::new();
        hasher.update(&serialized);
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_line_key_deterministic() {
        let opts = options(&[("size", "m"), ("color", "blue")]);
        assert_eq!(line_key(ProductId(7), &opts), line_key(ProductId(7), &opts));
    }

    #[test]
    fn test_line_key_distinguishes_options() {
        let a = line_key(ProductId(7), &options(&[("size", "m")]));
        let b = line_key(ProductId(7), &options(&[("size", "l")]));
        let c = line_key(ProductId(8), &options(&[("size", "m")]));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut contents = CartContents::new();
        contents.insert(LineItem::new(ProductId(3), 1, BTreeMap::new()));
        contents.insert(LineItem::new(ProductId(1), 1, BTreeMap::new()));
        contents.insert(LineItem::new(ProductId(2), 1, BTreeMap::new()));

        let ids: Vec<u64> = contents.items().iter().map(|i| i.product_id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_insert_merges_same_configuration() {
        let mut contents = CartContents::new();
        let key = contents.insert(LineItem::new(ProductId(3), 2, BTreeMap::new()));
        contents.insert(LineItem::new(ProductId(3), 1, BTreeMap::new()));

        assert_eq!(contents.len(), 1);
        assert_eq!(contents.get(&key).unwrap().quantity, 3);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut contents = CartContents::new();
        let key = contents.insert(LineItem::new(ProductId(3), 2, BTreeMap::new()));

        assert!(contents.set_quantity(&key, 0));
        assert!(contents.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_key() {
        let mut contents = CartContents::new();
        assert!(!contents.set_quantity("missing", 4));
    }

    #[test]
    fn test_content_hash_tracks_changes() {
        let mut contents = CartContents::new();
        let empty = contents.content_hash();

        let key = contents.insert(LineItem::new(ProductId(3), 2, BTreeMap::new()));
        let with_item = contents.content_hash();
        assert_ne!(empty, with_item);

        // Unchanged contents hash identically.
        assert_eq!(contents.content_hash(), with_item);

        contents.set_quantity(&key, 5);
        assert_ne!(contents.content_hash(), with_item);
    }
}
