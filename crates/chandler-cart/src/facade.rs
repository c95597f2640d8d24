//! The cart facade.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use chandler_catalog::{Catalog, Product};
use chandler_session::{SessionConfig, SessionRecord, SessionStore};
use chandler_types::{
    CartEvent, CartOperation, LineItem, ObserverSet, ProductId, QuantityUpdate, SessionKey, Totals,
    line_key,
};

use crate::error::{CartError, Notice, Result};
use crate::snapshot::CartSnapshot;

/// Outcome of a mutating cart operation.
///
/// A success message and validation notices are mutually exclusive: the
/// message only reads as a plain success when `notices` is empty.
#[derive(Debug, Clone)]
pub struct MutationResult {
    pub snapshot: CartSnapshot,
    pub message: String,
    pub notices: Vec<Notice>,
}

impl MutationResult {
    fn ok(snapshot: CartSnapshot, message: impl Into<String>) -> Self {
        Self {
            snapshot,
            message: message.into(),
            notices: Vec::new(),
        }
    }
}

/// Applies cart operations to session records.
///
/// Every read-modify-write holds the store's per-key lock for its whole
/// duration, so concurrent operations on one key are serialized and
/// totals are never computed against a half-applied batch. All state is
/// addressed by explicit session key; the facade keeps none of its own.
pub struct CartFacade {
    store: Arc<dyn SessionStore>,
    catalog: Arc<dyn Catalog>,
    observers: ObserverSet,
    config: SessionConfig,
}

impl CartFacade {
    pub fn new(
        store: Arc<dyn SessionStore>,
        catalog: Arc<dyn Catalog>,
        observers: ObserverSet,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            observers,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Snapshot an existing cart. Unknown keys are an error; cart routes
    /// that treat a fresh key as an empty cart use
    /// [`get_cart_or_empty`](Self::get_cart_or_empty).
    pub async fn get_cart(&self, key: &SessionKey) -> Result<CartSnapshot> {
        match self.store.get(key).await? {
            Some(record) => Ok(self.snapshot(&record)),
            None => Err(CartError::CartNotFound(key.clone())),
        }
    }

    /// Snapshot a cart, treating an unknown key as an empty cart.
    pub async fn get_cart_or_empty(&self, key: &SessionKey) -> Result<CartSnapshot> {
        self.fresh_snapshot(key).await
    }

    /// Add a product to the cart, merging into an existing line when the
    /// same product+options configuration is already present. Creates the
    /// session record on first mutation.
    pub async fn add_item(
        &self,
        key: &SessionKey,
        product_id: ProductId,
        quantity: u32,
        options: BTreeMap<String, String>,
    ) -> Result<MutationResult> {
        if quantity == 0 {
            return Err(CartError::validation(
                "invalid_quantity",
                "Quantity must be at least 1",
            ));
        }

        let _guard = self.store.lock_key(key).await;

        let product = self.catalog.product(product_id).await?;
        let (mut record, created) = match self.store.get(key).await? {
            Some(record) => (record, false),
            None => (SessionRecord::new(key.clone(), self.config.ttl), true),
        };

        let existing = record
            .contents
            .get(&line_key(product_id, &options))
            .map(|line| line.quantity)
            .unwrap_or(0);
        if let Some((code, message)) = line_violation(&product, existing + quantity) {
            return Err(CartError::Validation { code, message });
        }

        self.pre_mutation(key, CartOperation::AddItem).await;
        record.contents.insert(LineItem::new(product_id, quantity, options));
        record.totals = self.catalog.compute_totals(&record.contents).await?;
        self.store.put(record).await?;

        if created {
            debug!(key = %key, "Session record created on first mutation");
            self.observers
                .dispatch(&CartEvent::SessionCreated { key: key.clone() })
                .await;
        }
        self.post_mutation(key, CartOperation::AddItem).await;

        Ok(MutationResult::ok(
            self.fresh_snapshot(key).await?,
            "Item added to cart.",
        ))
    }

    /// Set one line's quantity. Zero removes the line. Rejects
    /// sold-individually and stock violations without mutating.
    pub async fn set_quantity(
        &self,
        key: &SessionKey,
        item_key: &str,
        quantity: u32,
    ) -> Result<MutationResult> {
        let _guard = self.store.lock_key(key).await;

        let mut record = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| CartError::ItemNotFound(item_key.to_string()))?;
        let line = record
            .contents
            .get(item_key)
            .cloned()
            .ok_or_else(|| CartError::ItemNotFound(item_key.to_string()))?;

        if quantity > 0 {
            let product = self.catalog.product(line.product_id).await?;
            if let Some((code, message)) = line_violation(&product, quantity) {
                return Err(CartError::Validation { code, message });
            }
        }

        self.pre_mutation(key, CartOperation::SetQuantity).await;
        record.contents.set_quantity(item_key, quantity);
        record.totals = self.catalog.compute_totals(&record.contents).await?;
        self.store.put(record).await?;
        self.post_mutation(key, CartOperation::SetQuantity).await;

        let message = if quantity == 0 {
            "Item removed from cart."
        } else {
            "Quantity updated."
        };
        Ok(MutationResult::ok(self.fresh_snapshot(key).await?, message))
    }

    /// Best-effort bulk quantity update.
    ///
    /// Unknown item keys are skipped silently; validation failures are
    /// recorded as notices without touching that line. The whole batch is
    /// planned against the pre-update contents and then applied in one
    /// write, so totals always reflect a fully-applied batch. The
    /// operation only fails when nothing applied and at least one
    /// validation notice was recorded.
    pub async fn set_quantities(
        &self,
        key: &SessionKey,
        updates: &[QuantityUpdate],
    ) -> Result<MutationResult> {
        let _guard = self.store.lock_key(key).await;

        let Some(mut record) = self.store.get(key).await? else {
            // Nothing to update; every key is unknown and skipped.
            return Ok(MutationResult::ok(
                self.fresh_snapshot(key).await?,
                "No changes made to cart.",
            ));
        };

        let mut notices = Vec::new();
        let mut planned: Vec<&QuantityUpdate> = Vec::new();
        for update in updates {
            let Some(line) = record.contents.get(&update.item_key) else {
                debug!(item_key = %update.item_key, "Skipping unknown item key in bulk update");
                continue;
            };
            if update.quantity > 0 {
                let product = self.catalog.product(line.product_id).await?;
                if let Some((code, message)) = line_violation(&product, update.quantity) {
                    notices.push(Notice::new(code, message));
                    continue;
                }
            }
            planned.push(update);
        }

        if planned.is_empty() {
            if notices.is_empty() {
                return Ok(MutationResult::ok(
                    self.snapshot(&record),
                    "No changes made to cart.",
                ));
            }
            let combined = notices
                .iter()
                .map(|notice| notice.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CartError::validation("cart_update_failed", combined));
        }

        self.pre_mutation(key, CartOperation::BulkSetQuantity).await;
        for update in planned {
            record.contents.set_quantity(&update.item_key, update.quantity);
        }
        record.totals = self.catalog.compute_totals(&record.contents).await?;
        self.store.put(record).await?;
        self.post_mutation(key, CartOperation::BulkSetQuantity).await;

        let message = if notices.is_empty() {
            "Quantities updated."
        } else {
            "Some items could not be updated."
        };
        Ok(MutationResult {
            snapshot: self.fresh_snapshot(key).await?,
            message: message.to_string(),
            notices,
        })
    }

    /// Remove one line from the cart.
    pub async fn remove_item(&self, key: &SessionKey, item_key: &str) -> Result<MutationResult> {
        let _guard = self.store.lock_key(key).await;

        let mut record = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| CartError::ItemNotFound(item_key.to_string()))?;
        if record.contents.get(item_key).is_none() {
            return Err(CartError::ItemNotFound(item_key.to_string()));
        }

        self.pre_mutation(key, CartOperation::RemoveItem).await;
        record.contents.remove(item_key);
        record.totals = self.catalog.compute_totals(&record.contents).await?;
        self.store.put(record).await?;
        self.post_mutation(key, CartOperation::RemoveItem).await;

        Ok(MutationResult::ok(
            self.fresh_snapshot(key).await?,
            "Item removed from cart.",
        ))
    }

    /// Empty the cart. The record (and its key) stays live with zeroed
    /// totals; dropping the record entirely is the store's `delete`.
    pub async fn clear(&self, key: &SessionKey) -> Result<MutationResult> {
        let _guard = self.store.lock_key(key).await;

        let Some(mut record) = self.store.get(key).await? else {
            return Ok(MutationResult::ok(
                self.fresh_snapshot(key).await?,
                "Cart cleared.",
            ));
        };

        self.pre_mutation(key, CartOperation::Clear).await;
        record.contents.clear();
        record.totals = Totals::zero();
        self.store.put(record).await?;
        self.post_mutation(key, CartOperation::Clear).await;

        Ok(MutationResult::ok(
            self.fresh_snapshot(key).await?,
            "Cart cleared.",
        ))
    }

    /// Recompute totals through the catalog and persist them onto the
    /// record. Idempotent: with no intervening mutation, repeated calls
    /// yield identical totals.
    pub async fn recalculate_totals(&self, key: &SessionKey) -> Result<MutationResult> {
        let _guard = self.store.lock_key(key).await;

        let Some(mut record) = self.store.get(key).await? else {
            return Ok(MutationResult::ok(
                self.fresh_snapshot(key).await?,
                "Totals calculated.",
            ));
        };

        self.pre_mutation(key, CartOperation::CalculateTotals).await;
        record.totals = self.catalog.compute_totals(&record.contents).await?;
        self.store.put(record).await?;
        self.post_mutation(key, CartOperation::CalculateTotals).await;

        Ok(MutationResult::ok(
            self.fresh_snapshot(key).await?,
            "Totals calculated.",
        ))
    }

    fn snapshot(&self, record: &SessionRecord) -> CartSnapshot {
        CartSnapshot::from_record(record, self.config.expiring_soon_window)
    }

    async fn fresh_snapshot(&self, key: &SessionKey) -> Result<CartSnapshot> {
        match self.store.get(key).await? {
            Some(record) => Ok(self.snapshot(&record)),
            None => Ok(CartSnapshot::empty(
                key.clone(),
                self.config.ttl,
                self.config.expiring_soon_window,
            )),
        }
    }

    async fn pre_mutation(&self, key: &SessionKey, operation: CartOperation) {
        self.observers
            .dispatch(&CartEvent::PreMutation {
                key: key.clone(),
                operation,
            })
            .await;
    }

    async fn post_mutation(&self, key: &SessionKey, operation: CartOperation) {
        self.observers
            .dispatch(&CartEvent::PostMutation {
                key: key.clone(),
                operation,
            })
            .await;
    }
}

/// Check a prospective line quantity against product constraints.
fn line_violation(product: &Product, prospective_quantity: u32) -> Option<(&'static str, String)> {
    if product.sold_individually && prospective_quantity > 1 {
        return Some((
            "sold_individually",
            format!("\"{}\" may only be purchased once per order", product.name),
        ));
    }
    if let Some(stock) = product.stock_quantity {
        if prospective_quantity > stock {
            return Some((
                "insufficient_stock",
                format!("Only {} of \"{}\" in stock", stock, product.name),
            ));
        }
    }
    None
}
