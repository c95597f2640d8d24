//! Cart lifecycle observers.
//!
//! Extension points fire as explicit events at well-defined moments:
//! before and after each mutation, and on session creation/deletion.
//! Observers run in registration order and are notify-only — they cannot
//! veto or transform the operation. Deletion events let dependent caches
//! (a carts-in-session counter, for instance) invalidate.

use std::sync::Arc;

use tracing::trace;

use crate::keys::SessionKey;

/// A cart operation, as seen by observers and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    AddItem,
    SetQuantity,
    BulkSetQuantity,
    RemoveItem,
    Clear,
    CalculateTotals,
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartOperation::AddItem => write!(f, "add_item"),
            CartOperation::SetQuantity => write!(f, "set_quantity"),
            CartOperation::BulkSetQuantity => write!(f, "bulk_set_quantity"),
            CartOperation::RemoveItem => write!(f, "remove_item"),
            CartOperation::Clear => write!(f, "clear"),
            CartOperation::CalculateTotals => write!(f, "calculate_totals"),
        }
    }
}

/// Why a session record was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReason {
    /// Explicit delete (admin/support tooling).
    Explicit,
    /// TTL expiry (lazy check on read, or the sweep).
    Expired,
    /// Cart converted to an order at checkout.
    Converted,
}

impl std::fmt::Display for DeleteReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteReason::Explicit => write!(f, "explicit"),
            DeleteReason::Expired => write!(f, "expired"),
            DeleteReason::Converted => write!(f, "converted"),
        }
    }
}

/// A lifecycle event observers can listen for.
#[derive(Debug, Clone)]
pub enum CartEvent {
    /// A session record came into existence.
    SessionCreated { key: SessionKey },
    /// A session record was removed.
    SessionDeleted {
        key: SessionKey,
        reason: DeleteReason,
    },
    /// A mutation is about to be applied.
    PreMutation {
        key: SessionKey,
        operation: CartOperation,
    },
    /// A mutation was applied successfully.
    PostMutation {
        key: SessionKey,
        operation: CartOperation,
    },
}

/// Trait implemented by cart observers.
///
/// Observers must not assume exclusive access to the session — the
/// per-key lock is held by the mutation that dispatched the event.
#[async_trait::async_trait]
pub trait CartObserver: Send + Sync {
    async fn on_event(&self, event: &CartEvent);
}

/// An ordered set of observers.
///
/// Dispatch walks observers in registration order and awaits each before
/// the next, so observer effects are deterministic.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn CartObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Later registrations run later.
    pub fn register(&mut self, observer: Arc<dyn CartObserver>) {
        self.observers.push(observer);
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Dispatch an event to every observer, in registration order.
    pub async fn dispatch(&self, event: &CartEvent) {
        for observer in &self.observers {
            observer.on_event(event).await;
        }
        if !self.observers.is_empty() {
            trace!(?event, observers = self.observers.len(), "Dispatched cart event");
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}
