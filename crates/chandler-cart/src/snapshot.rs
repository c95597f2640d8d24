//! Read model handed to the transport layer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chandler_session::SessionRecord;
use chandler_types::{LineItem, SessionKey, Totals};

/// Point-in-time view of one cart session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Key the cart is stored under (echoed to the client).
    pub cart_key: SessionKey,
    /// Line items in display order.
    pub items: Vec<LineItem>,
    /// Last persisted totals.
    pub totals: Totals,
    /// Staleness probe over the contents.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True when `expires_at` falls within the configured warning window.
    pub expiring_soon: bool,
}

impl CartSnapshot {
    /// Snapshot an existing record.
    pub fn from_record(record: &SessionRecord, window: Duration) -> Self {
        let now = Utc::now();
        Self {
            cart_key: record.key.clone(),
            items: record.contents.items().to_vec(),
            totals: record.totals,
            content_hash: record.content_hash.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            expiring_soon: record.is_expiring_soon(now, window),
        }
    }

    /// Snapshot for a key with no record yet: no items, zero totals.
    pub fn empty(key: SessionKey, ttl: Duration, window: Duration) -> Self {
        let record = SessionRecord::new(key, ttl);
        Self::from_record(&record, window)
    }
}
