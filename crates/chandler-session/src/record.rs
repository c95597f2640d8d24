//! The session record: cart contents plus expiry bookkeeping.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use chandler_types::{CartContents, SessionKey, Totals};

/// One live cart session.
///
/// Exactly one record exists per key at any time. The record carries its
/// own staleness probe (`content_hash`) and expiry bookkeeping; every
/// mutation refreshes `last_activity_at` and derives `expires_at` from it,
/// so `expires_at` is non-decreasing across a session's life.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// Session key. Immutable after creation.
    pub key: SessionKey,

    /// Ordered cart contents.
    pub contents: CartContents,

    /// Digest of `contents`, recomputed whenever the contents change.
    pub content_hash: String,

    /// Last computed totals; zeroed until a calculation persists them.
    pub totals: Totals,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub last_activity_at: DateTime<Utc>,

    /// `last_activity_at` plus the configured TTL.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create an empty record for a key, stamped with the current time.
    pub fn new(key: SessionKey, ttl: Duration) -> Self {
        let now = Utc::now();
        let contents = CartContents::new();
        let content_hash = contents.content_hash();
        Self {
            key,
            contents,
            content_hash,
            totals: Totals::zero(),
            created_at: now,
            last_activity_at: now,
            expires_at: expiry_after(now, ttl),
        }
    }

    /// Refresh activity and expiry stamps after a write.
    pub fn touch(&mut self, ttl: Duration) {
        self.last_activity_at = Utc::now();
        self.expires_at = expiry_after(self.last_activity_at, ttl);
    }

    /// Recompute the content hash from the current contents.
    pub fn refresh_hash(&mut self) {
        self.content_hash = self.contents.content_hash();
    }

    /// Whether the record has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the record expires within the warning window of `now`.
    /// An already-expired record is not "expiring soon".
    pub fn is_expiring_soon(&self, now: DateTime<Utc>, window: Duration) -> bool {
        !self.is_expired(now) && self.expires_at - now <= to_delta(window)
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

/// `ts + ttl`, saturating at the far end of representable time.
fn expiry_after(ts: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    ts.checked_add_signed(to_delta(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
