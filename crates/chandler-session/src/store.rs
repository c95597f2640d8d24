//! Session store: trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, trace};

use chandler_types::{CartEvent, DeleteReason, ObserverSet, SessionKey};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::record::SessionRecord;

/// Persistence seam for session records.
///
/// `get` applies the lazy expiry check: a record past its `expires_at` is
/// reported as absent even if no sweep has run yet. `put` is an upsert
/// that recomputes the content hash and refreshes the expiry from
/// `last_activity_at = now`. Implementations hand out a per-key lock via
/// [`lock_key`]; callers doing a read-modify-write must hold it for the
/// whole cycle so concurrent writers to one key never interleave.
///
/// [`lock_key`]: SessionStore::lock_key
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a live (non-expired) record.
    async fn get(&self, key: &SessionKey) -> Result<Option<SessionRecord>>;

    /// Upsert a record: recompute its hash, refresh its expiry, store it.
    async fn put(&self, record: SessionRecord) -> Result<()>;

    /// Remove a record, notifying observers with the reason.
    /// Returns `true` if a record existed.
    async fn delete(&self, key: &SessionKey, reason: DeleteReason) -> Result<bool>;

    /// Remove every expired record, returning the count removed.
    ///
    /// Triggered externally (scheduler or admin endpoint); re-checks
    /// expiry under the per-key lock so it cannot race an in-flight
    /// mutation that just refreshed a record.
    async fn sweep_expired(&self) -> Result<usize>;

    /// Snapshot of all live records (expired ones filtered out).
    async fn list(&self) -> Result<Vec<SessionRecord>>;

    /// Acquire the exclusive per-key lock used to serialize
    /// read-modify-write cycles for one session.
    async fn lock_key(&self, key: &SessionKey) -> OwnedMutexGuard<()>;
}

/// In-memory session store.
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionKey, SessionRecord>>,
    locks: Mutex<HashMap<SessionKey, Arc<Mutex<()>>>>,
    config: SessionConfig,
    observers: ObserverSet,
}

impl MemoryStore {
    pub fn new(config: SessionConfig, observers: ObserverSet) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
            config,
            observers,
        }
    }

    /// The store's session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current number of records, expired ones included (they linger
    /// until the next sweep).
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop lock-registry entries for keys that no longer have a record
    /// and no holder or waiter.
    async fn prune_locks(&self) {
        let sessions = self.sessions.read().await;
        let mut locks = self.locks.lock().await;
        locks.retain(|key, lock| sessions.contains_key(key) || Arc::strong_count(lock) > 1);
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<SessionRecord>> {
        let sessions = self.sessions.read().await;
        match sessions.get(key) {
            Some(record) if record.is_expired(Utc::now()) => {
                trace!(key = %key, "Record past expiry, reporting not found");
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone())),
            None => Ok(None),
        }
    }

    async fn put(&self, mut record: SessionRecord) -> Result<()> {
        record.refresh_hash();
        record.touch(self.config.ttl);

        let mut sessions = self.sessions.write().await;
        trace!(
            key = %record.key,
            items = record.contents.len(),
            expires_at = %record.expires_at,
            "Storing session record"
        );
        sessions.insert(record.key.clone(), record);
        Ok(())
    }

    async fn delete(&self, key: &SessionKey, reason: DeleteReason) -> Result<bool> {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(key)
        };

        if removed.is_none() {
            return Ok(false);
        }

        debug!(key = %key, reason = %reason, "Session record deleted");
        self.observers
            .dispatch(&CartEvent::SessionDeleted {
                key: key.clone(),
                reason,
            })
            .await;
        self.prune_locks().await;
        Ok(true)
    }

    async fn sweep_expired(&self) -> Result<usize> {
        let candidates: Vec<SessionKey> = {
            let now = Utc::now();
            let sessions = self.sessions.read().await;
            sessions
                .values()
                .filter(|record| record.is_expired(now))
                .map(|record| record.key.clone())
                .collect()
        };

        let mut removed = 0;
        for key in candidates {
            // Take the same lock mutations use, then re-check: a write
            // that slipped in may have refreshed the expiry.
            let _guard = self.lock_key(&key).await;

            let still_expired = {
                let mut sessions = self.sessions.write().await;
                match sessions.get(&key) {
                    Some(record) if record.is_expired(Utc::now()) => {
                        sessions.remove(&key);
                        true
                    }
                    _ => false,
                }
            };

            if still_expired {
                removed += 1;
                self.observers
                    .dispatch(&CartEvent::SessionDeleted {
                        key: key.clone(),
                        reason: DeleteReason::Expired,
                    })
                    .await;
            }
        }

        self.prune_locks().await;
        if removed > 0 {
            info!(removed, "Swept expired sessions");
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<SessionRecord>> {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|record| !record.is_expired(now))
            .cloned()
            .collect())
    }

    async fn lock_key(&self, key: &SessionKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
