//! Session key generation and resolution.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

use chandler_types::{CustomerId, SessionKey};

use crate::store::SessionStore;

/// Request credentials relevant to key resolution.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Authenticated customer id, if the upstream gateway asserted one.
    pub customer_id: Option<CustomerId>,
    /// Session key presented by the client, if any.
    pub presented_key: Option<SessionKey>,
}

/// Outcome of key resolution.
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    /// The key the request should operate under.
    pub key: SessionKey,
    /// True when a fresh token was minted (the client has not seen this
    /// key yet and must be told via the response header).
    pub minted: bool,
}

/// Derives and mints session keys.
///
/// Customer-derived keys are a fixed mapping, so the same logged-in
/// customer resolves to the same cart across devices. Anonymous tokens
/// carry 256 bits of OS-seeded entropy; a presented token that no longer
/// resolves to a live record is not re-adopted — a fresh one is minted so
/// a token never spans two logical carts.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic key for an authenticated customer.
    pub fn derive_for_customer(&self, customer: &CustomerId) -> SessionKey {
        let mut hasher = Sha256::new();
        hasher.update(b"customer:");
        hasher.update(customer.as_str().as_bytes());
        SessionKey::new(URL_SAFE_NO_PAD.encode(hasher.finalize()))
    }

    /// Mint a fresh anonymous token.
    ///
    /// The only failure mode is entropy-source exhaustion, which panics
    /// inside the rng and is fatal by design.
    pub fn mint_anonymous(&self) -> SessionKey {
        let mut token_bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut token_bytes);
        SessionKey::new(URL_SAFE_NO_PAD.encode(token_bytes))
    }

    /// Resolve the session key for a request.
    ///
    /// Precedence: authenticated customer id (deterministic), then a
    /// presented token that still resolves to a live record, then a
    /// freshly minted token.
    pub async fn resolve(
        &self,
        store: &dyn SessionStore,
        credentials: &Credentials,
    ) -> crate::Result<ResolvedKey> {
        if let Some(customer) = &credentials.customer_id {
            return Ok(ResolvedKey {
                key: self.derive_for_customer(customer),
                minted: false,
            });
        }

        if let Some(presented) = &credentials.presented_key {
            if store.get(presented).await?.is_some() {
                return Ok(ResolvedKey {
                    key: presented.clone(),
                    minted: false,
                });
            }
        }

        Ok(ResolvedKey {
            key: self.mint_anonymous(),
            minted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, SessionConfig, SessionRecord};
    use chandler_types::ObserverSet;
    use std::time::Duration;

    #[test]
    fn test_customer_key_is_stable() {
        let generator = KeyGenerator::new();
        let customer = CustomerId::new("customer-17");

        let first = generator.derive_for_customer(&customer);
        let second = generator.derive_for_customer(&customer);
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_customers_different_keys() {
        let generator = KeyGenerator::new();
        assert_ne!(
            generator.derive_for_customer(&CustomerId::new("a")),
            generator.derive_for_customer(&CustomerId::new("b"))
        );
    }

    #[test]
    fn test_minted_tokens_are_unique_and_long() {
        let generator = KeyGenerator::new();
        let first = generator.mint_anonymous();
        let second = generator.mint_anonymous();

        assert_ne!(first, second);
        // 32 bytes, base64 url-safe without padding.
        assert_eq!(first.as_str().len(), 43);
    }

    #[tokio::test]
    async fn test_resolve_prefers_customer_identity() {
        let store = MemoryStore::new(SessionConfig::default(), ObserverSet::new());
        let generator = KeyGenerator::new();

        let credentials = Credentials {
            customer_id: Some(CustomerId::new("customer-17")),
            presented_key: Some(SessionKey::new("some-token")),
        };

        let resolved = generator.resolve(&store, &credentials).await.unwrap();
        assert!(!resolved.minted);
        assert_eq!(
            resolved.key,
            generator.derive_for_customer(&CustomerId::new("customer-17"))
        );
    }

    #[tokio::test]
    async fn test_resolve_reuses_live_presented_key() {
        let config = SessionConfig::default();
        let store = MemoryStore::new(config.clone(), ObserverSet::new());
        let generator = KeyGenerator::new();

        let key = SessionKey::new("live-token");
        store
            .put(SessionRecord::new(key.clone(), config.ttl))
            .await
            .unwrap();

        let credentials = Credentials {
            customer_id: None,
            presented_key: Some(key.clone()),
        };
        let resolved = generator.resolve(&store, &credentials).await.unwrap();
        assert!(!resolved.minted);
        assert_eq!(resolved.key, key);
    }

    #[tokio::test]
    async fn test_resolve_mints_for_dead_presented_key() {
        let store = MemoryStore::new(SessionConfig::default(), ObserverSet::new());
        let generator = KeyGenerator::new();

        let credentials = Credentials {
            customer_id: None,
            presented_key: Some(SessionKey::new("dead-token")),
        };
        let resolved = generator.resolve(&store, &credentials).await.unwrap();
        assert!(resolved.minted);
        assert_ne!(resolved.key, SessionKey::new("dead-token"));
    }

    #[tokio::test]
    async fn test_resolve_mints_for_expired_presented_key() {
        let config = SessionConfig::default().with_ttl(Duration::from_millis(10));
        let store = MemoryStore::new(config.clone(), ObserverSet::new());
        let generator = KeyGenerator::new();

        let key = SessionKey::new("expiring-token");
        store
            .put(SessionRecord::new(key.clone(), config.ttl))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        let credentials = Credentials {
            customer_id: None,
            presented_key: Some(key.clone()),
        };
        let resolved = generator.resolve(&store, &credentials).await.unwrap();
        assert!(resolved.minted);
        assert_ne!(resolved.key, key);
    }
}
