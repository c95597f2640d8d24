//! Keyed, expiring cart-session store.
//!
//! This crate owns the session side of Chandler:
//! - [`SessionRecord`]: cart contents plus content-hash and expiry
//!   bookkeeping
//! - [`SessionStore`]: get/put/delete/sweep behind a trait, with an
//!   in-memory implementation and per-key locking for read-modify-write
//!   callers
//! - [`KeyGenerator`]: deterministic keys for authenticated customers,
//!   random unguessable tokens for anonymous ones
//!
//! Expiry is enforced twice: lazily on every read (a record past its
//! `expires_at` is not found, even before any sweep runs) and eagerly by
//! the externally triggered [`SessionStore::sweep_expired`].

mod config;
mod error;
mod keygen;
mod record;
mod store;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use keygen::{Credentials, KeyGenerator, ResolvedKey};
pub use record::SessionRecord;
pub use store::{MemoryStore, SessionStore};
