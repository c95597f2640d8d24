//! Configuration for the Chandler cart service.
//!
//! TOML-based configuration with serde-defaulted sections:
//!
//! ```toml
//! [server]
//! bind_address = "127.0.0.1:8080"
//!
//! [session]
//! ttl_secs = 172800
//! expiring_soon_secs = 3600
//!
//! [catalog]
//! tax_rate_bps = 875
//!
//! [[catalog.products]]
//! id = 1
//! name = "Mug"
//! price = 500
//! taxable = true
//! ```
//!
//! Loading takes an explicit `--config` path, falls back to
//! `chandler.toml` in the working directory, and otherwise runs on
//! defaults (logged, not an error).

mod discovery;
mod error;
mod types;

pub use discovery::{ConfigSource, DEFAULT_CONFIG_FILE, LoadedConfig, load_config};
pub use error::{ConfigError, Result};
pub use types::{CatalogSection, FileConfig, ServerSection, SessionSection};
