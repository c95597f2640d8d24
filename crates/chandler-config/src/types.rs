//! Typed configuration sections.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use chandler_catalog::{MemoryCatalog, Product};
use chandler_session::SessionConfig;

use crate::error::{ConfigError, Result};

/// Root of the `chandler.toml` file. Every section is optional and
/// defaults to the values documented on its fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub catalog: CatalogSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

/// `[session]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    /// Time-to-live after the last activity, in seconds. Default 48h.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Expiring-soon warning window, in seconds. Default 1h.
    #[serde(default = "default_expiring_soon_secs")]
    pub expiring_soon_secs: u64,

    /// Sweep scheduler interval, in seconds. Default 5m.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Whether `serve` runs the sweep scheduler. Default true.
    #[serde(default = "default_true")]
    pub enable_sweep: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            expiring_soon_secs: default_expiring_soon_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            enable_sweep: true,
        }
    }
}

fn default_ttl_secs() -> u64 {
    48 * 60 * 60
}

fn default_expiring_soon_secs() -> u64 {
    60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

fn default_true() -> bool {
    true
}

/// `[catalog]` section: flat tax rate plus seed products for the
/// in-memory catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Flat tax rate in basis points. Default 875 (8.75%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Products to seed the in-memory catalog with.
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            tax_rate_bps: default_tax_rate_bps(),
            products: Vec::new(),
        }
    }
}

fn default_tax_rate_bps() -> u32 {
    875
}

impl FileConfig {
    /// Check cross-field constraints after parsing.
    pub fn validate(&self) -> Result<()> {
        if self.session.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session.ttl_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.session.expiring_soon_secs > self.session.ttl_secs {
            return Err(ConfigError::Invalid {
                field: "session.expiring_soon_secs",
                reason: "must not exceed session.ttl_secs".to_string(),
            });
        }
        if self.catalog.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid {
                field: "catalog.tax_rate_bps",
                reason: "must not exceed 10000 (100%)".to_string(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        for product in &self.catalog.products {
            if !seen.insert(product.id) {
                return Err(ConfigError::Invalid {
                    field: "catalog.products",
                    reason: format!("duplicate product id {}", product.id),
                });
            }
        }
        Ok(())
    }

    /// Build the session configuration for the store and facade.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_ttl(Duration::from_secs(self.session.ttl_secs))
            .with_expiring_soon_window(Duration::from_secs(self.session.expiring_soon_secs))
            .with_sweep_interval(Duration::from_secs(self.session.sweep_interval_secs))
            .with_sweep_task(self.session.enable_sweep)
    }

    /// Build the seeded in-memory catalog.
    pub fn build_catalog(&self) -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new().with_tax_rate_bps(self.catalog.tax_rate_bps);
        for product in &self.catalog.products {
            catalog = catalog.with_product(product.clone());
        }
        catalog
    }
}
