//! Config file loading.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::types::FileConfig;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chandler.toml";

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file.
    File(PathBuf),
    /// No file found; built-in defaults.
    Defaults,
}

/// A configuration plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FileConfig,
    pub source: ConfigSource,
}

/// Load configuration.
///
/// An explicit path must exist and parse. With no explicit path,
/// `chandler.toml` in the working directory is used when present;
/// otherwise defaults apply (logged, not an error).
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                info!("No config file found, using defaults");
                return Ok(LoadedConfig {
                    config: FileConfig::default(),
                    source: ConfigSource::Defaults,
                });
            }
            default.to_path_buf()
        }
    };

    let contents = std::fs::read_to_string(&path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    config.validate()?;

    debug!(path = %path.display(), "Loaded config file");
    Ok(LoadedConfig {
        config,
        source: ConfigSource::File(path),
    })
}
