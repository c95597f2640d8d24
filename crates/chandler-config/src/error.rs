//! Error types for configuration loading.

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML (or has the wrong shape).
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range or inconsistent.
    #[error("Invalid config: {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
