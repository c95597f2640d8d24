//! Error types for session store operations.

/// Error type for session store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Session was not found (or has expired).
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Error from the storage backend.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, Error>;
