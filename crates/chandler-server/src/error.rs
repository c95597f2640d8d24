//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chandler_cart::CartError;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Domain validation failure; state unchanged.
    #[error("{message}")]
    Validation { code: String, message: String },

    /// The catalog engine failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CartError> for ServerError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::Validation { code, message } => ServerError::Validation {
                code: code.to_string(),
                message,
            },
            CartError::CartNotFound(key) => {
                ServerError::NotFound(format!("Cart {} not found", key))
            }
            CartError::ItemNotFound(item_key) => {
                ServerError::NotFound(format!("Item {} not found in cart", item_key))
            }
            CartError::Catalog(msg) => ServerError::Upstream(msg),
            CartError::Store(e) => ServerError::from(e),
        }
    }
}

impl From<chandler_session::Error> for ServerError {
    fn from(e: chandler_session::Error) -> Self {
        match e {
            chandler_session::Error::NotFound(key) => {
                ServerError::NotFound(format!("Session {} not found", key))
            }
            chandler_session::Error::Storage(msg) => {
                ServerError::Internal(format!("Storage error: {}", msg))
            }
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body: `{code, message, data: {status}}`, with the HTTP
/// status mirrored into `data.status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    pub data: ErrorData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorData {
    /// The HTTP status of the response carrying this body.
    pub status: u16,
}

impl ServerError {
    /// Status and body for this error, shared by the top-level response
    /// path and the batch endpoint's per-sub-request reporting.
    pub fn to_parts(&self) -> (StatusCode, ErrorBody) {
        let (status, code) = match self {
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request".to_string()),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found".to_string()),
            ServerError::Validation { code, .. } => (StatusCode::BAD_REQUEST, code.clone()),
            ServerError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error".to_string()),
            ServerError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "serialization_error".to_string(),
            ),
            ServerError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error".to_string(),
            ),
        };

        let body = ErrorBody {
            code,
            message: self.to_string(),
            data: ErrorData {
                status: status.as_u16(),
            },
        };
        (status, body)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_parts();

        if status.is_server_error() {
            tracing::error!(status = %status, code = %body.code, error = %body.message, "Server error");
        } else {
            tracing::warn!(status = %status, code = %body.code, error = %body.message, "Client error");
        }

        (status, Json(body)).into_response()
    }
}
