//! Batch endpoint.
//!
//! One HTTP call encoding an ordered sequence of cart commands, executed
//! one after another against shared cart state: each sub-request sees the
//! effects of the ones before it. Execution is explicitly best-effort —
//! a failing sub-request is reported in its slot and does not roll back
//! earlier successes or stop later sub-requests.

use axum::{Json, extract::State, http::HeaderMap, response::Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use chandler_types::{CartCommand, SessionKey};

use crate::error::ServerError;
use crate::routes::cart::{apply_command, with_cart_key};
use crate::state::AppState;

/// Request body: ordered sub-requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<CartCommand>,
}

/// Outcome of one sub-request: its own status plus the body it would
/// have produced as a standalone call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Response body: one result per sub-request, in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub cart_key: SessionKey,
    pub responses: Vec<BatchItemResult>,
}

/// POST /api/v1/batch - Execute an ordered sequence of cart commands.
pub async fn batch_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<BatchRequest>,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;

    let mut responses = Vec::with_capacity(request.requests.len());
    for (index, command) in request.requests.into_iter().enumerate() {
        let operation = command.operation();
        match apply_command(&state, &resolved.key, command).await {
            Ok(cart_response) => {
                responses.push(BatchItemResult {
                    status: 200,
                    body: serde_json::to_value(cart_response)?,
                });
            }
            Err(error) => {
                debug!(
                    index,
                    operation = %operation,
                    error = %error,
                    "Batch sub-request failed, continuing"
                );
                let (status, body) = error.to_parts();
                responses.push(BatchItemResult {
                    status: status.as_u16(),
                    body: serde_json::to_value(body)?,
                });
            }
        }
    }

    let body = BatchResponse {
        cart_key: resolved.key.clone(),
        responses,
    };
    with_cart_key(&resolved.key, Json(body))
}
