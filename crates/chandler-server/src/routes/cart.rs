//! Cart endpoints.
//!
//! Every cart route resolves the session key from the `X-Cart-Key`
//! request header (or mints one) and echoes the resolved key back in the
//! same response header, so stateless clients always learn their key.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chandler_cart::{MutationResult, Notice};
use chandler_types::{CartCommand, ProductId, QuantityUpdate, SessionKey};

use crate::error::ServerError;
use crate::state::{AppState, CART_KEY_HEADER};

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for adding an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Request body for setting one line's quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

/// Request body for a bulk quantity update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    pub updates: Vec<QuantityUpdate>,
}

/// Response envelope for cart-mutating operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    /// Human-readable outcome. Reads as a plain success only when
    /// `notices` is empty.
    pub message: String,
    /// Key the cart is stored under.
    pub cart_key: SessionKey,
    /// Line items in display order.
    pub items: Vec<chandler_types::LineItem>,
    /// Totals after the operation.
    pub totals: chandler_types::Totals,
    /// Validation notices recorded during a best-effort operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
    /// Staleness probe over the contents.
    pub content_hash: String,
    pub expires_at: DateTime<Utc>,
    pub expiring_soon: bool,
}

impl From<MutationResult> for CartResponse {
    fn from(result: MutationResult) -> Self {
        let snapshot = result.snapshot;
        Self {
            message: result.message,
            cart_key: snapshot.cart_key,
            items: snapshot.items,
            totals: snapshot.totals,
            notices: result.notices,
            content_hash: snapshot.content_hash,
            expires_at: snapshot.expires_at,
            expiring_soon: snapshot.expiring_soon,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Apply one validated command to a cart. Shared by the individual cart
/// handlers and the batch endpoint.
pub async fn apply_command(
    state: &AppState,
    key: &SessionKey,
    command: CartCommand,
) -> Result<CartResponse, ServerError> {
    let result = match command {
        CartCommand::AddItem {
            product_id,
            quantity,
            options,
        } => {
            state
                .facade
                .add_item(key, product_id, quantity, options)
                .await?
        }
        CartCommand::SetQuantity { item_key, quantity } => {
            state.facade.set_quantity(key, &item_key, quantity).await?
        }
        CartCommand::BulkSetQuantity { updates } => {
            state.facade.set_quantities(key, &updates).await?
        }
        CartCommand::RemoveItem { item_key } => state.facade.remove_item(key, &item_key).await?,
        CartCommand::Clear => state.facade.clear(key).await?,
        CartCommand::CalculateTotals => state.facade.recalculate_totals(key).await?,
    };
    Ok(CartResponse::from(result))
}

/// Attach the resolved session key to a JSON response.
pub fn with_cart_key<T: Serialize>(
    key: &SessionKey,
    body: Json<T>,
) -> Result<Response, ServerError> {
    let value = HeaderValue::from_str(key.as_str())
        .map_err(|_| ServerError::Internal("session key not representable as header".to_string()))?;
    let mut response = body.into_response();
    response
        .headers_mut()
        .insert(HeaderName::from_static(CART_KEY_HEADER), value);
    Ok(response)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cart - Current cart snapshot (empty for a fresh key).
pub async fn get_cart_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;
    let snapshot = state.facade.get_cart_or_empty(&resolved.key).await?;
    with_cart_key(&resolved.key, Json(snapshot))
}

/// POST /api/v1/cart/items - Add an item.
pub async fn add_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddItemRequest>,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;
    let response = apply_command(
        &state,
        &resolved.key,
        CartCommand::AddItem {
            product_id: request.product_id,
            quantity: request.quantity,
            options: request.options,
        },
    )
    .await?;
    with_cart_key(&resolved.key, Json(response))
}

/// PUT /api/v1/cart/items/{item_key} - Set one line's quantity.
pub async fn set_quantity_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_key): Path<String>,
    Json(request): Json<SetQuantityRequest>,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;
    let response = apply_command(
        &state,
        &resolved.key,
        CartCommand::SetQuantity {
            item_key,
            quantity: request.quantity,
        },
    )
    .await?;
    with_cart_key(&resolved.key, Json(response))
}

/// PUT /api/v1/cart/items - Best-effort bulk quantity update.
pub async fn bulk_update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<BulkUpdateRequest>,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;
    let response = apply_command(
        &state,
        &resolved.key,
        CartCommand::BulkSetQuantity {
            updates: request.updates,
        },
    )
    .await?;
    with_cart_key(&resolved.key, Json(response))
}

/// DELETE /api/v1/cart/items/{item_key} - Remove one line.
pub async fn remove_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_key): Path<String>,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;
    let response =
        apply_command(&state, &resolved.key, CartCommand::RemoveItem { item_key }).await?;
    with_cart_key(&resolved.key, Json(response))
}

/// DELETE /api/v1/cart - Empty the cart (the key stays valid).
pub async fn clear_cart_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;
    let response = apply_command(&state, &resolved.key, CartCommand::Clear).await?;
    with_cart_key(&resolved.key, Json(response))
}

/// POST /api/v1/cart/calculate - Recompute and persist totals.
pub async fn calculate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let resolved = state.resolve_key(&headers).await?;
    let response = apply_command(&state, &resolved.key, CartCommand::CalculateTotals).await?;
    with_cart_key(&resolved.key, Json(response))
}
