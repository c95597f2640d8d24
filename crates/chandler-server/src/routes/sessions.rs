//! Session administration endpoints.
//!
//! These routes address sessions by explicit key (path parameter) rather
//! than the cart-key header: they serve support tooling, checkout
//! conversion, and the external sweep scheduler.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chandler_cart::CartSnapshot;
use chandler_session::SessionStore;
use chandler_types::{DeleteReason, SessionKey};

use crate::error::ServerError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Summary info for a live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session key.
    pub cart_key: SessionKey,
    /// Number of distinct line items.
    pub item_lines: usize,
    /// Staleness probe over the contents.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True when the session expires within the warning window.
    pub expiring_soon: bool,
}

/// Response for list sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
}

/// Query parameters for deleting a session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteSessionParams {
    /// `explicit` (default) or `converted` (cart became an order).
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response for the sweep trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    /// Number of expired sessions removed.
    pub removed: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions - List live sessions.
pub async fn list_sessions_handler(
    State(state): State<AppState>,
) -> Result<Json<ListSessionsResponse>, ServerError> {
    let now = Utc::now();
    let window = state.session_config.expiring_soon_window;

    let mut summaries: Vec<SessionSummary> = state
        .store
        .list()
        .await?
        .iter()
        .map(|record| SessionSummary {
            cart_key: record.key.clone(),
            item_lines: record.contents.len(),
            content_hash: record.content_hash.clone(),
            created_at: record.created_at,
            last_activity_at: record.last_activity_at,
            expires_at: record.expires_at,
            expiring_soon: record.is_expiring_soon(now, window),
        })
        .collect();

    // Most recently active first.
    summaries.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));

    let total = summaries.len();
    Ok(Json(ListSessionsResponse {
        sessions: summaries,
        total,
    }))
}

/// GET /api/v1/sessions/{key} - One session's snapshot.
pub async fn get_session_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CartSnapshot>, ServerError> {
    let snapshot = state.facade.get_cart(&SessionKey::new(key)).await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/{key} - Drop a session record.
///
/// `?reason=converted` marks a checkout conversion; the default is an
/// explicit removal.
pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<DeleteSessionParams>,
) -> Result<StatusCode, ServerError> {
    let reason = match params.reason.as_deref() {
        None | Some("explicit") => DeleteReason::Explicit,
        Some("converted") => DeleteReason::Converted,
        Some(other) => {
            return Err(ServerError::BadRequest(format!(
                "Unknown delete reason: {}",
                other
            )));
        }
    };

    let key = SessionKey::new(key);
    if state.store.delete(&key, reason).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("Session {} not found", key)))
    }
}

/// POST /api/v1/sessions/sweep - External scheduler trigger.
pub async fn sweep_sessions_handler(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, ServerError> {
    let removed = state.store.sweep_expired().await?;
    Ok(Json(SweepResponse { removed }))
}
