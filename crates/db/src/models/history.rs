//! Item history models (append-only audit trail).
//!
//! History rows have no `updated_at`: they are immutable once written, and
//! the database rejects updates outright.

use serde::Serialize;
use sqlx::FromRow;
use tmc_core::types::{DbId, Timestamp};

/// A row from the `item_history` table, joined with the acting user's
/// username and the location name for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub item_id: DbId,
    /// `None` only for legacy rows written before action tags existed.
    pub action_type: Option<String>,
    pub action: String,
    pub payload: serde_json::Value,
    pub comment: Option<String>,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub location_id: Option<DbId>,
    pub location_name: Option<String>,
    pub timestamp: Timestamp,
}

/// DTO for appending a history entry.
///
/// When `action` is `None` and `action_type` is set, the repository derives
/// the text from the action's template. When both are `None` the entry is
/// stored with empty text.
#[derive(Debug, Clone)]
pub struct CreateHistoryEntry {
    pub item_id: DbId,
    pub action_type: Option<String>,
    pub action: Option<String>,
    /// Already sanitized JSON object.
    pub payload: serde_json::Value,
    pub comment: Option<String>,
    pub user_id: Option<DbId>,
    pub location_id: Option<DbId>,
}

/// The earliest `assigned` entry for an item: who distributed it and where.
#[derive(Debug, Clone, FromRow)]
pub struct FirstAssignment {
    pub history_id: DbId,
    pub location_name: Option<String>,
    pub username: Option<String>,
    pub timestamp: Timestamp,
}

/// A page of history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub items: Vec<HistoryEntry>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}
