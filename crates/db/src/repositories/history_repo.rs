//! Repository for the append-only `item_history` table.

use sqlx::PgPool;
use tmc_core::history::{render, HistoryAction};
use tmc_core::types::DbId;

use crate::models::history::{CreateHistoryEntry, FirstAssignment, HistoryEntry};
use crate::DbTx;

/// Column list for history SELECTs over [`FROM_JOINED`] (alias `h`).
const COLUMNS: &str = "h.id, h.item_id, h.action_type, h.action, h.payload, h.comment, \
                       h.user_id, u.username, h.location_id, l.name AS location_name, \
                       h.timestamp";

/// History joined with display names of the acting user and location.
const FROM_JOINED: &str = "item_history h \
                           LEFT JOIN users u ON u.id = h.user_id \
                           LEFT JOIN locations l ON l.id = h.location_id";

/// Provides append and read operations for item history.
///
/// There is intentionally no update or delete method.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append one entry inside the caller's transaction.
    ///
    /// If `action` is absent and `action_type` is set, the display text is
    /// rendered from the action template against the payload.
    pub async fn append(
        tx: &mut DbTx<'_>,
        input: &CreateHistoryEntry,
    ) -> Result<HistoryEntry, sqlx::Error> {
        let action = match (&input.action, &input.action_type) {
            (Some(text), _) => text.clone(),
            (None, Some(tag)) => render(tag, Some(&input.payload)),
            (None, None) => String::new(),
        };

        let query = format!(
            "WITH h AS ( \
                 INSERT INTO item_history \
                     (item_id, action_type, action, payload, comment, user_id, location_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM h \
             LEFT JOIN users u ON u.id = h.user_id \
             LEFT JOIN locations l ON l.id = h.location_id"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(input.item_id)
            .bind(&input.action_type)
            .bind(&action)
            .bind(&input.payload)
            .bind(&input.comment)
            .bind(input.user_id)
            .bind(input.location_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// A page of an item's history, newest first.
    pub async fn list_for_item(
        pool: &PgPool,
        item_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} \
             WHERE h.item_id = $1 \
             ORDER BY h.timestamp DESC, h.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(item_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of entries for an item.
    pub async fn count_for_item(pool: &PgPool, item_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM item_history WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(pool)
        .await
    }

    /// The oldest `assigned` entry for an item, read inside `tx`.
    pub async fn find_first_assignment(
        tx: &mut DbTx<'_>,
        item_id: DbId,
    ) -> Result<Option<FirstAssignment>, sqlx::Error> {
        sqlx::query_as::<_, FirstAssignment>(
            "SELECT h.id AS history_id, l.name AS location_name, u.username, h.timestamp \
             FROM item_history h \
             LEFT JOIN users u ON u.id = h.user_id \
             LEFT JOIN locations l ON l.id = h.location_id \
             WHERE h.item_id = $1 AND h.action_type = $2 \
             ORDER BY h.timestamp ASC, h.id ASC \
             LIMIT 1",
        )
        .bind(item_id)
        .bind(HistoryAction::Assigned.as_str())
        .fetch_optional(&mut **tx)
        .await
    }
}
