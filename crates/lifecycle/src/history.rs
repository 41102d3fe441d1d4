//! Appending history entries from inside a command transaction.

use tmc_core::actor::Actor;
use tmc_core::history::HistoryEvent;
use tmc_core::payload::sanitize_payload;
use tmc_core::types::DbId;
use tmc_db::models::history::{CreateHistoryEntry, HistoryEntry};
use tmc_db::repositories::{HistoryRepo, LocationRepo};
use tmc_db::DbTx;

/// Optional context attached to a history entry.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct EntryContext<'a> {
    pub comment: Option<&'a str>,
    /// Place name; its `locations` row is created on first use.
    pub location: Option<&'a str>,
}

/// Sanitize the event payload, resolve the location, and insert the entry.
///
/// The display text is rendered by [`HistoryRepo::append`] from the action
/// template.
pub(crate) async fn append(
    tx: &mut DbTx<'_>,
    item_id: DbId,
    event: HistoryEvent,
    actor: &Actor,
    ctx: EntryContext<'_>,
) -> Result<HistoryEntry, sqlx::Error> {
    let location_id = match ctx.location.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Some(LocationRepo::get_or_create(tx, name).await?.id),
        None => None,
    };

    let input = CreateHistoryEntry {
        item_id,
        action_type: Some(event.action.as_str().to_string()),
        action: None,
        payload: sanitize_payload(&event.payload),
        comment: ctx.comment.map(str::to_string),
        user_id: actor.user_id(),
        location_id,
    };
    HistoryRepo::append(tx, &input).await
}
