//! Field edits with an optional validated status change.

use serde::Deserialize;
use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::history::HistoryEvent;
use tmc_core::status::{validate_transition, ItemStatus};
use tmc_core::types::DbId;
use tmc_db::models::item::UpdateItemFields;
use tmc_db::repositories::ItemRepo;

use super::{ensure_not_locked_by_other, load_for_update};
use crate::error::CommandResult;
use crate::history::{self, EntryContext};

/// An edit request: plain fields, an optional new status, and an optional
/// service comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    #[serde(flatten)]
    pub fields: UpdateItemFields,
    pub status: Option<ItemStatus>,
    /// History is written only when this is present.
    pub service_comment: Option<String>,
}

/// Apply an edit.
///
/// A status equal to the current one is ignored. Any other status must be a
/// legal transition; entering or leaving `written_off` is reserved for the
/// write-off commands so the write-off record always stays in step.
pub async fn update_item(
    pool: &PgPool,
    item_id: DbId,
    update: &ItemUpdate,
    actor: &Actor,
) -> CommandResult<DbId> {
    validate_fields(&update.fields)?;

    let mut tx = pool.begin().await?;
    let item = load_for_update(&mut tx, item_id).await?;
    ensure_not_locked_by_other(&mut tx, &item, actor).await?;

    let next = update.status.filter(|s| *s != item.status);
    if let Some(next) = next {
        if next == ItemStatus::WrittenOff {
            return Err(CoreError::Validation(
                "Use the write-off command to write off an item".to_string(),
            )
            .into());
        }
        if item.status == ItemStatus::WrittenOff {
            return Err(CoreError::Validation(
                "Cancel the write-off to return a written-off item to service".to_string(),
            )
            .into());
        }
        validate_transition(item.status, next)?;
    }

    let mut updated = ItemRepo::update_fields(&mut tx, item_id, &update.fields).await?;
    if let Some(next) = next {
        updated = ItemRepo::update_status(&mut tx, item_id, next).await?;
    }

    let comment = update
        .service_comment
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(comment) = comment {
        let ctx = EntryContext {
            comment: Some(comment),
            location: updated.location.as_deref(),
        };
        history::append(&mut tx, item_id, HistoryEvent::updated(comment), actor, ctx).await?;
        if next.is_some() {
            history::append(
                &mut tx,
                item_id,
                HistoryEvent::status_changed(item.status, updated.status),
                actor,
                EntryContext::default(),
            )
            .await?;
        }
    }

    tx.commit().await?;

    tracing::info!(
        item_id,
        actor = %actor,
        status_changed = next.is_some(),
        recorded = comment.is_some(),
        "Item updated"
    );
    Ok(item_id)
}

fn validate_fields(fields: &UpdateItemFields) -> Result<(), CoreError> {
    if fields.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(CoreError::Validation("Item name must not be empty".to_string()));
    }
    if let Some(qty) = fields.qty.filter(|q| *q < 1) {
        return Err(CoreError::Validation(format!("Quantity must be at least 1 (got {qty})")));
    }
    Ok(())
}
