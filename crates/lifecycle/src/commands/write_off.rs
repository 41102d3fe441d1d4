//! Write-off and its cancellation.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::history::HistoryEvent;
use tmc_core::status::{validate_transition, validate_write_off, ItemStatus};
use tmc_core::types::DbId;
use tmc_core::write_off::{resolve_write_off, WriteOffInput};
use tmc_db::models::write_off::CreateWriteOffRecord;
use tmc_db::repositories::write_off_repo::ACTIVE_WRITE_OFF_CONSTRAINT;
use tmc_db::repositories::{ItemRepo, LocationRepo, WriteOffRepo};

use super::{ensure_not_locked_by_other, load_for_update, record_transition, require_status};
use crate::error::{CommandError, CommandResult};
use crate::history::EntryContext;

/// Identifiers produced by a successful write-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteOffOutcome {
    pub item_id: DbId,
    pub record_id: DbId,
}

/// Retire an item: `issued|at_work|in_repair -> written_off`, creating the
/// active write-off record in the same transaction.
///
/// An item already written off is a conflict. An active record left behind
/// on an item in any other status is a validation failure.
pub async fn write_off(
    pool: &PgPool,
    item_id: DbId,
    input: &WriteOffInput,
    actor: &Actor,
) -> CommandResult<WriteOffOutcome> {
    let mut tx = pool.begin().await?;
    let item = load_for_update(&mut tx, item_id).await?;
    if let Err(err) = validate_write_off(item.status) {
        if err.is_conflict() {
            tracing::warn!(item_id, actor = %actor, "Write-off rejected: item already written off");
        }
        return Err(err.into());
    }
    ensure_not_locked_by_other(&mut tx, &item, actor).await?;

    if let Some(active) = WriteOffRepo::find_active_for_update(&mut tx, item_id).await? {
        return Err(CoreError::Validation(format!(
            "Item {item_id} already has an active write-off record #{}",
            active.id
        ))
        .into());
    }

    let resolved = resolve_write_off(input, Utc::now().date_naive())?;

    let location_id = match item.location.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Some(LocationRepo::get_or_create(&mut tx, name).await?.id),
        None => None,
    };

    let record = WriteOffRepo::create(
        &mut tx,
        &CreateWriteOffRecord {
            item_id,
            location_id,
            repair_cost: resolved.repair_cost,
            invoice_number: resolved.invoice_number,
            description: resolved.description.clone(),
            date_to_service: resolved.date_to_service,
            date_written_off: resolved.date_written_off,
            created_by: actor.user_id(),
        },
    )
    .await
    .map_err(|err| {
        if tmc_db::is_unique_violation(&err, ACTIVE_WRITE_OFF_CONSTRAINT) {
            tracing::warn!(item_id, actor = %actor, "Concurrent write-off lost the race");
            CommandError::from(CoreError::Conflict("Item already written off".to_string()))
        } else {
            CommandError::from(err)
        }
    })?;

    let updated = ItemRepo::update_status(&mut tx, item_id, ItemStatus::WrittenOff).await?;
    record_transition(
        &mut tx,
        item_id,
        item.status,
        updated.status,
        HistoryEvent::written_off(Some(&resolved.description), Some(resolved.repair_cost)),
        actor,
        EntryContext {
            location: item.location.as_deref(),
            ..Default::default()
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        item_id,
        record_id = record.id,
        actor = %actor,
        from = %item.status,
        cost = %record.repair_cost,
        "Item written off"
    );
    Ok(WriteOffOutcome {
        item_id,
        record_id: record.id,
    })
}

/// Undo a write-off: cancel the active record and return the item to
/// `available`. The cancelled record is kept.
pub async fn cancel_write_off(pool: &PgPool, item_id: DbId, actor: &Actor) -> CommandResult<DbId> {
    let mut tx = pool.begin().await?;
    let item = load_for_update(&mut tx, item_id).await?;
    require_status(&item, "cancel write-off of", &[ItemStatus::WrittenOff])?;
    validate_transition(item.status, ItemStatus::Available)?;
    ensure_not_locked_by_other(&mut tx, &item, actor).await?;

    let active = WriteOffRepo::find_active_for_update(&mut tx, item_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!("Item {item_id} has no active write-off record"))
        })?;
    let cancelled = WriteOffRepo::cancel(&mut tx, active.id)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!("Write-off record #{} is already cancelled", active.id))
        })?;

    let updated = ItemRepo::update_status(&mut tx, item_id, ItemStatus::Available).await?;
    record_transition(
        &mut tx,
        item_id,
        item.status,
        updated.status,
        HistoryEvent::cancelled_write_off(Some(cancelled.id)),
        actor,
        EntryContext {
            location: item.location.as_deref(),
            ..Default::default()
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(item_id, record_id = cancelled.id, actor = %actor, "Write-off cancelled");
    Ok(item_id)
}
