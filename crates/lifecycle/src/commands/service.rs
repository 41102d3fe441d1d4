//! Repair flow: send to service, confirm repair start, return from service.

use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::history::HistoryEvent;
use tmc_core::status::ItemStatus;
use tmc_core::types::DbId;
use tmc_db::repositories::ItemRepo;

use super::{begin_transition, record_transition};
use crate::error::CommandResult;
use crate::history::EntryContext;

/// `issued|at_work -> confirm_repair`. Clears any brigade assignment.
pub async fn send_to_service(
    pool: &PgPool,
    item_id: DbId,
    reason: &str,
    actor: &Actor,
) -> CommandResult<DbId> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(CoreError::Validation("Service reason must not be empty".to_string()).into());
    }

    let mut tx = pool.begin().await?;
    let item = begin_transition(
        &mut tx,
        item_id,
        "send to service",
        &[ItemStatus::Issued, ItemStatus::AtWork],
        ItemStatus::ConfirmRepair,
        actor,
    )
    .await?;

    let updated = ItemRepo::update_brigade(&mut tx, item_id, ItemStatus::ConfirmRepair, None).await?;
    record_transition(
        &mut tx,
        item_id,
        item.status,
        updated.status,
        HistoryEvent::sent_to_service(reason),
        actor,
        EntryContext {
            location: item.location.as_deref(),
            ..Default::default()
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(item_id, actor = %actor, from = %item.status, "Item sent to service");
    Ok(item_id)
}

/// `confirm_repair -> in_repair`.
pub async fn confirm_repair(pool: &PgPool, item_id: DbId, actor: &Actor) -> CommandResult<DbId> {
    simple_transition(
        pool,
        item_id,
        actor,
        "confirm repair of",
        ItemStatus::ConfirmRepair,
        ItemStatus::InRepair,
        HistoryEvent::repair_confirmed(),
    )
    .await
}

/// `in_repair -> issued`.
pub async fn return_from_service(
    pool: &PgPool,
    item_id: DbId,
    actor: &Actor,
) -> CommandResult<DbId> {
    simple_transition(
        pool,
        item_id,
        actor,
        "return from service",
        ItemStatus::InRepair,
        ItemStatus::Issued,
        HistoryEvent::returned_from_service(),
    )
    .await
}

/// A status-only move from exactly one source status.
async fn simple_transition(
    pool: &PgPool,
    item_id: DbId,
    actor: &Actor,
    operation: &str,
    from: ItemStatus,
    to: ItemStatus,
    event: HistoryEvent,
) -> CommandResult<DbId> {
    let mut tx = pool.begin().await?;
    let item = begin_transition(&mut tx, item_id, operation, &[from], to, actor).await?;

    let updated = ItemRepo::update_status(&mut tx, item_id, to).await?;
    let action = event.action;
    record_transition(
        &mut tx,
        item_id,
        item.status,
        updated.status,
        event,
        actor,
        EntryContext {
            location: item.location.as_deref(),
            ..Default::default()
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(item_id, actor = %actor, action = %action, from = %from, to = %to, "Item status changed");
    Ok(item_id)
}
