//! Item intake and distribution: create, assign to a location, issue to a
//! brigade.

use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::history::HistoryEvent;
use tmc_core::status::ItemStatus;
use tmc_core::types::DbId;
use tmc_db::models::item::CreateItem;
use tmc_db::repositories::{BrigadeRepo, ItemRepo};

use super::{begin_transition, record_transition};
use crate::error::CommandResult;
use crate::history::{self, EntryContext};

/// Statuses an item may enter the system with.
const INTAKE_STATUSES: &[ItemStatus] = &[ItemStatus::Created, ItemStatus::Available];

/// Register a new item. Status defaults to `available`.
pub async fn create_item(pool: &PgPool, input: &CreateItem, actor: &Actor) -> CommandResult<DbId> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Item name must not be empty".to_string()).into());
    }
    if let Some(qty) = input.qty.filter(|q| *q < 1) {
        return Err(CoreError::Validation(format!("Quantity must be at least 1 (got {qty})")).into());
    }
    if let Some(status) = input.status.filter(|s| !INTAKE_STATUSES.contains(s)) {
        return Err(CoreError::Validation(format!(
            "New items must start as 'created' or 'available', not '{status}'"
        ))
        .into());
    }

    let item = ItemRepo::create(pool, input).await?;

    tracing::info!(item_id = item.id, status = %item.status, actor = %actor, "Item created");
    Ok(item.id)
}

/// Send an item to a location for acceptance: `available|issued -> confirm`.
///
/// The `assigned` entry written here is what a later rejection reads back.
pub async fn assign_item(
    pool: &PgPool,
    item_id: DbId,
    location: &str,
    responsible: Option<&str>,
    actor: &Actor,
) -> CommandResult<DbId> {
    let location = location.trim();
    if location.is_empty() {
        return Err(CoreError::Validation("Location must not be empty".to_string()).into());
    }
    let responsible = responsible.map(str::trim).filter(|s| !s.is_empty());

    let mut tx = pool.begin().await?;
    let item = begin_transition(
        &mut tx,
        item_id,
        "assign",
        &[ItemStatus::Available, ItemStatus::Issued],
        ItemStatus::Confirm,
        actor,
    )
    .await?;

    let updated =
        ItemRepo::update_custody(&mut tx, item_id, ItemStatus::Confirm, responsible, Some(location))
            .await?;
    record_transition(
        &mut tx,
        item_id,
        item.status,
        updated.status,
        HistoryEvent::assigned(),
        actor,
        EntryContext {
            location: Some(location),
            ..Default::default()
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(item_id, location, actor = %actor, from = %item.status, "Item assigned");
    Ok(item_id)
}

/// Hand an item to a work crew: `available|confirm -> at_work`.
pub async fn issue_to_brigade(
    pool: &PgPool,
    item_id: DbId,
    brigade_id: DbId,
    actor: &Actor,
) -> CommandResult<DbId> {
    let mut tx = pool.begin().await?;
    let item = begin_transition(
        &mut tx,
        item_id,
        "issue",
        &[ItemStatus::Available, ItemStatus::Confirm],
        ItemStatus::AtWork,
        actor,
    )
    .await?;

    let brigade = BrigadeRepo::find_by_id(&mut tx, brigade_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Brigade",
            id: brigade_id,
        })?;

    let updated =
        ItemRepo::update_brigade(&mut tx, item_id, ItemStatus::AtWork, Some(brigade.id)).await?;
    history::append(
        &mut tx,
        item_id,
        HistoryEvent::status_changed(item.status, updated.status),
        actor,
        EntryContext {
            comment: Some(&brigade.name),
            location: item.location.as_deref(),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(item_id, brigade_id, actor = %actor, "Item issued to brigade");
    Ok(item_id)
}
