//! Lifecycle commands.
//!
//! All commands share one shape: begin a transaction, read the item
//! `FOR UPDATE`, validate, mutate, append history, commit. Dropping the
//! transaction on an early `?` rolls everything back.

pub mod confirm;
pub mod intake;
pub mod lock;
pub mod service;
pub mod update;
pub mod write_off;

pub use confirm::{confirm, ConfirmAction};
pub use intake::{assign_item, create_item, issue_to_brigade};
pub use lock::{lock, unlock};
pub use service::{confirm_repair, return_from_service, send_to_service};
pub use update::{update_item, ItemUpdate};
pub use write_off::{cancel_write_off, write_off, WriteOffOutcome};

use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::history::HistoryEvent;
use tmc_core::lock::lock_conflict;
use tmc_core::status::{validate_transition, ItemStatus};
use tmc_core::types::DbId;
use tmc_db::models::item::Item;
use tmc_db::repositories::{ItemRepo, UserRepo};
use tmc_db::DbTx;

use crate::error::CommandResult;
use crate::history::{self, EntryContext};

/// Read the item under an exclusive row lock, or fail with `NotFound`.
async fn load_for_update(tx: &mut DbTx<'_>, item_id: DbId) -> CommandResult<Item> {
    ItemRepo::find_for_update(tx, item_id)
        .await?
        .ok_or_else(|| CoreError::item_not_found(item_id).into())
}

/// Fail unless the item is in one of `expected`.
fn require_status(item: &Item, operation: &str, expected: &[ItemStatus]) -> Result<(), CoreError> {
    if expected.contains(&item.status) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Cannot {operation} item in status '{}'. Expected one of: {:?}",
        item.status,
        expected.iter().map(|s| s.as_str()).collect::<Vec<_>>()
    )))
}

/// Reject the command while a different user holds the advisory lock.
async fn ensure_not_locked_by_other(
    tx: &mut DbTx<'_>,
    item: &Item,
    actor: &Actor,
) -> CommandResult<()> {
    match item.lock_state()?.holder() {
        Some(holder) if Some(holder) != actor.user_id() => {
            let name = holder_name(tx, holder).await?;
            tracing::warn!(item_id = item.id, holder, actor = %actor, "Item is locked by another user");
            Err(lock_conflict(&name).into())
        }
        _ => Ok(()),
    }
}

/// Username of a lock holder, falling back to `#id` for deleted users.
async fn holder_name(tx: &mut DbTx<'_>, holder: DbId) -> CommandResult<String> {
    Ok(UserRepo::find_username(tx, holder)
        .await?
        .unwrap_or_else(|| format!("#{holder}")))
}

/// Append the command's own event followed by `status_changed`.
async fn record_transition(
    tx: &mut DbTx<'_>,
    item_id: DbId,
    from: ItemStatus,
    to: ItemStatus,
    event: HistoryEvent,
    actor: &Actor,
    ctx: EntryContext<'_>,
) -> CommandResult<()> {
    history::append(tx, item_id, event, actor, ctx).await?;
    history::append(
        tx,
        item_id,
        HistoryEvent::status_changed(from, to),
        actor,
        EntryContext::default(),
    )
    .await?;
    Ok(())
}

/// Precondition check, transition check, then the shared lock guard.
async fn begin_transition(
    tx: &mut DbTx<'_>,
    item_id: DbId,
    operation: &str,
    expected: &[ItemStatus],
    next: ItemStatus,
    actor: &Actor,
) -> CommandResult<Item> {
    let item = load_for_update(tx, item_id).await?;
    require_status(&item, operation, expected)?;
    validate_transition(item.status, next)?;
    ensure_not_locked_by_other(tx, &item, actor).await?;
    Ok(item)
}
