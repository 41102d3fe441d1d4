//! Advisory item lock.

use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::history::HistoryEvent;
use tmc_core::lock::{decide_acquire, decide_release, lock_conflict, AcquireDecision, ReleaseDecision};
use tmc_core::types::DbId;
use tmc_db::repositories::ItemRepo;

use super::{holder_name, load_for_update};
use crate::error::CommandResult;
use crate::history::{self, EntryContext};

/// Take the lock for `actor`. Re-locking by the holder refreshes `locked_at`;
/// every successful acquire appends a `locked` entry.
pub async fn lock(pool: &PgPool, item_id: DbId, actor: &Actor) -> CommandResult<DbId> {
    let user_id = actor.require_user_id()?;

    let mut tx = pool.begin().await?;
    let item = load_for_update(&mut tx, item_id).await?;

    let refreshed = match decide_acquire(item.lock_state()?, user_id) {
        AcquireDecision::Acquire => false,
        AcquireDecision::Refresh => true,
        AcquireDecision::Conflict { holder } => {
            let name = holder_name(&mut tx, holder).await?;
            tracing::warn!(item_id, user_id, holder, "Lock refused: held by another user");
            return Err(lock_conflict(&name).into());
        }
    };

    ItemRepo::set_lock(&mut tx, item_id, Some(user_id)).await?;
    history::append(
        &mut tx,
        item_id,
        HistoryEvent::locked(actor.display_name()),
        actor,
        EntryContext::default(),
    )
    .await?;
    tracing::info!(item_id, user_id, refreshed, "Item locked");

    tx.commit().await?;
    Ok(item_id)
}

/// Release the lock. Only the holder may release it; releasing an unlocked
/// item is a no-op.
pub async fn unlock(pool: &PgPool, item_id: DbId, actor: &Actor) -> CommandResult<DbId> {
    let user_id = actor.require_user_id()?;

    let mut tx = pool.begin().await?;
    let item = load_for_update(&mut tx, item_id).await?;

    match decide_release(item.lock_state()?, user_id) {
        ReleaseDecision::Release => {
            ItemRepo::set_lock(&mut tx, item_id, None).await?;
            history::append(
                &mut tx,
                item_id,
                HistoryEvent::unlocked(),
                actor,
                EntryContext::default(),
            )
            .await?;
            tracing::info!(item_id, user_id, "Item unlocked");
        }
        ReleaseDecision::AlreadyUnlocked => {
            tracing::debug!(item_id, user_id, "Unlock requested on unlocked item");
        }
        ReleaseDecision::Conflict { holder } => {
            let name = holder_name(&mut tx, holder).await?;
            tracing::warn!(item_id, user_id, holder, "Unlock refused: held by another user");
            return Err(lock_conflict(&name).into());
        }
    }

    tx.commit().await?;
    Ok(item_id)
}
