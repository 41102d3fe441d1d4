//! Integration tests for the advisory item lock.

mod common;

use assert_matches::assert_matches;
use common::{history_tags, item_in, new_actor, reload};
use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::status::ItemStatus;
use tmc_lifecycle::commands::{self, ConfirmAction};
use tmc_lifecycle::CommandError;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lock_conflict_scenario(pool: PgPool) {
    let alice = new_actor(&pool, "alice").await;
    let bob = new_actor(&pool, "bob").await;
    let id = item_in(&pool, ItemStatus::Issued).await;

    commands::lock(&pool, id, &alice).await.unwrap();
    let item = reload(&pool, id).await;
    assert_eq!(item.locked_by, alice.user_id());
    assert!(item.locked_at.is_some());

    let err = commands::lock(&pool, id, &bob).await.unwrap_err();
    assert_matches!(err, CommandError::Core(CoreError::Conflict(ref msg)) if msg.contains("alice"));

    let err = commands::unlock(&pool, id, &bob).await.unwrap_err();
    assert_matches!(err, CommandError::Core(CoreError::Conflict(ref msg)) if msg.contains("alice"));
    assert_eq!(reload(&pool, id).await.locked_by, alice.user_id());

    commands::unlock(&pool, id, &alice).await.unwrap();
    let item = reload(&pool, id).await;
    assert!(item.locked_by.is_none());
    assert!(item.locked_at.is_none());

    assert_eq!(history_tags(&pool, id).await, vec!["locked", "unlocked"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_relock_by_holder_refreshes_and_records_entry(pool: PgPool) {
    let alice = new_actor(&pool, "alice").await;
    let id = item_in(&pool, ItemStatus::Issued).await;

    commands::lock(&pool, id, &alice).await.unwrap();
    let first = reload(&pool, id).await.locked_at.unwrap();
    commands::lock(&pool, id, &alice).await.unwrap();
    let second = reload(&pool, id).await.locked_at.unwrap();

    assert!(second >= first);
    assert_eq!(reload(&pool, id).await.locked_by, alice.user_id());
    assert_eq!(history_tags(&pool, id).await, vec!["locked", "locked"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_locked_entry_names_holder(pool: PgPool) {
    let alice = new_actor(&pool, "alice").await;
    let id = item_in(&pool, ItemStatus::Issued).await;

    commands::lock(&pool, id, &alice).await.unwrap();

    let page = tmc_lifecycle::queries::get_history(&pool, id, None, None)
        .await
        .unwrap();
    assert_eq!(page.items[0].action, "Locked: alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlock_of_unlocked_item_is_noop(pool: PgPool) {
    let alice = new_actor(&pool, "alice").await;
    let id = item_in(&pool, ItemStatus::Issued).await;

    commands::unlock(&pool, id, &alice).await.unwrap();
    assert!(history_tags(&pool, id).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_actor_cannot_lock(pool: PgPool) {
    let id = item_in(&pool, ItemStatus::Issued).await;
    let err = commands::lock(&pool, id, &Actor::anonymous("import"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commands_respect_foreign_lock(pool: PgPool) {
    let alice = new_actor(&pool, "alice").await;
    let bob = new_actor(&pool, "bob").await;
    let id = item_in(&pool, ItemStatus::Confirm).await;
    commands::lock(&pool, id, &alice).await.unwrap();

    let err = commands::confirm(&pool, id, ConfirmAction::Accept, &bob)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(reload(&pool, id).await.status, ItemStatus::Confirm);

    commands::confirm(&pool, id, ConfirmAction::Accept, &alice)
        .await
        .unwrap();
    assert_eq!(reload(&pool, id).await.status, ItemStatus::Issued);
}
