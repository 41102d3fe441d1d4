//! Integration tests for the repository layer against a real database.
//!
//! - Item create/list/search/counters
//! - History append, ordering, first-assignment lookup, immutability
//! - Location get-or-create deduplication
//! - Write-off partial unique index and soft cancel

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use tmc_core::history::HistoryAction;
use tmc_core::status::ItemStatus;
use tmc_db::models::brigade::CreateBrigade;
use tmc_db::models::history::CreateHistoryEntry;
use tmc_db::models::item::{CreateItem, ItemListQuery, UpdateItemFields};
use tmc_db::models::user::CreateUser;
use tmc_db::models::write_off::{CreateWriteOffRecord, WriteOffQuery};
use tmc_db::repositories::{
    BrigadeRepo, HistoryRepo, ItemRepo, LocationRepo, UserRepo, WriteOffRepo,
};
use tmc_db::repositories::write_off_repo::ACTIVE_WRITE_OFF_CONSTRAINT;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_item(name: &str, status: ItemStatus) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        serial: None,
        brand: None,
        status: Some(status),
        responsible: None,
        location: Some("Main depot".to_string()),
        qty: None,
    }
}

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        full_name: None,
    }
}

fn history(item_id: i64, action: HistoryAction, payload: serde_json::Value) -> CreateHistoryEntry {
    CreateHistoryEntry {
        item_id,
        action_type: Some(action.as_str().to_string()),
        action: None,
        payload,
        comment: None,
        user_id: None,
        location_id: None,
    }
}

fn new_write_off(item_id: i64) -> CreateWriteOffRecord {
    let date = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
    CreateWriteOffRecord {
        item_id,
        location_id: None,
        repair_cost: Decimal::new(150000, 2),
        invoice_number: "INV-001".to_string(),
        description: "Motor burnt out".to_string(),
        date_to_service: date,
        date_written_off: date,
        created_by: None,
    }
}

// ---------------------------------------------------------------------------
// Test: Items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_item_defaults(pool: PgPool) {
    let mut input = new_item("Drill", ItemStatus::Available);
    input.status = None;
    let item = ItemRepo::create(&pool, &input).await.unwrap();

    assert_eq!(item.status, ItemStatus::Available);
    assert_eq!(item.qty, 1);
    assert!(item.locked_by.is_none());
    assert!(item.locked_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_qty_must_be_positive(pool: PgPool) {
    let mut input = new_item("Ladder", ItemStatus::Available);
    input.qty = Some(0);
    assert!(ItemRepo::create(&pool, &input).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_status_rejected_by_schema(pool: PgPool) {
    let result = sqlx::query("INSERT INTO items (name, status) VALUES ('x', 'lost')")
        .execute(&pool)
        .await;
    assert!(result.is_err(), "CHECK constraint should reject unknown status");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lock_columns_must_be_set_together(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Saw", ItemStatus::Available))
        .await
        .unwrap();
    let result = sqlx::query("UPDATE items SET locked_at = NOW() WHERE id = $1")
        .bind(item.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "locked_at without locked_by must be rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_newest_first_and_search(pool: PgPool) {
    let a = ItemRepo::create(&pool, &new_item("Hammer drill", ItemStatus::Available))
        .await
        .unwrap();
    let b = ItemRepo::create(&pool, &new_item("Angle grinder", ItemStatus::Issued))
        .await
        .unwrap();
    let c = ItemRepo::create(&pool, &new_item("Cordless DRILL", ItemStatus::Created))
        .await
        .unwrap();

    let all = ItemRepo::list(&pool, &ItemListQuery::default()).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);

    let by_name = ItemRepo::list(
        &pool,
        &ItemListQuery {
            search: Some("drill".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.iter().map(|i| i.id).collect::<Vec<_>>(), vec![c.id, a.id]);

    let by_status = ItemListQuery {
        search: Some("issued".into()),
        ..Default::default()
    };
    let found = ItemRepo::list(&pool, &by_status).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, b.id);
    assert_eq!(ItemRepo::count(&pool, &by_status).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    ItemRepo::create(&pool, &new_item("Cable 100%", ItemStatus::Available))
        .await
        .unwrap();
    ItemRepo::create(&pool, &new_item("Cable 1000", ItemStatus::Available))
        .await
        .unwrap();

    let found = ItemRepo::list(
        &pool,
        &ItemListQuery {
            search: Some("100%".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Cable 100%");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_counters(pool: PgPool) {
    for status in [
        ItemStatus::Issued,
        ItemStatus::Issued,
        ItemStatus::AtWork,
        ItemStatus::Confirm,
        ItemStatus::ConfirmRepair,
    ] {
        ItemRepo::create(&pool, &new_item("Thing", status)).await.unwrap();
    }

    let counters = ItemRepo::status_counters(&pool).await.unwrap();
    assert_eq!(counters.by_status["issued"], 2);
    assert_eq!(counters.by_status["available"], 0);
    assert_eq!(counters.issued, 3);
    assert_eq!(counters.to_receive, 1);
    assert_eq!(counters.to_repair, 1);
    assert_eq!(counters.total, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_fields_writes_only_given_columns(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Generator", ItemStatus::Available))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let updated = ItemRepo::update_fields(
        &mut tx,
        item.id,
        &UpdateItemFields {
            brand: Some("Honda".into()),
            qty: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(updated.brand.as_deref(), Some("Honda"));
    assert_eq!(updated.qty, 2);
    assert_eq!(updated.name, "Generator");
    assert_eq!(updated.location.as_deref(), Some("Main depot"));
}

// ---------------------------------------------------------------------------
// Test: History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_append_renders_action_text(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Pump", ItemStatus::Issued))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let entry = HistoryRepo::append(
        &mut tx,
        &history(item.id, HistoryAction::SentToService, json!({ "reason": "Leaking" })),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        entry.action,
        "Sent to service. Reason: Leaking. Awaiting confirmation."
    );
    assert_eq!(entry.payload, json!({ "reason": "Leaking" }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_explicit_action_text_is_kept(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Pump", ItemStatus::Issued))
        .await
        .unwrap();

    let mut input = history(item.id, HistoryAction::Unlocked, json!({}));
    input.action = Some("Manual note".to_string());

    let mut tx = pool.begin().await.unwrap();
    let entry = HistoryRepo::append(&mut tx, &input).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(entry.action, "Manual note");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_newest_first(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Welder", ItemStatus::Issued))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    for action in [
        HistoryAction::Assigned,
        HistoryAction::Accepted,
        HistoryAction::RepairConfirmed,
    ] {
        HistoryRepo::append(&mut tx, &history(item.id, action, json!({})))
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();

    let entries = HistoryRepo::list_for_item(&pool, item.id, 10, 0).await.unwrap();
    let tags: Vec<_> = entries
        .iter()
        .map(|e| e.action_type.clone().unwrap())
        .collect();
    assert_eq!(tags, vec!["repair_confirmed", "accepted", "assigned"]);
    assert_eq!(HistoryRepo::count_for_item(&pool, item.id).await.unwrap(), 3);

    let page = HistoryRepo::list_for_item(&pool, item.id, 1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].action_type.as_deref(), Some("accepted"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_assignment_is_oldest(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Compressor", ItemStatus::Confirm))
        .await
        .unwrap();
    let user = UserRepo::create(&pool, &new_user("storekeeper")).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(HistoryRepo::find_first_assignment(&mut tx, item.id)
        .await
        .unwrap()
        .is_none());

    let site_a = LocationRepo::get_or_create(&mut tx, "Site A").await.unwrap();
    let site_b = LocationRepo::get_or_create(&mut tx, "Site B").await.unwrap();
    for location_id in [site_a.id, site_b.id] {
        let mut input = history(item.id, HistoryAction::Assigned, json!({}));
        input.user_id = Some(user.id);
        input.location_id = Some(location_id);
        HistoryRepo::append(&mut tx, &input).await.unwrap();
    }

    let first = HistoryRepo::find_first_assignment(&mut tx, item.id)
        .await
        .unwrap()
        .expect("assignment should exist");
    tx.commit().await.unwrap();

    assert_eq!(first.location_name.as_deref(), Some("Site A"));
    assert_eq!(first.username.as_deref(), Some("storekeeper"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_rows_are_immutable(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Jack", ItemStatus::Issued))
        .await
        .unwrap();
    let mut tx = pool.begin().await.unwrap();
    let entry = HistoryRepo::append(&mut tx, &history(item.id, HistoryAction::Unlocked, json!({})))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let result = sqlx::query("UPDATE item_history SET action = 'tampered' WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "history rows must reject updates");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_cascades_with_item(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Crate", ItemStatus::Available))
        .await
        .unwrap();
    let mut tx = pool.begin().await.unwrap();
    HistoryRepo::append(&mut tx, &history(item.id, HistoryAction::Assigned, json!({})))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(item.id)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(HistoryRepo::count_for_item(&pool, item.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: Locations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_or_create_location_deduplicates(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let first = LocationRepo::get_or_create(&mut tx, "Yard").await.unwrap();
    let second = LocationRepo::get_or_create(&mut tx, "Yard").await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(LocationRepo::list(&pool).await.unwrap().len(), 1);
    assert!(LocationRepo::find_by_name(&pool, "Yard").await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: Brigades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_brigades_list_by_name(pool: PgPool) {
    for name in ["Zeta crew", "Alpha crew"] {
        BrigadeRepo::create(
            &pool,
            &CreateBrigade {
                name: name.to_string(),
                brigadier: Some("Petrov".to_string()),
                responsible: None,
            },
        )
        .await
        .unwrap();
    }

    let names: Vec<String> = BrigadeRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, ["Alpha crew", "Zeta crew"]);
}

// ---------------------------------------------------------------------------
// Test: Write-off records
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_active_write_off_violates_index(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Mixer", ItemStatus::Issued))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    WriteOffRepo::create(&mut tx, &new_write_off(item.id)).await.unwrap();
    let err = WriteOffRepo::create(&mut tx, &new_write_off(item.id))
        .await
        .unwrap_err();
    assert!(tmc_db::is_unique_violation(&err, ACTIVE_WRITE_OFF_CONSTRAINT));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelled_record_frees_the_slot(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Mixer", ItemStatus::Issued))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let first = WriteOffRepo::create(&mut tx, &new_write_off(item.id)).await.unwrap();
    let cancelled = WriteOffRepo::cancel(&mut tx, first.id).await.unwrap().unwrap();
    assert!(cancelled.is_cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert!(WriteOffRepo::cancel(&mut tx, first.id).await.unwrap().is_none());

    let second = WriteOffRepo::create(&mut tx, &new_write_off(item.id)).await.unwrap();
    let active = WriteOffRepo::find_active_for_update(&mut tx, item.id)
        .await
        .unwrap()
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(active.id, second.id);
    assert_eq!(active.repair_cost, Decimal::new(150000, 2));
    assert_eq!(WriteOffRepo::list_for_item(&pool, item.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_write_off_listing_filters(pool: PgPool) {
    let a = ItemRepo::create(&pool, &new_item("A", ItemStatus::Issued)).await.unwrap();
    let b = ItemRepo::create(&pool, &new_item("B", ItemStatus::Issued)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let north = LocationRepo::get_or_create(&mut tx, "North yard").await.unwrap();
    let mut input = new_write_off(a.id);
    input.location_id = Some(north.id);
    let rec_a = WriteOffRepo::create(&mut tx, &input).await.unwrap();
    let rec_b = WriteOffRepo::create(&mut tx, &new_write_off(b.id)).await.unwrap();
    WriteOffRepo::cancel(&mut tx, rec_b.id).await.unwrap();
    tx.commit().await.unwrap();

    let active = WriteOffRepo::list(
        &pool,
        &WriteOffQuery {
            is_cancelled: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, rec_a.id);

    let by_location = WriteOffRepo::list(
        &pool,
        &WriteOffQuery {
            location: Some("north".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_location.len(), 1);

    let by_date = WriteOffRepo::list(
        &pool,
        &WriteOffQuery {
            date_written_off: NaiveDate::from_ymd_opt(2024, 5, 20),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_date.len(), 2);
    assert_eq!(by_date[0].id, rec_b.id, "newest first");
}
