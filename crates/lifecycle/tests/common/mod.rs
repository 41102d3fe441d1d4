//! Shared fixtures for lifecycle integration tests.

#![allow(dead_code)]

use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::status::ItemStatus;
use tmc_core::types::DbId;
use tmc_db::models::brigade::CreateBrigade;
use tmc_db::models::item::{CreateItem, Item};
use tmc_db::models::user::CreateUser;
use tmc_db::repositories::{BrigadeRepo, HistoryRepo, ItemRepo, UserRepo, WriteOffRepo};

/// Register a user and return the matching actor.
pub async fn new_actor(pool: &PgPool, username: &str) -> Actor {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            full_name: None,
        },
    )
    .await
    .unwrap()
    .to_actor()
}

/// Insert an item directly in `status`, bypassing the intake rules.
pub async fn item_in(pool: &PgPool, status: ItemStatus) -> DbId {
    ItemRepo::create(
        pool,
        &CreateItem {
            name: "Rotary hammer".to_string(),
            serial: Some("RH-0001".to_string()),
            brand: Some("Bosch".to_string()),
            status: Some(status),
            responsible: Some("Warehouse".to_string()),
            location: Some("Central warehouse".to_string()),
            qty: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn new_brigade(pool: &PgPool, name: &str) -> DbId {
    BrigadeRepo::create(
        pool,
        &CreateBrigade {
            name: name.to_string(),
            brigadier: Some("Petrov".to_string()),
            responsible: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn reload(pool: &PgPool, item_id: DbId) -> Item {
    ItemRepo::find_by_id(pool, item_id).await.unwrap().unwrap()
}

/// Action tags for an item, oldest first.
pub async fn history_tags(pool: &PgPool, item_id: DbId) -> Vec<String> {
    let mut entries = HistoryRepo::list_for_item(pool, item_id, 500, 0).await.unwrap();
    entries.reverse();
    entries
        .into_iter()
        .map(|e| e.action_type.unwrap_or_default())
        .collect()
}

pub async fn history_count(pool: &PgPool, item_id: DbId) -> i64 {
    HistoryRepo::count_for_item(pool, item_id).await.unwrap()
}

pub async fn active_write_offs(pool: &PgPool, item_id: DbId) -> usize {
    WriteOffRepo::list_for_item(pool, item_id)
        .await
        .unwrap()
        .iter()
        .filter(|r| !r.is_cancelled)
        .count()
}
