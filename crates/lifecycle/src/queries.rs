//! Item read model. Plain pool reads, no row locks.

use sqlx::PgPool;
use tmc_core::error::CoreError;
use tmc_core::search::{
    clamp_limit, clamp_offset, DEFAULT_HISTORY_LIMIT, DEFAULT_ITEM_LIMIT, MAX_HISTORY_LIMIT,
    MAX_ITEM_LIMIT,
};
use tmc_core::status::ItemStatus;
use tmc_core::types::DbId;
use tmc_db::models::history::HistoryPage;
use tmc_db::models::item::{Item, ItemListQuery, ItemPage, StatusCounters};
use tmc_db::models::write_off::{WriteOffQuery, WriteOffRecord};
use tmc_db::repositories::{HistoryRepo, ItemRepo, WriteOffRepo};

use crate::error::CommandResult;

pub async fn get_item(pool: &PgPool, item_id: DbId) -> CommandResult<Item> {
    ItemRepo::find_by_id(pool, item_id)
        .await?
        .ok_or_else(|| CoreError::item_not_found(item_id).into())
}

/// Items matching `query`, newest first, with the unpaged total.
pub async fn list_items(pool: &PgPool, query: &ItemListQuery) -> CommandResult<ItemPage> {
    let items = ItemRepo::list(pool, query).await?;
    let total_count = ItemRepo::count(pool, query).await?;

    tracing::debug!(
        search = query.search.as_deref(),
        returned = items.len(),
        total_count,
        "Listed items"
    );
    Ok(ItemPage {
        items,
        total_count,
        limit: clamp_limit(query.limit, DEFAULT_ITEM_LIMIT, MAX_ITEM_LIMIT),
        offset: clamp_offset(query.offset),
    })
}

/// Items waiting for acceptance, optionally at one location.
pub async fn list_items_for_confirm(
    pool: &PgPool,
    location: Option<&str>,
) -> CommandResult<Vec<Item>> {
    let location = location.map(str::trim).filter(|s| !s.is_empty());
    Ok(ItemRepo::list_by_status(pool, ItemStatus::Confirm, location).await?)
}

/// One page of an item's history, newest first.
pub async fn get_history(
    pool: &PgPool,
    item_id: DbId,
    limit: Option<i64>,
    offset: Option<i64>,
) -> CommandResult<HistoryPage> {
    if ItemRepo::find_by_id(pool, item_id).await?.is_none() {
        return Err(CoreError::item_not_found(item_id).into());
    }

    let limit = clamp_limit(limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);
    let offset = clamp_offset(offset);
    let items = HistoryRepo::list_for_item(pool, item_id, limit, offset).await?;
    let total_count = HistoryRepo::count_for_item(pool, item_id).await?;

    Ok(HistoryPage {
        items,
        total_count,
        limit,
        offset,
    })
}

pub async fn status_counters(pool: &PgPool) -> CommandResult<StatusCounters> {
    Ok(ItemRepo::status_counters(pool).await?)
}

pub async fn list_write_offs(
    pool: &PgPool,
    query: &WriteOffQuery,
) -> CommandResult<Vec<WriteOffRecord>> {
    Ok(WriteOffRepo::list(pool, query).await?)
}

pub async fn get_write_off(pool: &PgPool, id: DbId) -> CommandResult<WriteOffRecord> {
    WriteOffRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        CoreError::NotFound {
            entity: "WriteOffRecord",
            id,
        }
        .into()
    })
}
