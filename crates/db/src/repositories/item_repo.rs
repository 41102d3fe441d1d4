//! Repository for the `items` table.

use sqlx::PgPool;
use tmc_core::search::{
    clamp_limit, clamp_offset, escape_like, normalize_search, DEFAULT_ITEM_LIMIT, MAX_ITEM_LIMIT,
};
use tmc_core::status::ItemStatus;
use tmc_core::types::DbId;

use crate::models::item::{CreateItem, Item, ItemListQuery, StatusCounters, UpdateItemFields};
use crate::DbTx;

/// Column list for `items` queries.
const COLUMNS: &str = "id, name, serial, brand, status, responsible, location, qty, \
                       brigade_id, locked_by, locked_at, created_at, updated_at";

/// Provides CRUD and row-locking operations for inventory items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item. Status defaults to `available`, quantity to 1.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (name, serial, brand, status, responsible, location, qty) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 1)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.name)
            .bind(&input.serial)
            .bind(&input.brand)
            .bind(input.status.unwrap_or(ItemStatus::Available).as_str())
            .bind(&input.responsible)
            .bind(&input.location)
            .bind(input.qty)
            .fetch_one(pool)
            .await
    }

    /// Find an item by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Read an item and hold an exclusive row lock until `tx` ends.
    ///
    /// Concurrent callers for the same id queue here until the holder
    /// commits or rolls back, then see the committed row.
    pub async fn find_for_update(tx: &mut DbTx<'_>, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set the status only.
    pub async fn update_status(
        tx: &mut DbTx<'_>,
        id: DbId,
        status: ItemStatus,
    ) -> Result<Item, sqlx::Error> {
        let query = format!("UPDATE items SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Set status together with custodian and location.
    ///
    /// `None` for `responsible` or `location` leaves that column unchanged.
    pub async fn update_custody(
        tx: &mut DbTx<'_>,
        id: DbId,
        status: ItemStatus,
        responsible: Option<&str>,
        location: Option<&str>,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "UPDATE items SET status = $2, \
                 responsible = COALESCE($3, responsible), \
                 location = COALESCE($4, location) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(responsible)
            .bind(location)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set status and brigade. `None` clears the brigade assignment.
    pub async fn update_brigade(
        tx: &mut DbTx<'_>,
        id: DbId,
        status: ItemStatus,
        brigade_id: Option<DbId>,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "UPDATE items SET status = $2, brigade_id = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(brigade_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Apply plain field edits. Only non-`None` fields are written.
    pub async fn update_fields(
        tx: &mut DbTx<'_>,
        id: DbId,
        fields: &UpdateItemFields,
    ) -> Result<Item, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_idx = 2u32; // $1 is id
        let mut bind_values: Vec<BindValue> = Vec::new();

        let text_fields = [
            ("name", &fields.name),
            ("serial", &fields.serial),
            ("brand", &fields.brand),
            ("responsible", &fields.responsible),
            ("location", &fields.location),
        ];
        for (column, value) in text_fields {
            if let Some(v) = value {
                sets.push(format!("{column} = ${bind_idx}"));
                bind_idx += 1;
                bind_values.push(BindValue::Text(v.clone()));
            }
        }

        if let Some(qty) = fields.qty {
            sets.push(format!("qty = ${bind_idx}"));
            bind_values.push(BindValue::Int(qty));
        }

        if sets.is_empty() {
            let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
            return sqlx::query_as::<_, Item>(&query)
                .bind(id)
                .fetch_one(&mut **tx)
                .await;
        }

        let query = format!(
            "UPDATE items SET {} WHERE id = $1 RETURNING {COLUMNS}",
            sets.join(", ")
        );
        let mut q = sqlx::query_as::<_, Item>(&query).bind(id);
        for val in &bind_values {
            match val {
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Int(v) => q = q.bind(*v),
            }
        }
        q.fetch_one(&mut **tx).await
    }

    /// Set or clear the advisory lock columns.
    ///
    /// `Some(user_id)` stamps `locked_at = NOW()`; `None` clears both.
    pub async fn set_lock(
        tx: &mut DbTx<'_>,
        id: DbId,
        locked_by: Option<DbId>,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "UPDATE items SET locked_by = $2, \
                 locked_at = CASE WHEN $2::BIGINT IS NULL THEN NULL ELSE NOW() END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(locked_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// List items, newest first.
    ///
    /// `search` matches a case-insensitive name substring or an exact status
    /// tag. `status` filters on top of that.
    pub async fn list(pool: &PgPool, params: &ItemListQuery) -> Result<Vec<Item>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_ITEM_LIMIT, MAX_ITEM_LIMIT);
        let offset = clamp_offset(params.offset);

        let (where_clause, bind_values, bind_idx) = build_item_filter(params);
        let query = format!(
            "SELECT {COLUMNS} FROM items {where_clause} \
             ORDER BY id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, Item>(&query);
        for val in &bind_values {
            match val {
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Int(v) => q = q.bind(*v),
            }
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count items matching the same filter as [`ItemRepo::list`].
    pub async fn count(pool: &PgPool, params: &ItemListQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_item_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM items {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            match val {
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Int(v) => q = q.bind(*v),
            }
        }
        q.fetch_one(pool).await
    }

    /// Items in one status, optionally at one location, newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: ItemStatus,
        location: Option<&str>,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items \
             WHERE status = $1 AND ($2::TEXT IS NULL OR location = $2) \
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(status.as_str())
            .bind(location)
            .fetch_all(pool)
            .await
    }

    /// Item count per status, zero-filled, with summary buckets.
    pub async fn status_counters(pool: &PgPool) -> Result<StatusCounters, sqlx::Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*)::BIGINT FROM items GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await?;

        let parsed = rows
            .into_iter()
            .map(|(status, count)| {
                status
                    .parse::<ItemStatus>()
                    .map(|s| (s, count))
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StatusCounters::from_counts(&parsed))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built item queries.
enum BindValue {
    Text(String),
    Int(i32),
}

/// Build a WHERE clause and bind values from `ItemListQuery`.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_item_filter(params: &ItemListQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(term) = normalize_search(params.search.as_deref()) {
        conditions.push(format!(
            "(name ILIKE ${} ESCAPE '\\' OR status = ${})",
            bind_idx,
            bind_idx + 1
        ));
        bind_idx += 2;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(&term))));
        bind_values.push(BindValue::Text(term));
    }

    if let Some(status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.as_str().to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}
