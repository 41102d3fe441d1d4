//! Repository for the `write_off_records` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use tmc_core::search::{clamp_limit, clamp_offset, escape_like, DEFAULT_ITEM_LIMIT, MAX_ITEM_LIMIT};
use tmc_core::types::DbId;

use crate::models::write_off::{CreateWriteOffRecord, WriteOffQuery, WriteOffRecord};
use crate::DbTx;

/// Column list for `write_off_records` queries (alias `w`).
const COLUMNS: &str = "w.id, w.item_id, w.location_id, w.repair_cost, w.invoice_number, \
                       w.description, w.date_to_service, w.date_written_off, w.created_by, \
                       w.is_cancelled, w.cancelled_at, w.created_at, w.updated_at";

/// Name of the partial unique index enforcing one active record per item.
pub const ACTIVE_WRITE_OFF_CONSTRAINT: &str = "uq_write_off_records_active_item";

/// Provides create, cancel, and query operations for write-off records.
///
/// Records are never deleted; cancellation is a soft flag.
pub struct WriteOffRepo;

impl WriteOffRepo {
    /// Insert a record inside the caller's transaction.
    ///
    /// Fails with a unique violation on [`ACTIVE_WRITE_OFF_CONSTRAINT`] if the
    /// item already has an active record.
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &CreateWriteOffRecord,
    ) -> Result<WriteOffRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO write_off_records AS w \
                 (item_id, location_id, repair_cost, invoice_number, description, \
                  date_to_service, date_written_off, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WriteOffRecord>(&query)
            .bind(input.item_id)
            .bind(input.location_id)
            .bind(input.repair_cost)
            .bind(&input.invoice_number)
            .bind(&input.description)
            .bind(input.date_to_service)
            .bind(input.date_written_off)
            .bind(input.created_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// The item's active record, row-locked until `tx` ends.
    pub async fn find_active_for_update(
        tx: &mut DbTx<'_>,
        item_id: DbId,
    ) -> Result<Option<WriteOffRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM write_off_records w \
             WHERE w.item_id = $1 AND w.is_cancelled = false \
             FOR UPDATE"
        );
        sqlx::query_as::<_, WriteOffRecord>(&query)
            .bind(item_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Mark a record cancelled. Returns `None` if it was already cancelled.
    pub async fn cancel(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<Option<WriteOffRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE write_off_records AS w SET is_cancelled = true, cancelled_at = NOW() \
             WHERE w.id = $1 AND w.is_cancelled = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WriteOffRecord>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WriteOffRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM write_off_records w WHERE w.id = $1");
        sqlx::query_as::<_, WriteOffRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All records for an item, active and cancelled, newest first.
    pub async fn list_for_item(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Vec<WriteOffRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM write_off_records w \
             WHERE w.item_id = $1 \
             ORDER BY w.created_at DESC, w.id DESC"
        );
        sqlx::query_as::<_, WriteOffRecord>(&query)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    /// Filtered listing, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &WriteOffQuery,
    ) -> Result<Vec<WriteOffRecord>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_ITEM_LIMIT, MAX_ITEM_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx = 1u32;
        let mut bind_values: Vec<BindValue> = Vec::new();

        if let Some(is_cancelled) = params.is_cancelled {
            conditions.push(format!("w.is_cancelled = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Bool(is_cancelled));
        }

        if let Some(location) = params.location.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            conditions.push(format!("l.name ILIKE ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Text(format!("%{}%", escape_like(location))));
        }

        if let Some(date) = params.date_written_off {
            conditions.push(format!("w.date_written_off = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Date(date));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM write_off_records w \
             LEFT JOIN locations l ON l.id = w.location_id \
             {where_clause} \
             ORDER BY w.created_at DESC, w.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, WriteOffRecord>(&query);
        for val in &bind_values {
            match val {
                BindValue::Bool(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Date(v) => q = q.bind(*v),
            }
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }
}

/// Typed bind value for the dynamically-built listing query.
enum BindValue {
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}
