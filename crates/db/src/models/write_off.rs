//! Write-off record models and DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tmc_core::types::{DbId, Timestamp};

/// A row from the `write_off_records` table.
///
/// At most one row per item has `is_cancelled = false`. Cancelled rows are
/// kept forever.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WriteOffRecord {
    pub id: DbId,
    pub item_id: DbId,
    pub location_id: Option<DbId>,
    pub repair_cost: Decimal,
    pub invoice_number: String,
    pub description: String,
    pub date_to_service: NaiveDate,
    pub date_written_off: NaiveDate,
    pub created_by: Option<DbId>,
    pub is_cancelled: bool,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a write-off record.
#[derive(Debug, Clone)]
pub struct CreateWriteOffRecord {
    pub item_id: DbId,
    pub location_id: Option<DbId>,
    pub repair_cost: Decimal,
    pub invoice_number: String,
    pub description: String,
    pub date_to_service: NaiveDate,
    pub date_written_off: NaiveDate,
    pub created_by: Option<DbId>,
}

/// Filter for write-off listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteOffQuery {
    pub is_cancelled: Option<bool>,
    /// Case-insensitive substring of the location name.
    pub location: Option<String>,
    pub date_written_off: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
