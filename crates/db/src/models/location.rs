use serde::Serialize;
use sqlx::FromRow;
use tmc_core::types::{DbId, Timestamp};

/// A row from the `locations` table. Names are unique.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
