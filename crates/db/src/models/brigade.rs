//! Work crew model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tmc_core::types::{DbId, Timestamp};

/// A row from the `brigades` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brigade {
    pub id: DbId,
    pub name: String,
    pub brigadier: Option<String>,
    pub responsible: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrigade {
    pub name: String,
    pub brigadier: Option<String>,
    pub responsible: Option<String>,
}
