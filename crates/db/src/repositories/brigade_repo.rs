//! Repository for the `brigades` table.

use sqlx::PgPool;
use tmc_core::types::DbId;

use crate::models::brigade::{Brigade, CreateBrigade};
use crate::DbTx;

const COLUMNS: &str = "id, name, brigadier, responsible, created_at, updated_at";

pub struct BrigadeRepo;

impl BrigadeRepo {
    pub async fn create(pool: &PgPool, input: &CreateBrigade) -> Result<Brigade, sqlx::Error> {
        let query = format!(
            "INSERT INTO brigades (name, brigadier, responsible) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brigade>(&query)
            .bind(&input.name)
            .bind(&input.brigadier)
            .bind(&input.responsible)
            .fetch_one(pool)
            .await
    }

    /// Runs on the caller's transaction.
    pub async fn find_by_id(tx: &mut DbTx<'_>, id: DbId) -> Result<Option<Brigade>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brigades WHERE id = $1");
        sqlx::query_as::<_, Brigade>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Brigade>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brigades ORDER BY name");
        sqlx::query_as::<_, Brigade>(&query).fetch_all(pool).await
    }
}
