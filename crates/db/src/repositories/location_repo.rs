//! Repository for the `locations` table.

use sqlx::PgPool;

use crate::models::location::Location;
use crate::DbTx;

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct LocationRepo;

impl LocationRepo {
    /// Return the location named `name`, creating it if needed.
    ///
    /// Uses `INSERT ... ON CONFLICT DO NOTHING` against `uq_locations_name`.
    /// When a concurrent transaction wins the insert, this one waits for it
    /// and then reads the winner's row.
    pub async fn get_or_create(tx: &mut DbTx<'_>, name: &str) -> Result<Location, sqlx::Error> {
        let insert = format!(
            "INSERT INTO locations (name) VALUES ($1) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Location>(&insert)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some(location) = created {
            return Ok(location);
        }

        let select = format!("SELECT {COLUMNS} FROM locations WHERE name = $1");
        sqlx::query_as::<_, Location>(&select)
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE name = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY name");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }
}
