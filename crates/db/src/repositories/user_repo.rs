//! Repository for the `users` table.

use sqlx::PgPool;
use tmc_core::types::DbId;

use crate::models::user::{CreateUser, User};
use crate::DbTx;

const COLUMNS: &str = "id, username, full_name, is_active, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, full_name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.full_name)
            .fetch_one(pool)
            .await
    }

    /// Find an active user by id. Deactivated users cannot act.
    pub async fn find_active_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Username for display, read inside `tx`. `None` if the user is gone.
    pub async fn find_username(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }
}
