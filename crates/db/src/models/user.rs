//! User model. Authentication is handled upstream; this row only anchors
//! attribution of history entries, write-offs, and locks.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tmc_core::actor::Actor;
use tmc_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The acting identity for commands issued by this user.
    pub fn to_actor(&self) -> Actor {
        Actor::user(self.id, self.username.clone())
    }
}

/// DTO for registering a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub full_name: Option<String>,
}
