//! The acting user behind a command.

use std::fmt;

use crate::error::CoreError;
use crate::types::DbId;

/// Who is performing an operation.
///
/// Resolved once at the transport edge. Business logic only ever needs the
/// display name (written into history and the `responsible` field) and,
/// for operations that reference a user row, the user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    user_id: Option<DbId>,
    display_name: String,
}

impl Actor {
    /// A registered user.
    pub fn user(user_id: DbId, display_name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            display_name: display_name.into(),
        }
    }

    /// An actor with no user row behind it (imports, maintenance scripts).
    pub fn anonymous(display_name: impl Into<String>) -> Self {
        Self {
            user_id: None,
            display_name: display_name.into(),
        }
    }

    pub fn user_id(&self) -> Option<DbId> {
        self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The user id, or a validation error for operations that must be
    /// attributed to a registered user.
    pub fn require_user_id(&self) -> Result<DbId, CoreError> {
        self.user_id.ok_or_else(|| {
            CoreError::Validation(format!(
                "Operation requires a registered user, got anonymous actor '{}'",
                self.display_name
            ))
        })
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
