use crate::types::DbId;

/// Error taxonomy shared by the persistence, command, and transport layers.
///
/// `Validation` and `Conflict` are deliberately distinct: the first means the
/// caller asked for something the rules never allow, the second means the
/// request is fine but the current state of the item blocks it right now.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced item, record, or user does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Illegal transition, missing precondition data, or malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Lock held by someone else, item already in the requested terminal state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No acting user could be resolved for the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the most common lookup failure.
    pub fn item_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "Item", id }
    }

    /// Returns `true` for errors the caller may resolve by retrying later.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::Conflict(_))
    }
}
