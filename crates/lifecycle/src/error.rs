use tmc_core::error::CoreError;

/// Error returned by lifecycle commands and read-model queries.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A domain rule rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type CommandResult<T> = Result<T, CommandError>;

impl CommandError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            CommandError::Core(err) => Some(err),
            CommandError::Database(_) => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.as_core().is_some_and(CoreError::is_conflict)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CommandError::Core(CoreError::Validation(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CommandError::Core(CoreError::NotFound { .. }))
    }
}
