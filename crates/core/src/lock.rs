//! Advisory item lock: ownership rules.
//!
//! The lock is two nullable columns on the item row (`locked_by`,
//! `locked_at`). This module decides what an acquire or release request
//! should do given the current state; the command layer applies the
//! decision under a row lock.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Current lock state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    HeldBy { user_id: DbId, since: Timestamp },
}

impl LockState {
    /// Build from the two item columns. Both must be set or both null.
    pub fn from_columns(
        locked_by: Option<DbId>,
        locked_at: Option<Timestamp>,
    ) -> Result<Self, CoreError> {
        match (locked_by, locked_at) {
            (None, None) => Ok(LockState::Unlocked),
            (Some(user_id), Some(since)) => Ok(LockState::HeldBy { user_id, since }),
            _ => Err(CoreError::Internal(
                "Item lock columns are inconsistent: locked_by and locked_at must be set together"
                    .to_string(),
            )),
        }
    }

    pub fn holder(&self) -> Option<DbId> {
        match self {
            LockState::Unlocked => None,
            LockState::HeldBy { user_id, .. } => Some(*user_id),
        }
    }
}

/// What an acquire request should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireDecision {
    /// Item is free: take it.
    Acquire,
    /// Caller already holds it: refresh the timestamp.
    Refresh,
    /// Someone else holds it.
    Conflict { holder: DbId },
}

/// What a release request should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    Release,
    /// Nothing to release.
    AlreadyUnlocked,
    Conflict { holder: DbId },
}

pub fn decide_acquire(state: LockState, actor_id: DbId) -> AcquireDecision {
    match state.holder() {
        None => AcquireDecision::Acquire,
        Some(holder) if holder == actor_id => AcquireDecision::Refresh,
        Some(holder) => AcquireDecision::Conflict { holder },
    }
}

/// Only the holder may release; there is no override.
pub fn decide_release(state: LockState, actor_id: DbId) -> ReleaseDecision {
    match state.holder() {
        None => ReleaseDecision::AlreadyUnlocked,
        Some(holder) if holder == actor_id => ReleaseDecision::Release,
        Some(holder) => ReleaseDecision::Conflict { holder },
    }
}

/// Conflict error naming the current holder.
pub fn lock_conflict(holder_name: &str) -> CoreError {
    CoreError::Conflict(format!("Item is locked by user {holder_name}"))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn held_by(user_id: DbId) -> LockState {
        LockState::HeldBy {
            user_id,
            since: chrono::Utc::now(),
        }
    }

    #[test]
    fn columns_must_agree() {
        assert_eq!(LockState::from_columns(None, None).unwrap(), LockState::Unlocked);
        assert_matches!(
            LockState::from_columns(Some(1), Some(chrono::Utc::now())),
            Ok(LockState::HeldBy { user_id: 1, .. })
        );
        assert_matches!(
            LockState::from_columns(Some(1), None),
            Err(CoreError::Internal(_))
        );
        assert_matches!(
            LockState::from_columns(None, Some(chrono::Utc::now())),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn acquire_free_item() {
        assert_eq!(decide_acquire(LockState::Unlocked, 1), AcquireDecision::Acquire);
    }

    #[test]
    fn reacquire_by_holder_refreshes() {
        assert_eq!(decide_acquire(held_by(1), 1), AcquireDecision::Refresh);
    }

    #[test]
    fn acquire_held_by_other_conflicts() {
        assert_eq!(
            decide_acquire(held_by(1), 2),
            AcquireDecision::Conflict { holder: 1 }
        );
    }

    #[test]
    fn release_rules() {
        assert_eq!(decide_release(held_by(1), 1), ReleaseDecision::Release);
        assert_eq!(
            decide_release(held_by(1), 2),
            ReleaseDecision::Conflict { holder: 1 }
        );
        assert_eq!(
            decide_release(LockState::Unlocked, 2),
            ReleaseDecision::AlreadyUnlocked
        );
    }

    #[test]
    fn conflict_names_holder() {
        let err = lock_conflict("petrov");
        assert!(err.is_conflict());
        assert!(err.to_string().contains("petrov"));
    }
}
