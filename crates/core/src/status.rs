//! Item status enum and the transition table.
//!
//! The adjacency map in [`valid_transitions`] is the single source of truth
//! for which status changes are legal. Every lifecycle command consults it
//! through [`validate_transition`]; write-off adds the narrower
//! [`validate_write_off`] guard on top.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status enum
// ---------------------------------------------------------------------------

/// Custody state of an inventory item. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Created,
    Available,
    AtWork,
    InRepair,
    Issued,
    Confirm,
    ConfirmRepair,
    WrittenOff,
}

impl ItemStatus {
    /// Every status, in declaration order.
    pub const ALL: [ItemStatus; 8] = [
        ItemStatus::Created,
        ItemStatus::Available,
        ItemStatus::AtWork,
        ItemStatus::InRepair,
        ItemStatus::Issued,
        ItemStatus::Confirm,
        ItemStatus::ConfirmRepair,
        ItemStatus::WrittenOff,
    ];

    /// Storage tag, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Created => "created",
            ItemStatus::Available => "available",
            ItemStatus::AtWork => "at_work",
            ItemStatus::InRepair => "in_repair",
            ItemStatus::Issued => "issued",
            ItemStatus::Confirm => "confirm",
            ItemStatus::ConfirmRepair => "confirm_repair",
            ItemStatus::WrittenOff => "written_off",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid item status '{s}'. Must be one of: {:?}",
                    ItemStatus::ALL.map(ItemStatus::as_str)
                ))
            })
    }
}

/// Lets `sqlx` decode the `TEXT` status column straight into the enum via
/// `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for ItemStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// Statuses from which an item may be written off.
pub const WRITE_OFF_SOURCES: &[ItemStatus] = &[
    ItemStatus::Issued,
    ItemStatus::AtWork,
    ItemStatus::InRepair,
];

/// Returns the set of statuses that `from` may transition to.
///
/// Transition rules:
/// - `created`        -> `available`
/// - `available`      -> `confirm`, `at_work`
/// - `confirm`        -> `issued`, `at_work`
/// - `at_work`        -> `issued`, `confirm_repair`, `written_off`
/// - `issued`         -> `confirm_repair`, `confirm`, `written_off`
/// - `confirm_repair` -> `in_repair`
/// - `in_repair`      -> `issued`, `written_off`
/// - `written_off`    -> `available` (write-off cancelled)
pub fn valid_transitions(from: ItemStatus) -> &'static [ItemStatus] {
    use ItemStatus::*;
    match from {
        Created => &[Available],
        Available => &[Confirm, AtWork],
        Confirm => &[Issued, AtWork],
        AtWork => &[Issued, ConfirmRepair, WrittenOff],
        Issued => &[ConfirmRepair, Confirm, WrittenOff],
        ConfirmRepair => &[InRepair],
        InRepair => &[Issued, WrittenOff],
        WrittenOff => &[Available],
    }
}

/// Returns `true` if `from -> to` is listed in the transition table.
pub fn can_transition(from: ItemStatus, to: ItemStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate that a status transition from `current` to `next` is allowed.
pub fn validate_transition(current: ItemStatus, next: ItemStatus) -> Result<(), CoreError> {
    if can_transition(current, next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition item from '{}' to '{}'. Allowed transitions: {:?}",
            current,
            next,
            valid_transitions(current)
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
        )))
    }
}

/// Guard for the write-off command.
///
/// An item that is already written off is a conflict (the request is
/// redundant, not malformed). Any other status outside
/// [`WRITE_OFF_SOURCES`] is a validation failure.
pub fn validate_write_off(current: ItemStatus) -> Result<(), CoreError> {
    if current == ItemStatus::WrittenOff {
        return Err(CoreError::Conflict("Item already written off".to_string()));
    }
    if !WRITE_OFF_SOURCES.contains(&current) {
        return Err(CoreError::Validation(format!(
            "Cannot write off item in status '{}'. Write-off is allowed from: {:?}",
            current,
            WRITE_OFF_SOURCES
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
        )));
    }
    validate_transition(current, ItemStatus::WrittenOff)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
