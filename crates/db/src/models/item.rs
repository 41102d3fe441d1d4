//! Inventory item model and DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tmc_core::error::CoreError;
use tmc_core::lock::LockState;
use tmc_core::status::ItemStatus;
use tmc_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub serial: Option<String>,
    pub brand: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ItemStatus,
    /// Free-text custodian name.
    pub responsible: Option<String>,
    /// Free-text place name.
    pub location: Option<String>,
    pub qty: i32,
    pub brigade_id: Option<DbId>,
    pub locked_by: Option<DbId>,
    pub locked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    pub fn lock_state(&self) -> Result<LockState, CoreError> {
        LockState::from_columns(self.locked_by, self.locked_at)
    }
}

/// DTO for item intake.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub serial: Option<String>,
    pub brand: Option<String>,
    /// Either `created` or `available`; defaults to `available`.
    pub status: Option<ItemStatus>,
    pub responsible: Option<String>,
    pub location: Option<String>,
    pub qty: Option<i32>,
}

/// Plain field edits. `None` leaves the column untouched.
///
/// Status is deliberately absent: status changes go through the lifecycle
/// layer so they are validated and recorded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemFields {
    pub name: Option<String>,
    pub serial: Option<String>,
    pub brand: Option<String>,
    pub responsible: Option<String>,
    pub location: Option<String>,
    pub qty: Option<i32>,
}

impl UpdateItemFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.serial.is_none()
            && self.brand.is_none()
            && self.responsible.is_none()
            && self.location.is_none()
            && self.qty.is_none()
    }
}

// ---------------------------------------------------------------------------
// Read model projections
// ---------------------------------------------------------------------------

/// Filter for item listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemListQuery {
    /// Case-insensitive name substring, or an exact status tag.
    pub search: Option<String>,
    pub status: Option<ItemStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A page of items, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Per-status counts with dashboard summary buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounters {
    /// Every status, zero-filled.
    pub by_status: BTreeMap<String, i64>,
    /// Items awaiting acceptance (`confirm`).
    pub to_receive: i64,
    /// Items awaiting repair confirmation (`confirm_repair`).
    pub to_repair: i64,
    /// Items in the field (`issued` + `at_work`).
    pub issued: i64,
    pub total: i64,
}

impl StatusCounters {
    /// Build from raw `(status, count)` rows.
    pub fn from_counts(rows: &[(ItemStatus, i64)]) -> Self {
        let mut by_status: BTreeMap<String, i64> = ItemStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (status, count) in rows {
            *by_status.entry(status.as_str().to_string()).or_insert(0) += count;
        }
        let get = |s: ItemStatus| by_status.get(s.as_str()).copied().unwrap_or(0);

        Self {
            to_receive: get(ItemStatus::Confirm),
            to_repair: get(ItemStatus::ConfirmRepair),
            issued: get(ItemStatus::Issued) + get(ItemStatus::AtWork),
            total: by_status.values().sum(),
            by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_zero_filled_and_summarised() {
        let counters = StatusCounters::from_counts(&[
            (ItemStatus::Issued, 3),
            (ItemStatus::AtWork, 2),
            (ItemStatus::Confirm, 1),
        ]);
        assert_eq!(counters.by_status.len(), ItemStatus::ALL.len());
        assert_eq!(counters.by_status["written_off"], 0);
        assert_eq!(counters.to_receive, 1);
        assert_eq!(counters.to_repair, 0);
        assert_eq!(counters.issued, 5);
        assert_eq!(counters.total, 6);
    }
}
