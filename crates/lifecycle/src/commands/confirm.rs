//! Acceptance or rejection of an item awaiting confirmation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::history::HistoryEvent;
use tmc_core::status::ItemStatus;
use tmc_core::types::DbId;
use tmc_db::repositories::{HistoryRepo, ItemRepo};

use super::{begin_transition, record_transition};
use crate::error::CommandResult;
use crate::history::EntryContext;

/// Outcome chosen by the receiving user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmAction {
    Accept,
    Reject,
}

impl ConfirmAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfirmAction::Accept => "accept",
            ConfirmAction::Reject => "reject",
        }
    }
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfirmAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(ConfirmAction::Accept),
            "reject" => Ok(ConfirmAction::Reject),
            other => Err(CoreError::Validation(format!(
                "Invalid confirm action '{other}'. Must be 'accept' or 'reject'"
            ))),
        }
    }
}

/// Accept or reject an item in `confirm`. Both outcomes end in `issued`.
///
/// Accept makes the actor the custodian and keeps the current location.
/// Reject restores the custodian and location recorded by the item's first
/// `assigned` entry; without one the command fails with a validation error.
pub async fn confirm(
    pool: &PgPool,
    item_id: DbId,
    action: ConfirmAction,
    actor: &Actor,
) -> CommandResult<DbId> {
    let mut tx = pool.begin().await?;
    let item = begin_transition(
        &mut tx,
        item_id,
        "confirm",
        &[ItemStatus::Confirm],
        ItemStatus::Issued,
        actor,
    )
    .await?;

    match action {
        ConfirmAction::Accept => {
            let updated = ItemRepo::update_custody(
                &mut tx,
                item_id,
                ItemStatus::Issued,
                Some(actor.display_name()),
                None,
            )
            .await?;
            let location = updated.location.as_deref();
            record_transition(
                &mut tx,
                item_id,
                item.status,
                updated.status,
                HistoryEvent::accepted(location),
                actor,
                EntryContext {
                    location,
                    ..Default::default()
                },
            )
            .await?;
        }
        ConfirmAction::Reject => {
            let first = HistoryRepo::find_first_assignment(&mut tx, item_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Item {item_id} has no assignment record; cannot determine where to return it"
                    ))
                })?;
            let location = first.location_name.as_deref();
            let updated = ItemRepo::update_custody(
                &mut tx,
                item_id,
                ItemStatus::Issued,
                first.username.as_deref(),
                location,
            )
            .await?;
            record_transition(
                &mut tx,
                item_id,
                item.status,
                updated.status,
                HistoryEvent::rejected(location),
                actor,
                EntryContext {
                    location,
                    ..Default::default()
                },
            )
            .await?;
        }
    }

    tx.commit().await?;

    tracing::info!(item_id, action = %action, actor = %actor, "Item confirmation recorded");
    Ok(item_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parses_from_tag() {
        assert_eq!("accept".parse::<ConfirmAction>().unwrap(), ConfirmAction::Accept);
        assert_eq!("reject".parse::<ConfirmAction>().unwrap(), ConfirmAction::Reject);
        assert!("approve".parse::<ConfirmAction>().is_err());
    }
}
