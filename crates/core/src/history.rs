//! History action registry and template rendering.
//!
//! Each history entry carries an action tag and a structured payload. The
//! human-readable text is derived from the tag's template in
//! [`TemplateRegistry`]. Rendering never fails: a missing parameter, an empty
//! payload, or an unknown tag all degrade to an unrendered string so that a
//! cosmetic problem can never abort the business operation being recorded.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::payload::{payload, Payload, PayloadValue};
use crate::status::ItemStatus;
use crate::types::DbId;

/// Bumped whenever a template text or a required-key set changes.
pub const TEMPLATE_REGISTRY_VERSION: u32 = 1;

/// Compiled regex for `{name}` placeholders.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("valid regex"));

static REGISTRY: LazyLock<TemplateRegistry> = LazyLock::new(TemplateRegistry::build);

// ---------------------------------------------------------------------------
// Action tags
// ---------------------------------------------------------------------------

/// Kind of event recorded in an item's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Accepted,
    Rejected,
    SentToService,
    ReturnedFromService,
    RepairConfirmed,
    Updated,
    StatusChanged,
    Locked,
    Unlocked,
    Assigned,
    Confirmed,
    WrittenOff,
    CancelledWriteOff,
}

impl HistoryAction {
    pub const ALL: [HistoryAction; 13] = [
        HistoryAction::Accepted,
        HistoryAction::Rejected,
        HistoryAction::SentToService,
        HistoryAction::ReturnedFromService,
        HistoryAction::RepairConfirmed,
        HistoryAction::Updated,
        HistoryAction::StatusChanged,
        HistoryAction::Locked,
        HistoryAction::Unlocked,
        HistoryAction::Assigned,
        HistoryAction::Confirmed,
        HistoryAction::WrittenOff,
        HistoryAction::CancelledWriteOff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HistoryAction::Accepted => "accepted",
            HistoryAction::Rejected => "rejected",
            HistoryAction::SentToService => "sent_to_service",
            HistoryAction::ReturnedFromService => "returned_from_service",
            HistoryAction::RepairConfirmed => "repair_confirmed",
            HistoryAction::Updated => "updated",
            HistoryAction::StatusChanged => "status_changed",
            HistoryAction::Locked => "locked",
            HistoryAction::Unlocked => "unlocked",
            HistoryAction::Assigned => "assigned",
            HistoryAction::Confirmed => "confirmed",
            HistoryAction::WrittenOff => "written_off",
            HistoryAction::CancelledWriteOff => "cancelled_write_off",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HistoryAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown history action '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Template and payload schema for one action tag.
#[derive(Debug, Clone, Copy)]
pub struct ActionSchema {
    pub action: HistoryAction,
    pub template: &'static str,
    /// Keys that must be present for the template to be rendered at all.
    pub required: &'static [&'static str],
    /// Keys whose empty-string value counts as absent.
    pub empty_as_missing: &'static [&'static str],
}

const fn schema(action: HistoryAction, template: &'static str) -> ActionSchema {
    ActionSchema {
        action,
        template,
        required: &[],
        empty_as_missing: &[],
    }
}

const SCHEMAS: &[ActionSchema] = &[
    schema(HistoryAction::Accepted, "Item accepted. Location - {location}"),
    schema(
        HistoryAction::Rejected,
        "Item rejected. Returned to location - {location}",
    ),
    schema(
        HistoryAction::SentToService,
        "Sent to service. Reason: {reason}. Awaiting confirmation.",
    ),
    schema(HistoryAction::ReturnedFromService, "Returned from service"),
    schema(HistoryAction::RepairConfirmed, "Repair confirmed"),
    schema(
        HistoryAction::Updated,
        "Information updated. Comment: {comment}",
    ),
    schema(
        HistoryAction::StatusChanged,
        "Status changed: {old_status} → {new_status}",
    ),
    schema(HistoryAction::Locked, "Locked: {username}"),
    schema(HistoryAction::Unlocked, "Unlocked"),
    schema(HistoryAction::Assigned, "Item assigned"),
    schema(
        HistoryAction::Confirmed,
        "Item confirmed. Comment: {comment}",
    ),
    ActionSchema {
        required: &["reason", "amount"],
        ..schema(
            HistoryAction::WrittenOff,
            "Written off. Reason: {reason}. Amount: {amount}",
        )
    },
    ActionSchema {
        required: &["write_off_id"],
        empty_as_missing: &["write_off_id"],
        ..schema(
            HistoryAction::CancelledWriteOff,
            "Write-off cancelled. Record #{write_off_id}",
        )
    },
];

/// Immutable tag → template lookup, built once per process.
#[derive(Debug)]
pub struct TemplateRegistry {
    version: u32,
    by_tag: HashMap<&'static str, ActionSchema>,
}

impl TemplateRegistry {
    fn build() -> Self {
        let by_tag = SCHEMAS
            .iter()
            .map(|schema| (schema.action.as_str(), *schema))
            .collect();
        Self {
            version: TEMPLATE_REGISTRY_VERSION,
            by_tag,
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static TemplateRegistry {
        &REGISTRY
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn schema(&self, tag: &str) -> Option<&ActionSchema> {
        self.by_tag.get(tag)
    }

    /// Template text for `tag`, or the tag itself when it is not registered.
    pub fn template<'a>(&'a self, tag: &'a str) -> &'a str {
        self.schema(tag).map_or(tag, |s| s.template)
    }

    /// Render `tag`'s template against an already-sanitized JSON payload.
    ///
    /// Returns the raw template when the payload is absent or empty, when any
    /// placeholder or required key is missing, or when an empty-as-missing
    /// key holds an empty string.
    pub fn render(&self, tag: &str, payload: Option<&Value>) -> String {
        let template = self.template(tag);
        let Some(map) = payload.and_then(Value::as_object).filter(|m| !m.is_empty()) else {
            return template.to_string();
        };

        let (required, empty_as_missing) = self
            .schema(tag)
            .map_or((&[][..], &[][..]), |s| (s.required, s.empty_as_missing));

        let mut keys = extract_placeholders(template);
        keys.extend(required.iter().map(|k| k.to_string()));

        let missing = keys.iter().any(|key| match map.get(key.as_str()) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty() && empty_as_missing.contains(&key.as_str()),
            Some(_) => false,
        });
        if missing {
            return template.to_string();
        }

        PLACEHOLDER_RE
            .replace_all(template, |caps: &Captures| {
                map.get(&caps[1])
                    .map(value_text)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Render `tag` against `payload` using the global registry.
pub fn render(tag: &str, payload: Option<&Value>) -> String {
    TemplateRegistry::global().render(tag, payload)
}

/// Extract `{placeholder}` names from a template, de-duplicated and sorted.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = PLACEHOLDER_RE
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Typed events
// ---------------------------------------------------------------------------

/// An action tag with its payload, ready to be appended to an item's history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEvent {
    pub action: HistoryAction,
    pub payload: Payload,
}

impl HistoryEvent {
    fn new(action: HistoryAction, payload: Payload) -> Self {
        Self { action, payload }
    }

    pub fn accepted(location: Option<&str>) -> Self {
        Self::new(
            HistoryAction::Accepted,
            payload([("location", location.unwrap_or_default().into())]),
        )
    }

    pub fn rejected(location: Option<&str>) -> Self {
        Self::new(
            HistoryAction::Rejected,
            payload([("location", location.unwrap_or_default().into())]),
        )
    }

    pub fn sent_to_service(reason: &str) -> Self {
        Self::new(
            HistoryAction::SentToService,
            payload([("reason", reason.into())]),
        )
    }

    pub fn returned_from_service() -> Self {
        Self::new(HistoryAction::ReturnedFromService, Payload::new())
    }

    pub fn repair_confirmed() -> Self {
        Self::new(HistoryAction::RepairConfirmed, Payload::new())
    }

    pub fn updated(comment: &str) -> Self {
        Self::new(HistoryAction::Updated, payload([("comment", comment.into())]))
    }

    pub fn status_changed(old: ItemStatus, new: ItemStatus) -> Self {
        Self::new(
            HistoryAction::StatusChanged,
            payload([
                ("old_status", old.as_str().into()),
                ("new_status", new.as_str().into()),
            ]),
        )
    }

    pub fn locked(username: &str) -> Self {
        Self::new(HistoryAction::Locked, payload([("username", username.into())]))
    }

    pub fn unlocked() -> Self {
        Self::new(HistoryAction::Unlocked, Payload::new())
    }

    pub fn assigned() -> Self {
        Self::new(HistoryAction::Assigned, Payload::new())
    }

    /// Missing reason and amount default to `""` and `0`.
    pub fn written_off(reason: Option<&str>, amount: Option<Decimal>) -> Self {
        Self::new(
            HistoryAction::WrittenOff,
            payload([
                ("reason", reason.unwrap_or_default().into()),
                ("amount", amount.unwrap_or(Decimal::ZERO).into()),
            ]),
        )
    }

    /// A missing record id is stored as `""`, which renders as absent.
    pub fn cancelled_write_off(write_off_id: Option<DbId>) -> Self {
        let id = write_off_id.map_or_else(String::new, |id| id.to_string());
        Self::new(
            HistoryAction::CancelledWriteOff,
            payload([("write_off_id", PayloadValue::Text(id))]),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payload::sanitize_payload;

    fn rendered(event: &HistoryEvent) -> String {
        render(event.action.as_str(), Some(&sanitize_payload(&event.payload)))
    }

    #[test]
    fn every_action_is_registered() {
        let registry = TemplateRegistry::global();
        for action in HistoryAction::ALL {
            assert!(registry.schema(action.as_str()).is_some(), "{action}");
        }
        assert_eq!(registry.version(), TEMPLATE_REGISTRY_VERSION);
    }

    #[test]
    fn accepted_substitutes_location() {
        let text = rendered(&HistoryEvent::accepted(Some("Warehouse 3")));
        assert_eq!(text, "Item accepted. Location - Warehouse 3");
    }

    #[test]
    fn status_changed_uses_tags() {
        let text = rendered(&HistoryEvent::status_changed(
            ItemStatus::Confirm,
            ItemStatus::Issued,
        ));
        assert_eq!(text, "Status changed: confirm → issued");
    }

    #[test]
    fn written_off_contains_every_value_verbatim() {
        let text = rendered(&HistoryEvent::written_off(
            Some("Broken beyond repair"),
            Some(Decimal::new(125050, 2)),
        ));
        assert!(text.contains("Broken beyond repair"));
        assert!(text.contains("1250.50"));
    }

    #[test]
    fn written_off_defaults_fill_required_keys() {
        let text = rendered(&HistoryEvent::written_off(None, None));
        assert_eq!(text, "Written off. Reason: . Amount: 0");
    }

    #[test]
    fn missing_required_key_returns_raw_template() {
        let text = render("written_off", Some(&json!({ "reason": "Lost" })));
        assert_eq!(text, "Written off. Reason: {reason}. Amount: {amount}");
    }

    #[test]
    fn empty_write_off_id_counts_as_missing() {
        let text = rendered(&HistoryEvent::cancelled_write_off(None));
        assert_eq!(text, "Write-off cancelled. Record #{write_off_id}");

        let text = rendered(&HistoryEvent::cancelled_write_off(Some(17)));
        assert_eq!(text, "Write-off cancelled. Record #17");
    }

    #[test]
    fn null_value_counts_as_missing() {
        let text = render("accepted", Some(&json!({ "location": null })));
        assert_eq!(text, "Item accepted. Location - {location}");
    }

    #[test]
    fn empty_or_absent_payload_returns_raw_template() {
        assert_eq!(render("locked", None), "Locked: {username}");
        assert_eq!(render("locked", Some(&json!({}))), "Locked: {username}");
        assert_eq!(render("unlocked", None), "Unlocked");
    }

    #[test]
    fn unknown_tag_renders_as_itself() {
        assert_eq!(render("teleported", None), "teleported");
        assert_eq!(render("teleported", Some(&json!({ "x": 1 }))), "teleported");
    }

    #[test]
    fn extra_payload_keys_are_ignored() {
        let text = render(
            "sent_to_service",
            Some(&json!({ "reason": "Noise", "ticket": 99 })),
        );
        assert_eq!(text, "Sent to service. Reason: Noise. Awaiting confirmation.");
    }

    #[test]
    fn non_string_values_render_as_json_text() {
        let text = render("updated", Some(&json!({ "comment": 42 })));
        assert_eq!(text, "Information updated. Comment: 42");
    }

    #[test]
    fn placeholders_are_deduplicated_and_sorted() {
        assert_eq!(
            extract_placeholders("{b} {a} {b} {not-a-key}"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn action_tags_parse_back() {
        for action in HistoryAction::ALL {
            assert_eq!(action.as_str().parse::<HistoryAction>().unwrap(), action);
        }
        assert!("nope".parse::<HistoryAction>().is_err());
    }
}
