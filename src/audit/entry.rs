//! Audit record types
//!
//! One [`AuditEntry`] per ledger mutation, with the affected value before
//! and after as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        };
        f.write_str(label)
    }
}

/// What the mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// A single income or expense entry
    Entry,
    /// The global category list
    Category,
    /// A budget line of one month
    Budget,
    /// The whole stored ledger (import, clear)
    Ledger,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityType::Entry => "Entry",
            EntityType::Category => "Category",
            EntityType::Budget => "Budget",
            EntityType::Ledger => "Ledger",
        };
        f.write_str(label)
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,

    /// Entry id, category name, or `YYYY-MM/category` for budget lines
    pub entity_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn stamp(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Record a newly created value
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        value: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(value).ok(),
            ..Self::stamp(Operation::Create, entity_type, entity_id.into())
        }
    }

    /// Record a changed value
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::stamp(Operation::Update, entity_type, entity_id.into())
        }
    }

    /// Record a removed value
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        value: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(value).ok(),
            ..Self::stamp(Operation::Delete, entity_type, entity_id.into())
        }
    }

    /// Single-line summary plus the diff, for the `audit` command
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }
        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labels() {
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(EntityType::Budget.to_string(), "Budget");
    }

    #[test]
    fn test_create_carries_after_only() {
        let entry = AuditEntry::create(
            EntityType::Entry,
            "e1",
            Some("Food".into()),
            &json!({"category": "Food", "amount": 250}),
        );
        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after.as_ref().unwrap()["amount"], 250);
    }

    #[test]
    fn test_update_and_delete() {
        let before = json!({"amount": 100});
        let after = json!({"amount": 150});
        let entry = AuditEntry::update(
            EntityType::Budget,
            "2024-03/Food",
            None,
            &before,
            &after,
            Some("amount: 100 -> 150".into()),
        );
        assert!(entry.before.is_some() && entry.after.is_some());

        let entry = AuditEntry::delete(EntityType::Category, "Misc", None, &"Misc");
        assert_eq!(entry.before, Some(json!("Misc")));
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_optional_fields_omitted_on_the_wire() {
        let entry = AuditEntry::delete(EntityType::Ledger, "ledger", None, &json!({}));
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("after").is_none());
        assert!(value.get("entity_name").is_none());
        assert_eq!(value["entity_type"], "ledger");

        let back: AuditEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back.operation, Operation::Delete);
    }

    #[test]
    fn test_human_readable() {
        let mut entry = AuditEntry::create(EntityType::Entry, "e1", Some("Rent".into()), &1);
        entry.diff_summary = Some("amount: 1 -> 2".into());
        let text = entry.format_human_readable();
        assert!(text.contains("CREATE Entry e1 (Rent)"));
        assert!(text.contains("Changes: amount: 1 -> 2"));
    }
}
