//! Ledger aggregate model
//!
//! [`AppData`] is the single unit of persistence: every month bucket plus the
//! category settings. It is always loaded, modified and written back whole.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::entry::Entry;
use super::ids::EntryId;
use super::month::MonthKey;

/// Categories every fresh ledger starts with
pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Salary",
    "Freelance",
    "Food",
    "Rent",
    "Transport",
    "Utilities",
    "Entertainment",
    "Health",
    "Savings",
    "Misc",
];

/// The default category list as owned strings
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// All entries of one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthData {
    pub month: MonthKey,
    /// Storage order: newest additions first
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl MonthData {
    /// Create an empty bucket
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            entries: Vec::new(),
        }
    }

    /// Prepend an entry so the newest addition comes first
    pub fn prepend(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
    }

    /// Replace the entry with the same id. Returns false if absent.
    pub fn replace(&mut self, entry: Entry) -> bool {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with the given id, returning it
    pub fn remove(&mut self, id: &EntryId) -> Option<Entry> {
        let index = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Find an entry by id
    pub fn find(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// User-defined settings stored inside the aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsData {
    /// Display-ordered category list
    pub categories: Vec<String>,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

/// Root aggregate: every month bucket and the settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppData {
    pub months: BTreeMap<MonthKey, MonthData>,
    pub settings: SettingsData,
}

impl AppData {
    /// The bucket for `month`, or a fresh empty one
    ///
    /// This is a pure read: an absent month is not inserted.
    pub fn month(&self, month: MonthKey) -> MonthData {
        self.months
            .get(&month)
            .cloned()
            .unwrap_or_else(|| MonthData::empty(month))
    }

    /// Mutable bucket for `month`, created if absent
    pub fn month_mut(&mut self, month: MonthKey) -> &mut MonthData {
        self.months
            .entry(month)
            .or_insert_with(|| MonthData::empty(month))
    }

    /// Total number of entries across all months
    pub fn entry_count(&self) -> usize {
        self.months.values().map(|m| m.entries.len()).sum()
    }

    /// Iterate every entry in month order
    pub fn all_entries(&self) -> impl Iterator<Item = &Entry> {
        self.months.values().flat_map(|m| m.entries.iter())
    }

    /// Rebuild an aggregate from a parsed JSON value, defaulting what is broken
    ///
    /// A non-object value yields the default aggregate. A missing or malformed
    /// `settings` falls back to the default categories and a missing `months`
    /// to no months, independently. Entries are recovered one at a time, so a
    /// bad entry costs only itself; the rest of its month is kept.
    pub fn recover(value: Value) -> Self {
        Self::recover_counted(value).0
    }

    /// Like [`AppData::recover`], also counting the parts that could not be kept
    ///
    /// A count of zero means the value was read in full.
    pub fn recover_counted(value: Value) -> (Self, usize) {
        let Value::Object(mut root) = value else {
            tracing::warn!("stored ledger is not a JSON object, using defaults");
            return (Self::default(), 1);
        };

        let mut dropped = 0;

        let settings = match root.remove("settings") {
            None | Some(Value::Null) => SettingsData::default(),
            Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored settings are malformed, using defaults");
                dropped += 1;
                SettingsData::default()
            }),
        };

        let months = match root.remove("months") {
            Some(Value::Object(raw_months)) => recover_months(raw_months, &mut dropped),
            None | Some(Value::Null) => BTreeMap::new(),
            Some(_) => {
                tracing::warn!("stored months field is not an object, starting empty");
                dropped += 1;
                BTreeMap::new()
            }
        };

        (Self { months, settings }, dropped)
    }
}

fn recover_months(
    raw: serde_json::Map<String, Value>,
    dropped: &mut usize,
) -> BTreeMap<MonthKey, MonthData> {
    let mut months = BTreeMap::new();

    for (key, value) in raw {
        let month = match MonthKey::parse(&key) {
            Ok(month) => month,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "dropping month with malformed key");
                *dropped += 1;
                continue;
            }
        };

        let Value::Object(mut bucket) = value else {
            tracing::warn!(month = %key, "dropping month bucket that is not an object");
            *dropped += 1;
            continue;
        };

        // The map key is authoritative over the bucket's own `month` field
        let mut data = MonthData::empty(month);
        match bucket.remove("entries") {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for item in items {
                    match serde_json::from_value::<Entry>(item) {
                        Ok(entry) => data.entries.push(entry),
                        Err(e) => {
                            tracing::warn!(month = %key, error = %e, "dropping malformed entry");
                            *dropped += 1;
                        }
                    }
                }
            }
            Some(_) => {
                tracing::warn!(month = %key, "month entries are not a list, keeping an empty bucket");
                *dropped += 1;
            }
        }
        months.insert(month, data);
    }

    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Money};
    use chrono::NaiveDate;
    use serde_json::json;

    fn march() -> MonthKey {
        MonthKey::parse("2024-03").unwrap()
    }

    fn entry(day: u32) -> Entry {
        Entry::expense(
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            "Food",
            Money::from_units(10),
        )
    }

    #[test]
    fn test_default_aggregate() {
        let data = AppData::default();
        assert!(data.months.is_empty());
        assert_eq!(
            data.settings.categories,
            vec![
                "Salary",
                "Freelance",
                "Food",
                "Rent",
                "Transport",
                "Utilities",
                "Entertainment",
                "Health",
                "Savings",
                "Misc"
            ]
        );
    }

    #[test]
    fn test_month_read_does_not_insert() {
        let data = AppData::default();
        let bucket = data.month(march());
        assert!(bucket.is_empty());
        assert_eq!(bucket.month, march());
        assert!(data.months.is_empty());
    }

    #[test]
    fn test_prepend_replace_remove() {
        let mut bucket = MonthData::empty(march());
        let first = entry(1);
        let second = entry(2);
        bucket.prepend(first.clone());
        bucket.prepend(second.clone());
        assert_eq!(bucket.entries[0].id, second.id);

        let mut edited = first.clone();
        edited.note = "groceries".into();
        assert!(bucket.replace(edited));
        assert_eq!(bucket.find(&first.id).unwrap().note, "groceries");

        assert!(bucket.remove(&first.id).is_some());
        assert!(bucket.remove(&first.id).is_none());
        assert!(!bucket.replace(first));
    }

    #[test]
    fn test_recover_non_object() {
        assert_eq!(AppData::recover(json!([1, 2, 3])), AppData::default());
        assert_eq!(AppData::recover(json!("text")), AppData::default());
    }

    #[test]
    fn test_recover_defaults_fields_independently() {
        let data = AppData::recover(json!({
            "months": {
                "2024-03": { "month": "2024-03", "entries": [] }
            }
        }));
        assert_eq!(data.months.len(), 1);
        assert_eq!(data.settings, SettingsData::default());

        let data = AppData::recover(json!({ "settings": { "categories": ["A", "B"] } }));
        assert!(data.months.is_empty());
        assert_eq!(data.settings.categories, vec!["A", "B"]);
    }

    #[test]
    fn test_recover_keeps_good_months() {
        let (data, dropped) = AppData::recover_counted(json!({
            "months": {
                "2024-03": {
                    "month": "2024-03",
                    "entries": [{
                        "id": "a", "type": "income", "date": "2024-03-01",
                        "category": "Salary", "note": "", "amount": 100, "planned": false
                    }]
                },
                "2024-04": { "month": "2024-04", "entries": "broken" },
                "2024-05": 7,
                "garbage": {}
            },
            "settings": { "categories": 42 }
        }));

        assert_eq!(data.months.len(), 2);
        assert_eq!(data.month(march()).entries.len(), 1);
        assert!(data.months[&MonthKey::parse("2024-04").unwrap()].is_empty());
        assert_eq!(data.settings, SettingsData::default());
        assert_eq!(dropped, 4);
    }

    #[test]
    fn test_recover_drops_only_the_bad_entry() {
        let (data, dropped) = AppData::recover_counted(json!({
            "months": {
                "2024-03": {
                    "month": "2024-03",
                    "entries": [
                        {
                            "id": "good", "type": "expense", "date": "2024-03-02",
                            "category": "Food", "note": "", "amount": 1e18, "planned": false
                        },
                        { "id": "bad", "type": "expense", "amount": "lots" },
                        {
                            "id": "also-good", "type": "income", "date": "2024-03-01",
                            "category": "Salary", "note": "", "amount": 12.345, "planned": true
                        }
                    ]
                }
            },
            "settings": { "categories": ["Food"] }
        }));

        let ids: Vec<String> = data
            .month(march())
            .entries
            .iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids, vec!["good", "also-good"]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_recover_counts_nothing_for_clean_data() {
        let mut data = AppData::default();
        data.month_mut(march()).prepend(entry(5));
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(AppData::recover_counted(value), (data, 0));
    }

    #[test]
    fn test_serde_round_trip_shape() {
        let mut data = AppData::default();
        data.month_mut(march()).prepend(entry(5));

        let value = serde_json::to_value(&data).unwrap();
        assert!(value["months"]["2024-03"]["entries"].is_array());
        assert_eq!(value["months"]["2024-03"]["month"], "2024-03");

        let back: AppData = serde_json::from_value(value).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.entry_count(), 1);
    }
}
