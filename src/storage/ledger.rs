//! Ledger repository
//!
//! Reads and writes the whole [`AppData`] aggregate under one key of the
//! key-value store. Every mutation is a full load, modify, save cycle; there
//! is no cache, so two stores over the same backend always agree after a
//! write.
//!
//! A write over a record that could only be partly read first copies the
//! original to `<key>.unrecovered-<timestamp>`.

use std::sync::Arc;

use chrono::Utc;

use crate::error::LedgerResult;
use crate::models::{AppData, Entry, EntryId, MonthData, MonthKey};

use super::kv::KeyValueStore;

/// Key the aggregate is stored under unless configured otherwise
pub const DEFAULT_LEDGER_KEY: &str = "notebook-expense-tracker-v1";

/// Prefix shared by every version of the aggregate key
pub const LEDGER_KEY_FAMILY: &str = "notebook-expense-tracker";

/// Repository for the ledger aggregate
#[derive(Clone)]
pub struct LedgerStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl LedgerStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The storage key of the aggregate
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the aggregate
    ///
    /// An absent or unparseable record yields the default aggregate; only a
    /// failing backend is an error. Whatever part of a damaged record can
    /// still be read is kept, down to single entries.
    pub fn load(&self) -> LedgerResult<AppData> {
        Ok(self.load_for_write()?.0)
    }

    /// Load, also returning the raw record when recovery could not keep all of it
    fn load_for_write(&self) -> LedgerResult<(AppData, Option<String>)> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok((AppData::default(), None));
        };

        let (data, dropped) = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => AppData::recover_counted(value),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "stored ledger is not valid JSON, using defaults");
                (AppData::default(), 1)
            }
        };

        Ok((data, (dropped > 0).then_some(raw)))
    }

    /// Serialize and write the whole aggregate
    pub fn save(&self, data: &AppData) -> LedgerResult<()> {
        let json = serde_json::to_string(data)?;
        self.backend.set(&self.key, &json)
    }

    /// Save a mutation of a partly recovered record, first copying the
    /// damaged original aside so nothing recovery skipped is lost
    fn save_over(&self, data: &AppData, damaged: Option<String>) -> LedgerResult<()> {
        if let Some(raw) = damaged {
            let aside = format!(
                "{}.unrecovered-{}",
                self.key,
                Utc::now().format("%Y%m%dT%H%M%S%3f")
            );
            self.backend.set(&aside, &raw)?;
            tracing::warn!(key = %self.key, copy = %aside, "stored ledger was only partly readable, kept a copy of the original");
        }
        self.save(data)
    }

    /// Load, apply `f`, save unconditionally
    pub fn modify<F, R>(&self, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut AppData) -> R,
    {
        let (mut data, damaged) = self.load_for_write()?;
        let result = f(&mut data);
        self.save_over(&data, damaged)?;
        Ok(result)
    }

    /// Load, apply `f`, save only when `f` succeeds
    pub fn try_modify<F, R>(&self, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut AppData) -> LedgerResult<R>,
    {
        let (mut data, damaged) = self.load_for_write()?;
        let result = f(&mut data)?;
        self.save_over(&data, damaged)?;
        Ok(result)
    }

    /// Load, apply `f`, save only when `f` reports a change
    fn modify_if<F, R>(&self, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut AppData) -> (bool, R),
    {
        let (mut data, damaged) = self.load_for_write()?;
        let (changed, result) = f(&mut data);
        if changed {
            self.save_over(&data, damaged)?;
        }
        Ok(result)
    }

    /// Keys of the copies kept aside from partly readable records, oldest first
    pub fn unrecovered_copies(&self) -> LedgerResult<Vec<String>> {
        let prefix = format!("{}.unrecovered-", self.key);
        Ok(self
            .backend
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect())
    }

    /// Read one month bucket (never inserts)
    pub fn get_month(&self, month: MonthKey) -> LedgerResult<MonthData> {
        Ok(self.load()?.month(month))
    }

    /// Prepend an entry to a month, creating the bucket if needed
    pub fn add_entry(&self, month: MonthKey, entry: Entry) -> LedgerResult<()> {
        self.modify(|data| data.month_mut(month).prepend(entry))
    }

    /// Replace the entry with the same id in `month`
    ///
    /// Returns false, without writing, when the id is not in that bucket.
    pub fn update_entry(&self, month: MonthKey, entry: Entry) -> LedgerResult<bool> {
        self.modify_if(|data| {
            let replaced = data
                .months
                .get_mut(&month)
                .map_or(false, |bucket| bucket.replace(entry));
            (replaced, replaced)
        })
    }

    /// Remove an entry from `month`, returning it
    ///
    /// Nothing is written when the id is absent.
    pub fn remove_entry(&self, month: MonthKey, id: &EntryId) -> LedgerResult<Option<Entry>> {
        self.modify_if(|data| {
            let removed = data.months.get_mut(&month).and_then(|bucket| bucket.remove(id));
            (removed.is_some(), removed)
        })
    }

    /// Persist a month bucket, replacing any stored one
    pub fn upsert_month(&self, bucket: MonthData) -> LedgerResult<()> {
        self.modify(|data| {
            data.months.insert(bucket.month, bucket);
        })
    }

    /// Replace the global category list
    pub fn set_categories(&self, categories: Vec<String>) -> LedgerResult<()> {
        self.modify(|data| data.settings.categories = categories)
    }

    pub fn get_categories(&self) -> LedgerResult<Vec<String>> {
        Ok(self.load()?.settings.categories)
    }

    /// Overwrite the stored aggregate wholesale
    pub fn replace_all(&self, data: &AppData) -> LedgerResult<()> {
        self.save(data)
    }

    /// Whether a record exists under the key
    pub fn exists(&self) -> LedgerResult<bool> {
        Ok(self.backend.get(&self.key)?.is_some())
    }
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_categories, Money};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn create_store() -> (Arc<MemoryStore>, LedgerStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = LedgerStore::new(backend.clone(), DEFAULT_LEDGER_KEY);
        (backend, store)
    }

    fn march() -> MonthKey {
        MonthKey::new(2024, 3).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_load_without_record_gives_defaults() {
        let (_, store) = create_store();
        let data = store.load().unwrap();
        assert_eq!(data.settings.categories, default_categories());
        assert!(data.months.is_empty());
        assert!(!store.exists().unwrap());
    }

    #[test]
    fn test_load_garbage_gives_defaults() {
        let backend = Arc::new(MemoryStore::with_values([(DEFAULT_LEDGER_KEY, "{not json")]));
        let store = LedgerStore::new(backend, DEFAULT_LEDGER_KEY);
        assert_eq!(store.load().unwrap(), AppData::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (backend, store) = create_store();
        store
            .add_entry(march(), Entry::income(date(1), "Salary", Money::from_units(50000)))
            .unwrap();
        store
            .add_entry(
                march(),
                Entry::expense(date(2), "Food", Money::from_cents(1250)).with_note("lunch"),
            )
            .unwrap();

        let before: serde_json::Value =
            serde_json::from_str(&backend.get(DEFAULT_LEDGER_KEY).unwrap().unwrap()).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        let after: serde_json::Value =
            serde_json::from_str(&backend.get(DEFAULT_LEDGER_KEY).unwrap().unwrap()).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_add_entry_prepends() {
        let (_, store) = create_store();
        let first = Entry::expense(date(1), "Food", Money::from_units(10));
        let second = Entry::expense(date(2), "Rent", Money::from_units(900));
        store.add_entry(march(), first.clone()).unwrap();
        store.add_entry(march(), second.clone()).unwrap();

        let entries = store.get_month(march()).unwrap().entries;
        assert_eq!(entries, vec![second, first]);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let (_, store) = create_store();
        let entry = Entry::expense(date(1), "Food", Money::from_units(10));
        store.add_entry(march(), entry.clone()).unwrap();

        let mut edited = entry.clone();
        edited.amount = Money::from_units(15);
        assert!(store.update_entry(march(), edited).unwrap());

        let stored = store.get_month(march()).unwrap();
        assert_eq!(stored.find(&entry.id).unwrap().amount, Money::from_units(15));
    }

    #[test]
    fn test_update_after_remove_is_noop() {
        let (backend, store) = create_store();
        let entry = Entry::expense(date(1), "Food", Money::from_units(10));
        store.add_entry(march(), entry.clone()).unwrap();

        assert_eq!(store.remove_entry(march(), &entry.id).unwrap(), Some(entry.clone()));
        let snapshot = backend.get(DEFAULT_LEDGER_KEY).unwrap();

        assert!(!store.update_entry(march(), entry.clone()).unwrap());
        assert_eq!(backend.get(DEFAULT_LEDGER_KEY).unwrap(), snapshot);
        assert!(store.get_month(march()).unwrap().is_empty());
        assert_eq!(store.remove_entry(march(), &entry.id).unwrap(), None);
    }

    #[test]
    fn test_update_in_untouched_month_writes_nothing() {
        let (backend, store) = create_store();
        let entry = Entry::expense(date(1), "Food", Money::from_units(10));
        assert!(!store.update_entry(march(), entry).unwrap());
        assert_eq!(backend.get(DEFAULT_LEDGER_KEY).unwrap(), None);
    }

    #[test]
    fn test_get_month_does_not_persist() {
        let (backend, store) = create_store();
        let bucket = store.get_month(march()).unwrap();
        assert!(bucket.is_empty());
        assert_eq!(backend.get(DEFAULT_LEDGER_KEY).unwrap(), None);

        store.upsert_month(bucket).unwrap();
        assert!(store.load().unwrap().months.contains_key(&march()));
    }

    #[test]
    fn test_categories() {
        let (_, store) = create_store();
        store
            .set_categories(vec!["Food".into(), "Rent".into()])
            .unwrap();
        assert_eq!(store.get_categories().unwrap(), vec!["Food", "Rent"]);
    }

    #[test]
    fn test_unrelated_write_keeps_readable_months() {
        let damaged = r#"{
            "months": {
                "2024-03": {
                    "month": "2024-03",
                    "entries": [
                        {"id": "big", "type": "income", "date": "2024-03-01",
                         "category": "Salary", "note": "", "amount": 1e18, "planned": false},
                        {"id": "broken", "type": "expense", "date": "not a date",
                         "category": "Food", "note": "", "amount": 5, "planned": false}
                    ]
                },
                "2024-04": {"month": "2024-04", "entries": []}
            },
            "settings": {"categories": ["Salary"]}
        }"#;
        let backend = Arc::new(MemoryStore::with_values([(DEFAULT_LEDGER_KEY, damaged)]));
        let store = LedgerStore::new(backend.clone(), DEFAULT_LEDGER_KEY);

        store
            .set_categories(vec!["Food".into(), "Rent".into()])
            .unwrap();

        let data = store.load().unwrap();
        assert_eq!(data.months.len(), 2);
        let march_entries = &data.month(march()).entries;
        assert_eq!(march_entries.len(), 1);
        assert_eq!(march_entries[0].amount, Money::from_units(1_000_000_000_000_000_000));
        assert_eq!(data.settings.categories, vec!["Food", "Rent"]);

        let copies = store.unrecovered_copies().unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(backend.get(&copies[0]).unwrap().as_deref(), Some(damaged));

        // The rewritten record is clean, so later writes keep no further copies
        store.set_categories(vec!["Food".into()]).unwrap();
        assert_eq!(store.unrecovered_copies().unwrap().len(), 1);
    }

    #[test]
    fn test_clean_record_keeps_no_copy() {
        let (_, store) = create_store();
        store
            .add_entry(march(), Entry::expense(date(1), "Food", Money::from_units(10)))
            .unwrap();
        store.set_categories(vec!["Food".into()]).unwrap();
        assert!(store.unrecovered_copies().unwrap().is_empty());
    }

    #[test]
    fn test_fractional_amount_survives_save_load() {
        let raw = r#"{"months":{"2024-03":{"month":"2024-03","entries":[{"id":"a","type":"expense","date":"2024-03-04","category":"Food","note":"","amount":12.345,"planned":false}]}},"settings":{"categories":["Food"]}}"#;
        let backend = Arc::new(MemoryStore::with_values([(DEFAULT_LEDGER_KEY, raw)]));
        let store = LedgerStore::new(backend.clone(), DEFAULT_LEDGER_KEY);

        store.save(&store.load().unwrap()).unwrap();

        let before: serde_json::Value = serde_json::from_str(raw).unwrap();
        let after: serde_json::Value =
            serde_json::from_str(&backend.get(DEFAULT_LEDGER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_stores_share_backend() {
        let (backend, store) = create_store();
        let other = LedgerStore::new(backend, DEFAULT_LEDGER_KEY);
        store
            .add_entry(march(), Entry::expense(date(3), "Food", Money::from_units(5)))
            .unwrap();
        assert_eq!(other.load().unwrap().entry_count(), 1);
    }
}
