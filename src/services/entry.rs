//! Entry service
//!
//! Validation, recurring entries and cross-month relocation on top of the
//! ledger repository.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::month::add_months_clamped;
use crate::models::{Entry, EntryId, EntryType, MonthKey};
use crate::storage::Storage;

/// Filter for listing entries
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub kind: Option<EntryType>,
    /// `Some(true)` for planned only, `Some(false)` for actual only
    pub planned: Option<bool>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl EntryFilter {
    pub fn kind(mut self, kind: EntryType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn planned(mut self, planned: bool) -> Self {
        self.planned = Some(planned);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn matches(&self, entry: &Entry) -> bool {
        self.kind.map_or(true, |k| entry.kind == k)
            && self.planned.map_or(true, |p| entry.planned == p)
            && self
                .category
                .as_deref()
                .map_or(true, |c| entry.category.eq_ignore_ascii_case(c))
    }
}

/// Service for entry management
pub struct EntryService<'a> {
    storage: &'a Storage,
}

fn audit_name(entry: &Entry) -> Option<String> {
    Some(format!("{} {} {}", entry.date, entry.kind, entry.category))
}

impl<'a> EntryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn validate(entry: &Entry) -> LedgerResult<()> {
        entry
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))
    }

    /// Store a new entry in the month its date belongs to
    pub fn add(&self, mut entry: Entry) -> LedgerResult<Entry> {
        entry.category = entry.category.trim().to_string();
        Self::validate(&entry)?;

        self.storage.ledger.add_entry(entry.month_key(), entry.clone())?;

        self.storage.log_create(
            EntityType::Entry,
            entry.id.as_str(),
            audit_name(&entry),
            &entry,
        )?;

        Ok(entry)
    }

    /// Store `entry` and `months - 1` copies, one calendar month apart
    ///
    /// Each copy gets a fresh id; days past a month's end are clamped to its
    /// last day. All copies are written in one save.
    pub fn add_recurring(&self, mut entry: Entry, months: u32) -> LedgerResult<Vec<Entry>> {
        if months == 0 {
            return Err(LedgerError::Validation(
                "Recurring entries need at least one month".into(),
            ));
        }
        entry.category = entry.category.trim().to_string();
        Self::validate(&entry)?;

        let mut created = vec![entry.clone()];
        for offset in 1..months {
            let date = add_months_clamped(entry.date, offset).ok_or_else(|| {
                LedgerError::Validation(format!("Date out of range {} months after {}", offset, entry.date))
            })?;
            created.push(entry.duplicate_on(date));
        }

        self.storage.ledger.modify(|data| {
            for copy in &created {
                data.month_mut(copy.month_key()).prepend(copy.clone());
            }
        })?;

        for copy in &created {
            self.storage
                .log_create(EntityType::Entry, copy.id.as_str(), audit_name(copy), copy)?;
        }

        Ok(created)
    }

    /// Fetch an entry from a specific month
    pub fn get(&self, month: MonthKey, id: &EntryId) -> LedgerResult<Option<Entry>> {
        Ok(self.storage.ledger.get_month(month)?.find(id).cloned())
    }

    /// Find an entry anywhere in the ledger by full id or unique id prefix
    ///
    /// Returns the month bucket that holds the entry along with it. That is
    /// the key to edit or remove it under, even when the bucket does not
    /// match the entry's date.
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<(MonthKey, Entry)>> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }

        let data = self.storage.ledger.load()?;
        let located = || {
            data.months
                .iter()
                .flat_map(|(month, bucket)| bucket.entries.iter().map(move |e| (*month, e)))
        };

        if let Some((month, exact)) = located().find(|(_, e)| e.id.as_str() == identifier) {
            return Ok(Some((month, exact.clone())));
        }

        let mut matches = located().filter(|(_, e)| e.id.matches_prefix(identifier));
        match (matches.next(), matches.next()) {
            (Some((month, only)), None) => Ok(Some((month, only.clone()))),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(LedgerError::Validation(format!(
                "Entry id prefix '{}' is ambiguous",
                identifier
            ))),
        }
    }

    /// Replace an entry stored in `original_month`
    ///
    /// When the new date falls in another month the entry is moved there
    /// (prepended, like a new addition). Fails with `NotFound` when the id
    /// is not in `original_month`; nothing is written in that case.
    pub fn update(&self, original_month: MonthKey, mut entry: Entry) -> LedgerResult<Entry> {
        entry.category = entry.category.trim().to_string();
        Self::validate(&entry)?;

        let before = self.storage.ledger.try_modify(|data| {
            let before = data
                .months
                .get(&original_month)
                .and_then(|bucket| bucket.find(&entry.id))
                .cloned()
                .ok_or_else(|| LedgerError::entry_not_found(entry.id.as_str()))?;

            let target = entry.month_key();
            if target == original_month {
                data.month_mut(original_month).replace(entry.clone());
            } else {
                data.month_mut(original_month).remove(&entry.id);
                data.month_mut(target).prepend(entry.clone());
                tracing::debug!(id = %entry.id, from = %original_month, to = %target, "moved entry");
            }
            Ok(before)
        })?;

        self.storage.log_update(
            EntityType::Entry,
            entry.id.as_str(),
            audit_name(&entry),
            &before,
            &entry,
        )?;

        Ok(entry)
    }

    /// Delete an entry from `month`, returning it
    pub fn remove(&self, month: MonthKey, id: &EntryId) -> LedgerResult<Entry> {
        let removed = self
            .storage
            .ledger
            .remove_entry(month, id)?
            .ok_or_else(|| LedgerError::entry_not_found(id.as_str()))?;

        self.storage.log_delete(
            EntityType::Entry,
            removed.id.as_str(),
            audit_name(&removed),
            &removed,
        )?;

        Ok(removed)
    }

    /// Entries of a month, oldest date first
    pub fn list(&self, month: MonthKey, filter: &EntryFilter) -> LedgerResult<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .storage
            .ledger
            .get_month(month)?
            .entries
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();

        entries.sort_by_key(|e| e.date);

        if let Some(limit) = filter.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}
