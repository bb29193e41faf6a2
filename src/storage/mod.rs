//! Storage layer
//!
//! Everything persists through the [`KeyValueStore`] port. The [`Storage`]
//! coordinator bundles a backend with the ledger and budget repositories and
//! the audit logger.

pub mod budgets;
pub mod events;
pub mod file_io;
pub mod file_store;
pub mod kv;
pub mod ledger;
pub mod watch;

pub use budgets::{budget_key, BudgetStore, BUDGET_KEY_PREFIX};
pub use events::{ChangeEvent, ChangeNotifier, SubscriptionId};
pub use file_store::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use ledger::{LedgerStore, DEFAULT_LEDGER_KEY, LEDGER_KEY_FAMILY};
pub use watch::{is_relevant_key, LedgerView};

use std::sync::Arc;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::LedgerResult;

/// Main storage coordinator
pub struct Storage {
    paths: Option<LedgerPaths>,
    backend: Arc<dyn KeyValueStore>,
    pub ledger: LedgerStore,
    pub budgets: BudgetStore,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open the directory-backed store described by `paths`
    pub fn new(paths: LedgerPaths, settings: &Settings) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(paths.data_dir())?);
        let audit = settings
            .audit_enabled
            .then(|| AuditLogger::new(paths.audit_log()));

        let mut storage = Self::with_backend(backend, &settings.storage_key);
        storage.audit = audit;
        storage.paths = Some(paths);
        Ok(storage)
    }

    /// Wrap an arbitrary backend, without audit logging
    pub fn with_backend(backend: Arc<dyn KeyValueStore>, ledger_key: &str) -> Self {
        Self {
            paths: None,
            ledger: LedgerStore::new(Arc::clone(&backend), ledger_key),
            budgets: BudgetStore::new(Arc::clone(&backend)),
            backend,
            audit: None,
        }
    }

    /// Throwaway in-memory storage
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryStore::new()), DEFAULT_LEDGER_KEY)
    }

    /// Builder-style: attach an audit logger
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn paths(&self) -> Option<&LedgerPaths> {
        self.paths.as_ref()
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// A live view that reloads on every relevant change
    pub fn watch(&self) -> LedgerResult<LedgerView> {
        LedgerView::new(Arc::clone(&self.backend), self.ledger.clone())
    }

    /// Remove every key from the backend
    pub fn clear_all(&self) -> LedgerResult<()> {
        let before = self.ledger.load()?;
        self.backend.clear()?;
        tracing::info!("cleared all stored data");
        self.log_delete(EntityType::Ledger, self.ledger.key(), None, &before)
    }

    /// Record a create in the audit log, if enabled
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        value: &T,
    ) -> LedgerResult<()> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::create(entity_type, entity_id, entity_name, value)),
            None => Ok(()),
        }
    }

    /// Record an update in the audit log, if enabled
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        let Some(logger) = &self.audit else {
            return Ok(());
        };

        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        logger.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete in the audit log, if enabled
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        value: &T,
    ) -> LedgerResult<()> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::delete(entity_type, entity_id, entity_name, value)),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("paths", &self.paths)
            .field("ledger", &self.ledger)
            .field("audit", &self.audit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{CategoryBudget, Money, MonthKey};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();

        assert!(temp_dir.path().join("data").is_dir());
        assert!(storage.audit().is_some());
        assert!(!storage.ledger.exists().unwrap());
    }

    #[test]
    fn test_file_backed_ledger_persists() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        {
            let storage = Storage::new(paths.clone(), &Settings::default()).unwrap();
            storage.ledger.set_categories(vec!["Food".into()]).unwrap();
        }

        assert!(temp_dir
            .path()
            .join("data")
            .join("notebook-expense-tracker-v1.json")
            .exists());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        assert_eq!(storage.ledger.get_categories().unwrap(), vec!["Food"]);
    }

    #[test]
    fn test_audit_disabled_by_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            audit_enabled: false,
            ..Settings::default()
        };
        let storage = Storage::new(paths, &settings).unwrap();
        storage
            .log_create(EntityType::Category, "Food", None, &"Food")
            .unwrap();
        assert!(!temp_dir.path().join("audit.log").exists());
    }

    #[test]
    fn test_clear_all_removes_every_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::in_memory().with_audit(AuditLogger::new(temp_dir.path().join("audit.log")));
        let march = MonthKey::new(2024, 3).unwrap();

        storage.ledger.set_categories(vec!["Food".into()]).unwrap();
        storage
            .budgets
            .save(march, &[CategoryBudget::new("Food", Money::from_units(10))])
            .unwrap();

        storage.clear_all().unwrap();

        assert!(storage.backend().keys().unwrap().is_empty());
        assert!(storage.budgets.load(march).unwrap().is_none());
        let entries = storage.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.last().unwrap().operation, Operation::Delete);
        assert_eq!(entries.last().unwrap().entity_type, EntityType::Ledger);
    }

    #[test]
    fn test_log_update_records_diff() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::in_memory().with_audit(AuditLogger::new(temp_dir.path().join("audit.log")));

        let before = CategoryBudget::new("Food", Money::from_units(100));
        let after = CategoryBudget::new("Food", Money::from_units(150));
        storage
            .log_update(EntityType::Budget, "2024-03/Food", None, &before, &after)
            .unwrap();

        let entries = storage.audit().unwrap().read_all().unwrap();
        assert_eq!(
            entries[0].diff_summary.as_deref(),
            Some("budgetAmount: 100 -> 150")
        );
    }
}
