//! Key-value persistence port
//!
//! The ledger never touches a storage medium directly. It reads and writes
//! string values under string keys through [`KeyValueStore`], which keeps the
//! ledger logic testable against [`MemoryStore`].

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{LedgerError, LedgerResult};

use super::events::{ChangeEvent, ChangeNotifier};

/// Synchronous string-keyed store with change notifications
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> LedgerResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> LedgerResult<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> LedgerResult<()>;

    /// Every key currently present, sorted
    fn keys(&self) -> LedgerResult<Vec<String>>;

    /// Notifier fired after every successful write
    fn notifier(&self) -> &ChangeNotifier;

    /// Remove every key
    fn clear(&self) -> LedgerResult<()> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        self.notifier().notify(&ChangeEvent::cleared());
        Ok(())
    }
}

/// In-memory store, used by tests and for throwaway ledgers
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, String>>,
    notifier: ChangeNotifier,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with values
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: RwLock::new(data),
            notifier: ChangeNotifier::new(),
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Storage(format!("Failed to acquire lock: {}", e))
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        {
            let mut data = self.data.write().map_err(lock_error)?;
            data.insert(key.to_string(), value.to_string());
        }
        self.notifier.notify(&ChangeEvent::key(key));
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        let removed = {
            let mut data = self.data.write().map_err(lock_error)?;
            data.remove(key).is_some()
        };
        if removed {
            self.notifier.notify(&ChangeEvent::key(key));
        }
        Ok(())
    }

    fn keys(&self) -> LedgerResult<Vec<String>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.keys().cloned().collect())
    }

    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}
