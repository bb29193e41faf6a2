//! Directory-backed key-value store
//!
//! Each key is stored as `<key>.json` inside the data directory. Writes go
//! through [`write_atomic`] so a crash never leaves a half-written record.

use std::fs;
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

use super::events::{ChangeEvent, ChangeNotifier};
use super::file_io::{read_text, write_atomic};
use super::kv::KeyValueStore;

const EXTENSION: &str = "json";

/// Key-value store persisting one file per key
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    notifier: ChangeNotifier,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: PathBuf) -> LedgerResult<Self> {
        fs::create_dir_all(&dir).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        Ok(Self {
            dir,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Directory holding the records
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> LedgerResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

/// Keys become file names, so only a conservative character set is allowed
fn validate_key(key: &str) -> LedgerResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(LedgerError::Storage(format!("Invalid storage key: {:?}", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        read_text(self.path_for(key)?)
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        write_atomic(self.path_for(key)?, value)?;
        self.notifier.notify(&ChangeEvent::key(key));
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                self.notifier.notify(&ChangeEvent::key(key));
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LedgerError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn keys(&self) -> LedgerResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to read data directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| LedgerError::Storage(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_store() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("data")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_open_creates_directory() {
        let (temp_dir, _store) = create_store();
        assert!(temp_dir.path().join("data").is_dir());
    }

    #[test]
    fn test_round_trip() {
        let (_temp, store) = create_store();
        assert_eq!(store.get("notebook-expense-tracker-v1").unwrap(), None);

        store.set("notebook-expense-tracker-v1", "{}").unwrap();
        assert_eq!(
            store.get("notebook-expense-tracker-v1").unwrap().as_deref(),
            Some("{}")
        );
        assert!(store
            .path_for("notebook-expense-tracker-v1")
            .unwrap()
            .exists());
    }

    #[test]
    fn test_keys_and_remove() {
        let (_temp, store) = create_store();
        store.set("budgets-2024-03", "[]").unwrap();
        store.set("budgets-2024-01", "[]").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["budgets-2024-01", "budgets-2024-03"]);

        store.remove("budgets-2024-01").unwrap();
        store.remove("budgets-2024-01").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["budgets-2024-03"]);

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (_temp, store) = create_store();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.set("a/b", "x").is_err());
        assert!(store.get("").is_err());
        assert!(store.get(".hidden").is_err());
    }
}
