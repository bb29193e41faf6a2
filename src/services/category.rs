//! Category service
//!
//! Maintains the ordered global category list stored in the ledger settings.
//! Entries keep their category text when a category is removed or renamed.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::default_categories;
use crate::storage::Storage;

/// Service for the global category list
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Categories in display order
    pub fn list(&self) -> LedgerResult<Vec<String>> {
        self.storage.ledger.get_categories()
    }

    /// Append a category
    ///
    /// The name is trimmed. Returns false, without writing, if it is already
    /// in the list.
    pub fn add(&self, name: &str) -> LedgerResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Category name cannot be empty".into()));
        }

        let mut categories = self.list()?;
        if categories.iter().any(|c| c == name) {
            return Ok(false);
        }

        categories.push(name.to_string());
        self.storage.ledger.set_categories(categories)?;

        self.storage
            .log_create(EntityType::Category, name, None, &name)?;
        Ok(true)
    }

    /// Remove a category from the list
    pub fn remove(&self, name: &str) -> LedgerResult<()> {
        let name = name.trim();
        let mut categories = self.list()?;
        let before = categories.len();
        categories.retain(|c| c != name);
        if categories.len() == before {
            return Err(LedgerError::category_not_found(name));
        }

        self.storage.ledger.set_categories(categories)?;
        self.storage
            .log_delete(EntityType::Category, name, None, &name)?;
        Ok(())
    }

    /// Move a category to `index`; indexes past the end move it last
    pub fn move_to(&self, name: &str, index: usize) -> LedgerResult<Vec<String>> {
        let name = name.trim();
        let before = self.list()?;
        let from = before
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| LedgerError::category_not_found(name))?;

        let mut after = before.clone();
        let moved = after.remove(from);
        let index = index.min(after.len());
        after.insert(index, moved);

        if after != before {
            self.storage.ledger.set_categories(after.clone())?;
            self.storage
                .log_update(EntityType::Category, name, None, &before, &after)?;
        }
        Ok(after)
    }

    /// Restore the default list
    pub fn reset(&self) -> LedgerResult<Vec<String>> {
        let before = self.list()?;
        let after = default_categories();
        self.storage.ledger.set_categories(after.clone())?;
        self.storage
            .log_update(EntityType::Category, "categories", None, &before, &after)?;
        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_defaults() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        assert_eq!(service.list().unwrap(), default_categories());
    }

    #[test]
    fn test_add_trims_and_dedupes() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);

        assert!(service.add("  Gifts  ").unwrap());
        assert!(!service.add("Gifts").unwrap());
        assert!(!service.add("Food").unwrap());

        let list = service.list().unwrap();
        assert_eq!(list.last().map(String::as_str), Some("Gifts"));
        assert_eq!(list.iter().filter(|c| *c == "Gifts").count(), 1);

        assert!(service.add("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_remove() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        service.remove("Misc").unwrap();
        assert!(!service.list().unwrap().contains(&"Misc".to_string()));
        assert!(service.remove("Misc").unwrap_err().is_not_found());
    }

    #[test]
    fn test_move_to() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        storage
            .ledger
            .set_categories(vec!["A".into(), "B".into(), "C".into()])
            .unwrap();

        assert_eq!(service.move_to("C", 0).unwrap(), vec!["C", "A", "B"]);
        assert_eq!(service.move_to("C", 99).unwrap(), vec!["A", "B", "C"]);
        assert_eq!(service.list().unwrap(), vec!["A", "B", "C"]);
        assert!(service.move_to("Z", 0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_reset() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        storage.ledger.set_categories(vec![]).unwrap();
        assert_eq!(service.reset().unwrap(), default_categories());
    }
}
