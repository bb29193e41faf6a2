//! Budget service
//!
//! Reconciles a month's saved budget lines with the category list and the
//! month's planned entries, and applies user edits to the result.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::budget::{
    add_budget_category, merge_budgets, remove_budget_category, set_budget_amount,
};
use crate::models::{CategoryBudget, Money, MonthKey};
use crate::reports::{planned_by_category, BudgetComparison};
use crate::storage::Storage;

/// Service for per-month budgets
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

fn line_id(month: MonthKey, category: &str) -> String {
    format!("{}/{}", month, category)
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The month's merged budget lines
    ///
    /// The merged list is written back when it differs from what was saved.
    pub fn load_merged(&self, month: MonthKey) -> LedgerResult<Vec<CategoryBudget>> {
        let data = self.storage.ledger.load()?;
        let planned = planned_by_category(&data.month(month).entries);
        let saved = self.storage.budgets.load(month)?;

        let merged = merge_budgets(&data.settings.categories, &planned, saved.as_deref());

        if saved.as_ref() != Some(&merged) {
            tracing::debug!(month = %month, lines = merged.len(), "persisting merged budget");
            self.storage.budgets.save(month, &merged)?;
        }
        Ok(merged)
    }

    /// Set the amount of an existing line
    ///
    /// Any amount is stored, negatives included, and the returned line shows
    /// it. An amount of zero or less does not stick: the next
    /// [`BudgetService::load_merged`] replaces it with the category's planned
    /// total (or zero when nothing is planned).
    pub fn set_amount(
        &self,
        month: MonthKey,
        category: &str,
        amount: Money,
    ) -> LedgerResult<CategoryBudget> {
        let mut lines = self.load_merged(month)?;
        let before = lines
            .iter()
            .find(|b| b.category == category)
            .cloned()
            .ok_or_else(|| LedgerError::budget_not_found(line_id(month, category)))?;

        set_budget_amount(&mut lines, category, amount);
        self.storage.budgets.save(month, &lines)?;

        let after = CategoryBudget::new(category, amount);
        self.storage.log_update(
            EntityType::Budget,
            line_id(month, category),
            None,
            &before,
            &after,
        )?;
        Ok(after)
    }

    /// Append a line for a category that has none yet
    pub fn add_category(
        &self,
        month: MonthKey,
        category: &str,
        amount: Money,
    ) -> LedgerResult<CategoryBudget> {
        let category = category.trim();
        if category.is_empty() {
            return Err(LedgerError::Validation(
                "Budget category cannot be empty".into(),
            ));
        }

        let mut lines = self.load_merged(month)?;
        if lines.iter().any(|b| b.category == category) {
            return Err(LedgerError::Duplicate {
                entity_type: "Budget",
                identifier: line_id(month, category),
            });
        }

        add_budget_category(&mut lines, category, amount);
        self.storage.budgets.save(month, &lines)?;

        let line = CategoryBudget::new(category, amount);
        self.storage
            .log_create(EntityType::Budget, line_id(month, category), None, &line)?;
        Ok(line)
    }

    /// Drop a category's line
    ///
    /// A category still in the global list or with planned entries comes
    /// back on the next merge, seeded from its planned total.
    pub fn remove_category(&self, month: MonthKey, category: &str) -> LedgerResult<CategoryBudget> {
        let mut lines = self.load_merged(month)?;
        let removed = lines
            .iter()
            .find(|b| b.category == category)
            .cloned()
            .ok_or_else(|| LedgerError::budget_not_found(line_id(month, category)))?;

        remove_budget_category(&mut lines, category);
        self.storage.budgets.save(month, &lines)?;

        self.storage.log_delete(
            EntityType::Budget,
            line_id(month, category),
            None,
            &removed,
        )?;
        Ok(removed)
    }

    /// Merged budget lines of the month against its actual entries
    pub fn comparison(
        &self,
        month: MonthKey,
        income_categories: &[String],
    ) -> LedgerResult<BudgetComparison> {
        let lines = self.load_merged(month)?;
        let entries = self.storage.ledger.get_month(month)?.entries;
        Ok(BudgetComparison::compute(
            month,
            &lines,
            &entries,
            income_categories,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{budget::total_for, CategoryTotal, Entry};
    use chrono::NaiveDate;

    fn march() -> MonthKey {
        MonthKey::new(2024, 3).unwrap()
    }

    fn setup() -> Storage {
        let storage = Storage::in_memory();
        storage
            .ledger
            .set_categories(vec!["Food".into(), "Salary".into()])
            .unwrap();
        storage
    }

    fn planned_food(storage: &Storage, units: i64) {
        storage
            .ledger
            .add_entry(
                march(),
                Entry::expense(
                    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    "Food",
                    Money::from_units(units),
                )
                .with_planned(true),
            )
            .unwrap();
    }

    fn amounts(lines: &[CategoryBudget]) -> Vec<CategoryTotal> {
        lines
            .iter()
            .map(|l| CategoryTotal::new(l.category.clone(), l.budget_amount))
            .collect()
    }

    #[test]
    fn test_load_merged_seeds_and_persists() {
        let storage = setup();
        planned_food(&storage, 1000);
        let service = BudgetService::new(&storage);

        let merged = service.load_merged(march()).unwrap();
        assert_eq!(
            merged,
            vec![
                CategoryBudget::new("Food", Money::from_units(1000)),
                CategoryBudget::new("Salary", Money::zero()),
            ]
        );
        assert_eq!(storage.budgets.load(march()).unwrap(), Some(merged.clone()));

        // Stable on reload
        assert_eq!(service.load_merged(march()).unwrap(), merged);
    }

    #[test]
    fn test_set_amount_overrides_planned() {
        let storage = setup();
        planned_food(&storage, 1000);
        let service = BudgetService::new(&storage);

        service
            .set_amount(march(), "Food", Money::from_units(1500))
            .unwrap();
        let lines = service.load_merged(march()).unwrap();
        assert_eq!(total_for(&amounts(&lines), "Food"), Some(Money::from_units(1500)));

        // Zero falls back to the planned total on the next merge
        service.set_amount(march(), "Food", Money::zero()).unwrap();
        let lines = service.load_merged(march()).unwrap();
        assert_eq!(total_for(&amounts(&lines), "Food"), Some(Money::from_units(1000)));

        assert!(service
            .set_amount(march(), "Travel", Money::from_units(1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_negative_amount_is_replaced_on_next_merge() {
        let storage = setup();
        planned_food(&storage, 1000);
        let service = BudgetService::new(&storage);

        let line = service
            .set_amount(march(), "Food", Money::from_units(-200))
            .unwrap();
        assert_eq!(line.budget_amount, Money::from_units(-200));
        let saved = storage.budgets.load(march()).unwrap().unwrap();
        assert_eq!(total_for(&amounts(&saved), "Food"), Some(Money::from_units(-200)));

        let lines = service.load_merged(march()).unwrap();
        assert_eq!(total_for(&amounts(&lines), "Food"), Some(Money::from_units(1000)));

        service
            .set_amount(march(), "Salary", Money::from_units(-5))
            .unwrap();
        let lines = service.load_merged(march()).unwrap();
        assert_eq!(total_for(&amounts(&lines), "Salary"), Some(Money::zero()));
    }

    #[test]
    fn test_add_and_remove_category() {
        let storage = setup();
        let service = BudgetService::new(&storage);

        service
            .add_category(march(), " Travel ", Money::from_units(3000))
            .unwrap();
        let lines = service.load_merged(march()).unwrap();
        assert_eq!(lines.last().unwrap().category, "Travel");

        let dup = service
            .add_category(march(), "Food", Money::from_units(1))
            .unwrap_err();
        assert!(matches!(dup, LedgerError::Duplicate { .. }));
        assert!(service
            .add_category(march(), "", Money::from_units(1))
            .unwrap_err()
            .is_validation());

        service.remove_category(march(), "Travel").unwrap();
        let lines = service.load_merged(march()).unwrap();
        assert!(lines.iter().all(|l| l.category != "Travel"));
        assert!(service
            .remove_category(march(), "Travel")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_comparison() {
        let storage = setup();
        planned_food(&storage, 1000);
        storage
            .ledger
            .add_entry(
                march(),
                Entry::expense(
                    NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
                    "Food",
                    Money::from_units(250),
                ),
            )
            .unwrap();
        let service = BudgetService::new(&storage);

        let cmp = service
            .comparison(march(), &["Salary".to_string()])
            .unwrap();
        assert_eq!(cmp.rows[0].remaining, Money::from_units(750));
        assert_eq!(cmp.total_spent, Money::from_units(250));
        assert_eq!(cmp.chart_rows().count(), 1);
    }
}
