//! Budget overlay repository
//!
//! Each month's budget lines live under their own key, `budgets-YYYY-MM`,
//! separate from the ledger aggregate.

use std::sync::Arc;

use crate::error::LedgerResult;
use crate::models::{CategoryBudget, MonthKey};

use super::kv::KeyValueStore;

/// Prefix of every budget key
pub const BUDGET_KEY_PREFIX: &str = "budgets-";

/// Storage key for a month's budget lines
pub fn budget_key(month: MonthKey) -> String {
    format!("{}{}", BUDGET_KEY_PREFIX, month)
}

/// Repository for per-month budget lines
#[derive(Clone)]
pub struct BudgetStore {
    backend: Arc<dyn KeyValueStore>,
}

impl BudgetStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Saved lines for a month
    ///
    /// Returns `None` when nothing is saved or the record is unreadable.
    pub fn load(&self, month: MonthKey) -> LedgerResult<Option<Vec<CategoryBudget>>> {
        let key = budget_key(month);
        let Some(raw) = self.backend.get(&key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(lines) => Ok(Some(lines)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "ignoring malformed budget record");
                Ok(None)
            }
        }
    }

    /// Overwrite a month's lines
    pub fn save(&self, month: MonthKey, lines: &[CategoryBudget]) -> LedgerResult<()> {
        let json = serde_json::to_string(lines)?;
        self.backend.set(&budget_key(month), &json)
    }

    /// Delete a month's saved lines
    pub fn remove(&self, month: MonthKey) -> LedgerResult<()> {
        self.backend.remove(&budget_key(month))
    }

    /// Months with saved lines, ascending
    pub fn months(&self) -> LedgerResult<Vec<MonthKey>> {
        let mut months: Vec<MonthKey> = self
            .backend
            .keys()?
            .iter()
            .filter_map(|key| key.strip_prefix(BUDGET_KEY_PREFIX))
            .filter_map(|suffix| MonthKey::parse(suffix).ok())
            .collect();
        months.sort();
        Ok(months)
    }
}

impl std::fmt::Debug for BudgetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetStore").finish_non_exhaustive()
    }
}
