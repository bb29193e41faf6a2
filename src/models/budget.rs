//! Per-month budget overlay
//!
//! A month's budget is an ordered list of [`CategoryBudget`] lines stored
//! separately from the ledger aggregate. The list is reconciled against the
//! month's planned entries every time it is viewed; the functions here are
//! the pure transforms behind that reconciliation and behind user edits.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::money::Money;

/// Budgeted amount for one category in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudget {
    pub category: String,
    pub budget_amount: Money,
}

impl CategoryBudget {
    pub fn new(category: impl Into<String>, budget_amount: Money) -> Self {
        Self {
            category: category.into(),
            budget_amount,
        }
    }
}

/// Sum of amounts for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
}

impl CategoryTotal {
    pub fn new(category: impl Into<String>, amount: Money) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Look up a category's total in an ordered totals list
pub fn total_for(totals: &[CategoryTotal], category: &str) -> Option<Money> {
    totals
        .iter()
        .find(|t| t.category == category)
        .map(|t| t.amount)
}

/// Reconcile saved budget lines with the category list and planned totals
///
/// The result covers every category in `categories`, then every category in
/// `planned_totals`, then every category in `saved`, each once and in that
/// order. A line keeps its saved amount when that amount is positive;
/// otherwise it takes the planned total (or zero).
///
/// Feeding the output back in as `saved` with the same planned totals
/// returns the same list.
pub fn merge_budgets(
    categories: &[String],
    planned_totals: &[CategoryTotal],
    saved: Option<&[CategoryBudget]>,
) -> Vec<CategoryBudget> {
    let saved = saved.unwrap_or(&[]);

    let mut seen = HashSet::new();
    let union = categories
        .iter()
        .map(String::as_str)
        .chain(planned_totals.iter().map(|t| t.category.as_str()))
        .chain(saved.iter().map(|b| b.category.as_str()))
        .filter(|c| seen.insert(*c));

    union
        .map(|category| {
            let saved_amount = saved
                .iter()
                .find(|b| b.category == category)
                .map(|b| b.budget_amount);
            let amount = match saved_amount {
                Some(amount) if amount.is_positive() => amount,
                _ => total_for(planned_totals, category).unwrap_or_default(),
            };
            CategoryBudget::new(category, amount)
        })
        .collect()
}

/// Set the amount of an existing line. Returns false if the category has no line.
///
/// Negative amounts are accepted here; [`merge_budgets`] later treats any
/// amount of zero or less as unset.
pub fn set_budget_amount(budgets: &mut [CategoryBudget], category: &str, amount: Money) -> bool {
    match budgets.iter_mut().find(|b| b.category == category) {
        Some(line) => {
            line.budget_amount = amount;
            true
        }
        None => false,
    }
}

/// Append a new line at the end of the list
pub fn add_budget_category(budgets: &mut Vec<CategoryBudget>, category: &str, amount: Money) {
    budgets.push(CategoryBudget::new(category, amount));
}

/// Remove every line for a category. Returns false if there was none.
pub fn remove_budget_category(budgets: &mut Vec<CategoryBudget>, category: &str) -> bool {
    let before = budgets.len();
    budgets.retain(|b| b.category != category);
    budgets.len() != before
}
