//! Budget versus actual comparison
//!
//! Pairs each budget line of a month with the month's actual amount for the
//! same category.

use serde::Serialize;

use crate::display::{separator, MoneyFormat};
use crate::models::{budget::total_for, CategoryBudget, Entry, Money, MonthKey};

use super::breakdown::actual_by_category;

/// Whether a category's actuals are earnings or spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    Earned,
    Spent,
}

/// One budget line against its actuals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub category: String,
    pub budget: Money,
    pub actual: Money,
    /// Budget left over, never below zero
    pub remaining: Money,
    pub kind: BudgetKind,
}

/// A month's budget lines with their actuals and the headline totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetComparison {
    pub month: MonthKey,
    pub rows: Vec<ComparisonRow>,
    pub total_budget: Money,
    /// Actuals of every non-income category
    pub total_spent: Money,
    /// Actuals of the income categories
    pub total_earned: Money,
    pub net: Money,
}

impl BudgetComparison {
    /// Compare budget lines with the actual entries of the month
    ///
    /// The spent and earned totals cover every actual entry, budgeted or not.
    pub fn compute(
        month: MonthKey,
        budgets: &[CategoryBudget],
        entries: &[Entry],
        income_categories: &[String],
    ) -> Self {
        let actuals = actual_by_category(entries);
        let is_income = |category: &str| income_categories.iter().any(|c| c == category);

        let rows = budgets
            .iter()
            .map(|line| {
                let actual = total_for(&actuals, &line.category).unwrap_or_default();
                ComparisonRow {
                    category: line.category.clone(),
                    budget: line.budget_amount,
                    actual,
                    remaining: (line.budget_amount - actual).clamp_non_negative(),
                    kind: if is_income(&line.category) {
                        BudgetKind::Earned
                    } else {
                        BudgetKind::Spent
                    },
                }
            })
            .collect();

        let total_budget = budgets.iter().map(|b| b.budget_amount).sum();
        let (earned, spent): (Vec<_>, Vec<_>) =
            actuals.iter().partition(|t| is_income(&t.category));
        let total_earned: Money = earned.iter().map(|t| t.amount).sum();
        let total_spent: Money = spent.iter().map(|t| t.amount).sum();

        Self {
            month,
            rows,
            total_budget,
            total_spent,
            total_earned,
            net: total_earned - total_spent,
        }
    }

    /// Rows worth charting: those with a positive budget
    pub fn chart_rows(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|r| r.budget.is_positive())
    }

    /// Format the comparison for terminal display
    pub fn format_terminal(&self, money: &MoneyFormat) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget for {}\n", self.month));
        output.push_str(&separator(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<18} {:>14} {:>14} {:>14} {:>8}\n",
            "Category", "Budget", "Actual", "Remaining", "Kind"
        ));

        for row in &self.rows {
            let kind = match row.kind {
                BudgetKind::Earned => "earned",
                BudgetKind::Spent => "spent",
            };
            output.push_str(&format!(
                "{:<18} {:>14} {:>14} {:>14} {:>8}\n",
                row.category,
                money.format(row.budget),
                money.format(row.actual),
                money.format(row.remaining),
                kind
            ));
        }

        output.push_str(&separator(78));
        output.push('\n');
        output.push_str(&format!("Total budget: {}\n", money.format(self.total_budget)));
        output.push_str(&format!("Total spent:  {}\n", money.format(self.total_spent)));
        output.push_str(&format!("Total earned: {}\n", money.format(self.total_earned)));
        output.push_str(&format!("Net:          {}\n", money.format(self.net)));
        output
    }
}
