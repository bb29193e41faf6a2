//! Category breakdowns
//!
//! Expense totals grouped by category, plus the per-category planned and
//! actual sums the budget overlay is reconciled against.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::display::{format_bar, format_percentage, separator, MoneyFormat};
use crate::error::LedgerResult;
use crate::models::{CategoryTotal, Entry, Money, MonthKey};
use crate::storage::Storage;

/// Which expense entries a breakdown covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownScope {
    /// Planned and actual expenses
    #[default]
    AllExpenses,
    /// Realized expenses only
    ActualExpenses,
}

impl BreakdownScope {
    fn includes(&self, entry: &Entry) -> bool {
        entry.kind.is_expense()
            && match self {
                Self::AllExpenses => true,
                Self::ActualExpenses => !entry.planned,
            }
    }
}

impl fmt::Display for BreakdownScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllExpenses => write!(f, "all expenses"),
            Self::ActualExpenses => write!(f, "actual expenses"),
        }
    }
}

/// One category's share of the scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub category: String,
    pub total: Money,
    pub count: usize,
    pub percentage: f64,
}

/// Group in-scope expenses by category
///
/// Rows are ordered by total descending, ties by category name.
pub fn category_breakdown(entries: &[Entry], scope: BreakdownScope) -> Vec<BreakdownRow> {
    let mut sums: HashMap<&str, (Money, usize)> = HashMap::new();
    for entry in entries.iter().filter(|e| scope.includes(e)) {
        let slot = sums.entry(entry.category.as_str()).or_default();
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    let grand: Money = sums.values().map(|(total, _)| *total).sum();

    let mut rows: Vec<BreakdownRow> = sums
        .into_iter()
        .map(|(category, (total, count))| BreakdownRow {
            category: category.to_string(),
            total,
            count,
            percentage: if grand.is_positive() {
                total.as_decimal() / grand.as_decimal() * 100.0
            } else {
                0.0
            },
        })
        .collect();

    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    rows
}

fn sum_by_category<'a>(entries: impl Iterator<Item = &'a Entry>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for entry in entries {
        match totals.iter_mut().find(|t| t.category == entry.category) {
            Some(total) => total.amount += entry.amount,
            None => totals.push(CategoryTotal::new(entry.category.clone(), entry.amount)),
        }
    }
    totals
}

/// Sum of planned entries (income and expense) per category, in first-appearance order
pub fn planned_by_category(entries: &[Entry]) -> Vec<CategoryTotal> {
    sum_by_category(entries.iter().filter(|e| e.planned))
}

/// Sum of actual entries (income and expense) per category, in first-appearance order
pub fn actual_by_category(entries: &[Entry]) -> Vec<CategoryTotal> {
    sum_by_category(entries.iter().filter(|e| !e.planned))
}

/// Category breakdown report for one month or the whole ledger
#[derive(Debug, Clone)]
pub struct BreakdownReport {
    pub month: Option<MonthKey>,
    pub scope: BreakdownScope,
    pub rows: Vec<BreakdownRow>,
    pub total: Money,
}

impl BreakdownReport {
    /// Build the report; `month: None` covers every stored month
    pub fn generate(
        storage: &Storage,
        month: Option<MonthKey>,
        scope: BreakdownScope,
    ) -> LedgerResult<Self> {
        let entries: Vec<Entry> = match month {
            Some(month) => storage.ledger.get_month(month)?.entries,
            None => storage.ledger.load()?.all_entries().cloned().collect(),
        };

        let rows = category_breakdown(&entries, scope);
        let total = rows.iter().map(|r| r.total).sum();
        Ok(Self {
            month,
            scope,
            rows,
            total,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, money: &MoneyFormat) -> String {
        let mut output = String::new();
        let period = self
            .month
            .map(|m| m.to_string())
            .unwrap_or_else(|| "all months".to_string());

        output.push_str(&format!("Category breakdown: {} ({})\n", period, self.scope));
        output.push_str(&separator(72));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No expenses recorded.\n");
            return output;
        }

        let max = self
            .rows
            .iter()
            .map(|r| r.total.as_decimal())
            .fold(0.0, f64::max);

        for row in &self.rows {
            output.push_str(&format!(
                "{:<18} {} {:>14} {:>6}\n",
                row.category,
                format_bar(row.total.as_decimal(), max, 24),
                money.format(row.total),
                format_percentage(row.percentage)
            ));
        }

        output.push_str(&separator(72));
        output.push('\n');
        output.push_str(&format!("{:<43} {:>14}\n", "Total", money.format(self.total)));
        output
    }

    /// Write the rows as CSV
    pub fn export_csv<W: std::io::Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| crate::error::LedgerError::Export(e.to_string());

        csv.write_record(["category", "total", "count", "percentage"])
            .map_err(export_err)?;
        for row in &self.rows {
            csv.write_record([
                row.category.clone(),
                row.total.format_with_symbol(""),
                row.count.to_string(),
                format!("{:.2}", row.percentage),
            ])
            .map_err(export_err)?;
        }
        csv.flush()
            .map_err(|e| crate::error::LedgerError::Export(e.to_string()))
    }
}
