//! Month totals
//!
//! Income, expense and net for one month, each split into planned and actual
//! columns.

use serde::Serialize;

use crate::display::{separator, MoneyFormat};
use crate::error::LedgerResult;
use crate::models::{Entry, EntryType, Money, MonthKey};
use crate::storage::Storage;

/// A planned/actual pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlannedActual {
    pub planned: Money,
    pub actual: Money,
}

impl PlannedActual {
    fn add(&mut self, amount: Money, planned: bool) {
        if planned {
            self.planned += amount;
        } else {
            self.actual += amount;
        }
    }
}

/// Totals for one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub income: PlannedActual,
    pub expense: PlannedActual,
    pub net: PlannedActual,
}

/// Sum entries into planned/actual income and expense, and their difference
///
/// Each entry lands in exactly one of the four buckets.
pub fn month_totals(entries: &[Entry]) -> MonthTotals {
    let mut totals = MonthTotals::default();

    for entry in entries {
        match entry.kind {
            EntryType::Income => totals.income.add(entry.amount, entry.planned),
            EntryType::Expense => totals.expense.add(entry.amount, entry.planned),
        }
    }

    totals.net = PlannedActual {
        planned: totals.income.planned - totals.expense.planned,
        actual: totals.income.actual - totals.expense.actual,
    };
    totals
}

/// Month totals report
#[derive(Debug, Clone)]
pub struct TotalsReport {
    pub month: MonthKey,
    pub totals: MonthTotals,
    pub entry_count: usize,
    pub planned_count: usize,
}

impl TotalsReport {
    pub fn generate(storage: &Storage, month: MonthKey) -> LedgerResult<Self> {
        let bucket = storage.ledger.get_month(month)?;
        Ok(Self::from_entries(month, &bucket.entries))
    }

    pub fn from_entries(month: MonthKey, entries: &[Entry]) -> Self {
        Self {
            month,
            totals: month_totals(entries),
            entry_count: entries.len(),
            planned_count: entries.iter().filter(|e| e.planned).count(),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, money: &MoneyFormat) -> String {
        let mut output = String::new();

        output.push_str(&format!("Totals for {}\n", self.month));
        output.push_str(&separator(48));
        output.push('\n');
        output.push_str(&format!("{:<12} {:>16} {:>16}\n", "", "Planned", "Actual"));

        let rows = [
            ("Income", self.totals.income),
            ("Expense", self.totals.expense),
            ("Net", self.totals.net),
        ];
        for (label, pair) in rows {
            output.push_str(&format!(
                "{:<12} {:>16} {:>16}\n",
                label,
                money.format(pair.planned),
                money.format(pair.actual)
            ));
        }

        output.push_str(&separator(48));
        output.push('\n');
        output.push_str(&format!(
            "{} entries ({} planned)\n",
            self.entry_count, self.planned_count
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(month_totals(&[]), MonthTotals::default());
        assert_eq!(month_totals(&[]).net.actual, Money::zero());
    }

    #[test]
    fn test_march_scenario() {
        let entries = vec![
            Entry::income(date(1), "Salary", Money::from_units(50000)),
            Entry::income(date(1), "Salary", Money::from_units(50000)).with_planned(true),
            Entry::expense(date(3), "Rent", Money::from_units(12000)),
        ];
        let totals = month_totals(&entries);

        assert_eq!(totals.income.actual, Money::from_units(50000));
        assert_eq!(totals.income.planned, Money::from_units(50000));
        assert_eq!(totals.expense.actual, Money::from_units(12000));
        assert_eq!(totals.expense.planned, Money::zero());
        assert_eq!(totals.net.actual, Money::from_units(38000));
        assert_eq!(totals.net.planned, Money::from_units(50000));
    }

    #[test]
    fn test_net_identity_holds_for_mixed_entries() {
        let mut entries = Vec::new();
        for i in 0..20i64 {
            let amount = Money::from_cents(137 * (i + 1));
            let entry = if i % 3 == 0 {
                Entry::income(date(1), "Freelance", amount)
            } else {
                Entry::expense(date(2), "Food", amount)
            };
            entries.push(entry.with_planned(i % 2 == 0));
        }

        let totals = month_totals(&entries);
        assert_eq!(totals.net.planned, totals.income.planned - totals.expense.planned);
        assert_eq!(totals.net.actual, totals.income.actual - totals.expense.actual);

        let grand: Money = entries.iter().map(|e| e.amount).sum();
        assert_eq!(
            totals.income.planned + totals.income.actual + totals.expense.planned + totals.expense.actual,
            grand
        );
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        let big = Money::from_units(60_000_000_000_000_000);
        let max = Money::parse("79228162514264337593543950335").unwrap();
        let entries = vec![
            Entry::income(date(1), "Salary", big),
            Entry::income(date(2), "Salary", big),
            Entry::expense(date(3), "Rent", max),
            Entry::expense(date(4), "Rent", max),
        ];
        let totals = month_totals(&entries);

        assert_eq!(totals.income.actual, Money::from_units(120_000_000_000_000_000));
        assert_eq!(totals.expense.actual, max);
        assert_eq!(totals.net.actual, Money::from_units(120_000_000_000_000_000) - max);
        assert!(totals.net.actual.is_negative());
    }

    #[test]
    fn test_report_from_storage() {
        let storage = Storage::in_memory();
        let march = MonthKey::new(2024, 3).unwrap();
        storage
            .ledger
            .add_entry(march, Entry::expense(date(9), "Food", Money::from_units(40)).with_planned(true))
            .unwrap();

        let report = TotalsReport::generate(&storage, march).unwrap();
        assert_eq!(report.entry_count, 1);
        assert_eq!(report.planned_count, 1);
        assert_eq!(report.totals.net.planned, Money::from_units(-40));

        let text = report.format_terminal(&MoneyFormat::default());
        assert!(text.contains("Totals for 2024-03"));
        assert!(text.contains("-₹40.00"));
    }
}
