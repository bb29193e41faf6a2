//! Planned-net forecast over consecutive months

use serde::Serialize;

use crate::display::{separator, MoneyFormat};
use crate::error::LedgerResult;
use crate::models::{AppData, Money, MonthKey};
use crate::storage::Storage;

use super::totals::month_totals;

/// Planned net of one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastPoint {
    pub month: MonthKey,
    /// Short month name, e.g. "Mar"
    pub label: String,
    pub planned_net: Money,
}

/// Planned net for `months` consecutive months starting at `start`
///
/// Months without a bucket forecast zero.
pub fn planned_net_forecast(data: &AppData, start: MonthKey, months: u32) -> Vec<ForecastPoint> {
    (0..months)
        .map(|offset| {
            let month = start.add_months(offset as i32);
            let bucket = data.month(month);
            ForecastPoint {
                month,
                label: month.short_label(),
                planned_net: month_totals(&bucket.entries).net.planned,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub start: MonthKey,
    pub points: Vec<ForecastPoint>,
}

impl ForecastReport {
    pub fn generate(storage: &Storage, start: MonthKey, months: u32) -> LedgerResult<Self> {
        let data = storage.ledger.load()?;
        Ok(Self {
            start,
            points: planned_net_forecast(&data, start, months),
        })
    }

    /// Sum of every point's planned net
    pub fn cumulative(&self) -> Money {
        self.points.iter().map(|p| p.planned_net).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, money: &MoneyFormat) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Planned net forecast from {} ({} months)\n",
            self.start,
            self.points.len()
        ));
        output.push_str(&separator(40));
        output.push('\n');

        for point in &self.points {
            output.push_str(&format!(
                "{:<4} {:<8} {:>20}\n",
                point.label,
                point.month,
                money.format(point.planned_net)
            ));
        }

        output.push_str(&separator(40));
        output.push('\n');
        output.push_str(&format!("{:<13} {:>20}\n", "Cumulative", money.format(self.cumulative())));
        output
    }
}
