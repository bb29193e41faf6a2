//! Aggregation engine and reports
//!
//! Pure functions over entry slices (totals, breakdowns, forecast, budget
//! comparison) plus report structs that load from [`crate::storage::Storage`]
//! and format for the terminal.

pub mod breakdown;
pub mod budget_comparison;
pub mod forecast;
pub mod totals;

pub use breakdown::{
    actual_by_category, category_breakdown, planned_by_category, BreakdownReport, BreakdownRow,
    BreakdownScope,
};
pub use budget_comparison::{BudgetComparison, BudgetKind, ComparisonRow};
pub use forecast::{planned_net_forecast, ForecastPoint, ForecastReport};
pub use totals::{month_totals, MonthTotals, PlannedActual, TotalsReport};
