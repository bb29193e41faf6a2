//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod data;
pub mod entry;
pub mod report;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use data::{handle_data_command, DataCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use report::{handle_report_command, ReportCommands};

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, MonthKey};

/// Parse a `YYYY-MM-DD` argument, defaulting to today
pub(crate) fn parse_date(date: Option<&str>) -> LedgerResult<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            LedgerError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parse a `YYYY-MM` argument, defaulting to the current month
pub(crate) fn parse_month(month: Option<&str>) -> LedgerResult<MonthKey> {
    match month {
        Some(s) => MonthKey::parse(s).map_err(|e| LedgerError::Validation(e.to_string())),
        None => Ok(MonthKey::current()),
    }
}

/// Parse a decimal amount argument
pub(crate) fn parse_amount(amount: &str) -> LedgerResult<Money> {
    Money::parse(amount).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use a number like '250' or '99.50'. Error: {}",
            amount, e
        ))
    })
}
