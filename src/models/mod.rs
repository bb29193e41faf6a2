//! Core data models for the ledger
//!
//! This module contains the data structures of the budgeting domain: entries,
//! month buckets, the persisted aggregate and the per-month budget overlay.

pub mod budget;
pub mod entry;
pub mod ids;
pub mod ledger;
pub mod money;
pub mod month;

pub use budget::{CategoryBudget, CategoryTotal};
pub use entry::{Entry, EntryType, EntryValidationError};
pub use ids::EntryId;
pub use ledger::{default_categories, AppData, MonthData, SettingsData, DEFAULT_CATEGORIES};
pub use money::{DigitGrouping, Money, MoneyParseError};
pub use month::{MonthKey, MonthKeyError};
