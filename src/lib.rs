//! Notebook ledger - month-keyed personal budgeting
//!
//! Income and expense entries are grouped into month buckets and flagged as
//! planned or actual. The crate aggregates them into totals, category
//! breakdowns and forecasts, and keeps a per-month budget overlay that is
//! reconciled with the planned entries every time it is viewed.
//!
//! # Architecture
//!
//! - `config`: Paths and user settings
//! - `error`: Custom error types
//! - `models`: Entries, months, money and the ledger aggregate
//! - `storage`: Key-value persistence port, repositories and change notification
//! - `reports`: Aggregation engine and formatted reports
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `export`: JSON/YAML backups and CSV export
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use notebook_ledger::models::{Entry, Money};
//! use notebook_ledger::reports::month_totals;
//! use notebook_ledger::services::EntryService;
//! use notebook_ledger::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let entry = EntryService::new(&storage)
//!     .add(Entry::income(date, "Salary", Money::from_units(50000)))
//!     .unwrap();
//!
//! let month = storage.ledger.get_month(entry.month_key()).unwrap();
//! assert_eq!(month_totals(&month.entries).income.actual, Money::from_units(50000));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
