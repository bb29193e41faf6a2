//! Service layer
//!
//! Business rules on top of the storage layer: validation, multi-month
//! operations, budget reconciliation and audit logging.

pub mod budget;
pub mod category;
pub mod entry;

pub use budget::BudgetService;
pub use category::CategoryService;
pub use entry::{EntryFilter, EntryService};
