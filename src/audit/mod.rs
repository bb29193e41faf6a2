//! Audit logging
//!
//! Every mutation performed through the services is appended to
//! `audit.log` as a JSON line carrying the value before and after the change.
//!
//! ```rust,ignore
//! use notebook_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Entry, entry.id.as_str(), None, &entry))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
