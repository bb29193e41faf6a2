//! JSON backup and restore
//!
//! The backup is the stored aggregate pretty-printed verbatim, so a backup
//! file is also a valid stored record.

use chrono::NaiveDate;
use serde_json::Value;
use std::io::Write;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::AppData;
use crate::storage::Storage;

/// Top-level fields an import must carry
pub const REQUIRED_FIELDS: [&str; 2] = ["months", "settings"];

/// Default backup file name for a given day
pub fn default_export_filename(today: NaiveDate) -> String {
    format!("notebook-budget-backup-{}.json", today.format("%Y-%m-%d"))
}

/// Write the stored aggregate as pretty-printed JSON
pub fn export_json<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let data = storage.ledger.load()?;
    serde_json::to_writer_pretty(&mut *writer, &data)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

/// Check the required fields of a parsed backup, then deserialize it
pub(crate) fn from_value(value: Value) -> LedgerResult<AppData> {
    let Value::Object(root) = &value else {
        return Err(LedgerError::Import("backup is not an object".into()));
    };
    for field in REQUIRED_FIELDS {
        if root.get(field).map_or(true, Value::is_null) {
            return Err(LedgerError::Import(format!(
                "backup is missing the '{}' field",
                field
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| LedgerError::Import(e.to_string()))
}

/// Parse a JSON backup without touching storage
pub fn parse_import(text: &str) -> LedgerResult<AppData> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| LedgerError::Import(e.to_string()))?;
    from_value(value)
}

/// Replace the stored aggregate with an already parsed backup
///
/// Once the record is written the import has happened; a failing audit
/// log is only warned about.
pub(crate) fn restore(storage: &Storage, data: &AppData) -> LedgerResult<()> {
    let before = storage.ledger.load()?;
    storage.ledger.replace_all(data)?;
    tracing::info!(
        months = data.months.len(),
        entries = data.entry_count(),
        "imported ledger"
    );
    if let Err(e) = storage.log_update(
        EntityType::Ledger,
        storage.ledger.key(),
        Some("import".to_string()),
        &before,
        data,
    ) {
        tracing::warn!(error = %e, "import succeeded but could not be written to the audit log");
    }
    Ok(())
}

/// Parse a JSON backup and overwrite the stored aggregate with it
///
/// Nothing is written when the backup is rejected. An `Err` always means
/// the stored aggregate is unchanged.
pub fn import_json(storage: &Storage, text: &str) -> LedgerResult<AppData> {
    let data = parse_import(text)?;
    restore(storage, &data)?;
    Ok(data)
}
