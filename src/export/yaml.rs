//! YAML backup and restore
//!
//! Same document as the JSON backup, for people who want to read or edit it.

use serde_json::Value;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::AppData;
use crate::storage::Storage;

use super::json::{from_value, restore};

/// Write the stored aggregate as YAML
pub fn export_yaml<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let data = storage.ledger.load()?;

    writeln!(writer, "# notebook ledger backup")
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M"))
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &data).map_err(|e| LedgerError::Export(e.to_string()))
}

/// Parse a YAML backup without touching storage
pub fn parse_import_yaml(text: &str) -> LedgerResult<AppData> {
    let value: Value =
        serde_yaml::from_str(text).map_err(|e| LedgerError::Import(e.to_string()))?;
    from_value(value)
}

/// Parse a YAML backup and overwrite the stored aggregate with it
pub fn import_yaml(storage: &Storage, text: &str) -> LedgerResult<AppData> {
    let data = parse_import_yaml(text)?;
    restore(storage, &data)?;
    Ok(data)
}
