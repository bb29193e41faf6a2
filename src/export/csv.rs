//! CSV export of entries
//!
//! One row per entry, months in order and entries in stored order within a
//! month. Amounts are plain decimals so spreadsheets can sum them.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::MonthKey;
use crate::storage::Storage;

const HEADER: [&str; 8] = [
    "month", "id", "date", "type", "category", "note", "amount", "planned",
];

/// Export entries to CSV, optionally limited to one month
pub fn export_entries_csv<W: Write>(
    storage: &Storage,
    writer: W,
    month: Option<MonthKey>,
) -> LedgerResult<usize> {
    let data = storage.ledger.load()?;
    let mut csv = csv::Writer::from_writer(writer);
    let export_err = |e: csv::Error| LedgerError::Export(e.to_string());

    csv.write_record(HEADER).map_err(export_err)?;

    let mut rows = 0;
    for (key, bucket) in &data.months {
        if month.is_some_and(|m| m != *key) {
            continue;
        }
        for entry in &bucket.entries {
            csv.write_record([
                key.to_string(),
                entry.id.to_string(),
                entry.date.to_string(),
                entry.kind.to_string(),
                entry.category.clone(),
                entry.note.clone(),
                entry.amount.format_with_symbol(""),
                entry.planned.to_string(),
            ])
            .map_err(export_err)?;
            rows += 1;
        }
    }

    csv.flush().map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(rows)
}
