//! Export and import
//!
//! - JSON: verbatim backup of the stored aggregate, also the import format
//! - YAML: the same document in a human-editable form
//! - CSV: flat entry list for spreadsheets

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_entries_csv;
pub use json::{default_export_filename, export_json, import_json, parse_import, REQUIRED_FIELDS};
pub use yaml::{export_yaml, import_yaml, parse_import_yaml};
