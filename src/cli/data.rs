//! CLI commands for backups and stored data
//!
//! Export, import, clearing, and a summary of what is stored where.

use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, LedgerResult};
use crate::export::{
    default_export_filename, export_entries_csv, export_json, export_yaml, import_json,
    import_yaml,
};
use crate::storage::Storage;

/// Backup format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    /// JSON (full ledger, the default backup format)
    Json,
    /// YAML (full ledger, human-readable)
    Yaml,
    /// CSV (entries only, export only)
    Csv,
}

impl DataFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Data subcommands
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Write a backup of the ledger
    Export {
        /// Output file, defaults to notebook-budget-backup-YYYY-MM-DD.json
        output: Option<PathBuf>,

        /// Format, inferred from the file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<DataFormat>,
    },

    /// Replace the ledger with a backup
    Import {
        /// Backup file (JSON or YAML)
        file: PathBuf,

        /// Format, inferred from the file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<DataFormat>,
    },

    /// Delete every stored record
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show storage location and record counts
    Info,
}

/// Handle data commands
pub fn handle_data_command(storage: &Storage, cmd: DataCommands) -> LedgerResult<()> {
    match cmd {
        DataCommands::Export { output, format } => handle_export(storage, output, format),
        DataCommands::Import { file, format } => handle_import(storage, &file, format),
        DataCommands::Clear { yes } => handle_clear(storage, yes),
        DataCommands::Info => handle_info(storage),
    }
}

fn handle_export(
    storage: &Storage,
    output: Option<PathBuf>,
    format: Option<DataFormat>,
) -> LedgerResult<()> {
    let output = output.unwrap_or_else(|| {
        PathBuf::from(default_export_filename(chrono::Local::now().date_naive()))
    });
    let format = format.unwrap_or_else(|| DataFormat::from_path(&output));

    let file = File::create(&output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        DataFormat::Json => {
            export_json(storage, &mut writer)?;
            println!("Ledger exported to: {}", output.display());
        }
        DataFormat::Yaml => {
            export_yaml(storage, &mut writer)?;
            println!("Ledger exported to: {}", output.display());
        }
        DataFormat::Csv => {
            let rows = export_entries_csv(storage, &mut writer, None)?;
            println!("Exported {} entries to: {}", rows, output.display());
        }
    }

    Ok(())
}

fn handle_import(storage: &Storage, file: &Path, format: Option<DataFormat>) -> LedgerResult<()> {
    let content = std::fs::read_to_string(file).map_err(|e| {
        LedgerError::Import(format!("Failed to read {}: {}", file.display(), e))
    })?;

    let data = match format.unwrap_or_else(|| DataFormat::from_path(file)) {
        DataFormat::Json => import_json(storage, &content)?,
        DataFormat::Yaml => import_yaml(storage, &content)?,
        DataFormat::Csv => {
            return Err(LedgerError::Import(
                "CSV is an export-only format; import a JSON or YAML backup".into(),
            ))
        }
    };

    println!("Import Complete!");
    println!("  Months:      {}", data.months.len());
    println!("  Entries:     {}", data.entry_count());
    println!("  Categories:  {}", data.settings.categories.len());
    Ok(())
}

fn handle_clear(storage: &Storage, yes: bool) -> LedgerResult<()> {
    if !yes {
        return Err(LedgerError::Validation(
            "This deletes every entry, budget and category. Re-run with --yes to confirm".into(),
        ));
    }
    storage.clear_all()?;
    println!("All data cleared.");
    Ok(())
}

fn handle_info(storage: &Storage) -> LedgerResult<()> {
    let data = storage.ledger.load()?;
    let budget_months = storage.budgets.months()?;

    println!("Ledger Information");
    println!("==================\n");

    if let Some(paths) = storage.paths() {
        println!("Data directory: {}", paths.data_dir().display());
        println!("Audit log:      {}", paths.audit_log().display());
    }
    println!("Storage key:    {}", storage.ledger.key());
    println!();

    println!("Data Summary:");
    println!("  Months:        {}", data.months.len());
    println!("  Entries:       {}", data.entry_count());
    println!("  Categories:    {}", data.settings.categories.len());
    println!("  Budget months: {}", budget_months.len());

    if let (Some(first), Some(last)) = (data.months.keys().next(), data.months.keys().last()) {
        println!();
        println!("Month Range:");
        println!("  Earliest: {}", first);
        println!("  Latest:   {}", last);
    }

    Ok(())
}
