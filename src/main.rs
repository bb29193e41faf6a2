use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use notebook_ledger::cli::{
    handle_budget_command, handle_category_command, handle_data_command, handle_entry_command,
    handle_report_command,
};
use notebook_ledger::config::{LedgerPaths, Settings};
use notebook_ledger::display::MoneyFormat;
use notebook_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "notebook",
    version,
    about = "Month-by-month budgeting notebook",
    long_about = "A personal budgeting ledger. Record planned and actual income and \
                  expenses month by month, set per-category budgets, and compare \
                  what you planned with what happened."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income and expense entries
    #[command(subcommand)]
    Entry(notebook_ledger::cli::EntryCommands),

    /// Category list management
    #[command(subcommand)]
    Category(notebook_ledger::cli::CategoryCommands),

    /// Per-month budgets
    #[command(subcommand)]
    Budget(notebook_ledger::cli::BudgetCommands),

    /// Totals, breakdowns and forecasts
    #[command(subcommand)]
    Report(notebook_ledger::cli::ReportCommands),

    /// Backup, restore and clear stored data
    #[command(subcommand)]
    Data(notebook_ledger::cli::DataCommands),

    /// Show configuration, or change one setting
    Config {
        /// Setting to change (e.g. currency_symbol)
        field: Option<String>,
        /// New value
        #[arg(requires = "field")]
        value: Option<String>,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone(), &settings)?;
    let money = MoneyFormat::from_settings(&settings);

    match cli.command {
        Some(Commands::Entry(cmd)) => handle_entry_command(&storage, &money, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Data(cmd)) => handle_data_command(&storage, cmd)?,
        Some(Commands::Config { field, value }) => match (field, value) {
            (Some(field), Some(value)) => {
                settings.set_field(&field, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", field, value);
            }
            (Some(field), None) => {
                anyhow::bail!("Missing value for '{}'", field);
            }
            _ => {
                println!("Notebook Ledger Configuration");
                println!("=============================");
                println!("Base directory:  {}", paths.base_dir().display());
                println!("Data directory:  {}", paths.data_dir().display());
                println!("Settings file:   {}", paths.settings_file().display());
                println!();
                println!("Settings:");
                println!("  storage_key:       {}", settings.storage_key);
                println!("  currency_symbol:   {}", settings.currency_symbol);
                println!("  digit_grouping:    {}", settings.digit_grouping);
                println!(
                    "  income_categories: {}",
                    settings.income_categories.join(", ")
                );
                println!("  forecast_months:   {}", settings.forecast_months);
                println!("  audit_enabled:     {}", settings.audit_enabled);
            }
        },
        Some(Commands::Audit { limit }) => match storage.audit() {
            Some(logger) => {
                let entries = logger.read_recent(limit)?;
                if entries.is_empty() {
                    println!("No audit entries.");
                }
                for entry in entries {
                    println!("{}", entry.format_human_readable());
                }
            }
            None => println!("Audit logging is disabled."),
        },
        None => {
            println!("notebook - month-by-month budgeting");
            println!();
            println!("Run 'notebook --help' for usage information.");
            println!("Run 'notebook entry add 250 --category Food' to record an expense.");
        }
    }

    Ok(())
}
