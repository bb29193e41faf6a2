//! CLI commands for reports
//!
//! Provides commands for month totals, category breakdowns, the planned-net
//! forecast and the budget comparison.

use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use super::parse_month;
use crate::config::Settings;
use crate::display::MoneyFormat;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::{BreakdownReport, BreakdownScope, ForecastReport, TotalsReport};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expense and net of a month, planned and actual
    Totals {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Expenses grouped by category
    Breakdown {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long, conflicts_with = "all")]
        month: Option<String>,

        /// Cover every stored month
        #[arg(short, long)]
        all: bool,

        /// Only actual expenses
        #[arg(long)]
        actual: bool,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Planned net of the coming months
    Forecast {
        /// First month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        from: Option<String>,

        /// Number of months, defaults to the configured forecast length
        #[arg(short = 'n', long)]
        months: Option<u32>,
    },

    /// Budget against actual entries
    Budget {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    let money = MoneyFormat::from_settings(settings);

    match cmd {
        ReportCommands::Totals { month } => {
            let month = parse_month(month.as_deref())?;
            let report = TotalsReport::generate(storage, month)?;
            print!("{}", report.format_terminal(&money));
        }

        ReportCommands::Breakdown {
            month,
            all,
            actual,
            output,
        } => {
            let month = if all {
                None
            } else {
                Some(parse_month(month.as_deref())?)
            };
            let scope = if actual {
                BreakdownScope::ActualExpenses
            } else {
                BreakdownScope::AllExpenses
            };
            let report = BreakdownReport::generate(storage, month, scope)?;

            if let Some(path) = output {
                let file = File::create(&path).map_err(|e| {
                    LedgerError::Export(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                report.export_csv(BufWriter::new(file))?;
                println!("Breakdown exported to: {}", path.display());
            } else {
                print!("{}", report.format_terminal(&money));
            }
        }

        ReportCommands::Forecast { from, months } => {
            let start = parse_month(from.as_deref())?;
            let months = months.unwrap_or(settings.forecast_months);
            if months == 0 {
                return Err(LedgerError::Validation(
                    "Forecast needs at least one month".into(),
                ));
            }
            let report = ForecastReport::generate(storage, start, months)?;
            print!("{}", report.format_terminal(&money));
        }

        ReportCommands::Budget { month } => {
            let month = parse_month(month.as_deref())?;
            let comparison =
                BudgetService::new(storage).comparison(month, &settings.income_categories)?;
            print!("{}", comparison.format_terminal(&money));
        }
    }

    Ok(())
}
