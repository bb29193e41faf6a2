//! Budget CLI commands
//!
//! Implements CLI commands for viewing and editing a month's budget.

use clap::Subcommand;

use super::{parse_amount, parse_month};
use crate::config::Settings;
use crate::display::MoneyFormat;
use crate::error::LedgerResult;
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the month's budget against actual entries
    Show {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Set the budget amount of a category
    Set {
        /// Category name
        category: String,
        /// Amount; zero falls back to the planned total
        amount: String,
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Add a budget line for a category that has none
    Add {
        /// Category name
        category: String,
        /// Amount
        amount: String,
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Remove a category's budget line
    Remove {
        /// Category name
        category: String,
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let service = BudgetService::new(storage);
    let money = MoneyFormat::from_settings(settings);

    match cmd {
        BudgetCommands::Show { month } => {
            let month = parse_month(month.as_deref())?;
            let comparison = service.comparison(month, &settings.income_categories)?;
            print!("{}", comparison.format_terminal(&money));
        }

        BudgetCommands::Set {
            category,
            amount,
            month,
        } => {
            let month = parse_month(month.as_deref())?;
            let line = service.set_amount(month, &category, parse_amount(&amount)?)?;
            println!(
                "Budget for {} in {} set to {}",
                line.category,
                month,
                money.format(line.budget_amount)
            );
        }

        BudgetCommands::Add {
            category,
            amount,
            month,
        } => {
            let month = parse_month(month.as_deref())?;
            let line = service.add_category(month, &category, parse_amount(&amount)?)?;
            println!(
                "Added budget line {} ({}) to {}",
                line.category,
                money.format(line.budget_amount),
                month
            );
        }

        BudgetCommands::Remove { category, month } => {
            let month = parse_month(month.as_deref())?;
            let line = service.remove_category(month, &category)?;
            println!("Removed budget line {} from {}", line.category, month);
        }
    }

    Ok(())
}
