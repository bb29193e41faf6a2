//! Entry CLI commands
//!
//! Implements CLI commands for adding, editing, deleting and listing entries.

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_month};
use crate::display::{format_entry_details, format_entry_table, MoneyFormat};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Entry, EntryType, MonthKey};
use crate::services::{EntryFilter, EntryService};
use crate::storage::Storage;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add an income or expense entry
    Add {
        /// Amount (e.g., "250" or "99.50")
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Entry type: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Mark as planned rather than actual
        #[arg(short, long)]
        planned: bool,
        /// Also copy the entry into the following N months
        #[arg(short, long, default_value = "0")]
        repeat: u32,
    },
    /// Edit an entry
    Edit {
        /// Entry ID or unique ID prefix
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New date; a date in another month moves the entry there
        #[arg(short, long)]
        date: Option<String>,
        /// New note
        #[arg(short, long)]
        note: Option<String>,
        /// Set the planned flag
        #[arg(long)]
        planned: Option<bool>,
    },
    /// Delete an entry
    Delete {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Show entry details
    Show {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// List a month's entries
    List {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Only income or only expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Only planned entries
        #[arg(long, conflicts_with = "actual")]
        planned: bool,
        /// Only actual entries
        #[arg(long)]
        actual: bool,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn parse_kind(kind: &str) -> LedgerResult<EntryType> {
    kind.parse().map_err(LedgerError::Validation)
}

/// Resolve an id or prefix to the entry and the month bucket holding it
fn find_entry(service: &EntryService, id: &str) -> LedgerResult<(MonthKey, Entry)> {
    service
        .find(id)?
        .ok_or_else(|| LedgerError::entry_not_found(id))
}

/// Handle an entry command
pub fn handle_entry_command(
    storage: &Storage,
    money: &MoneyFormat,
    cmd: EntryCommands,
) -> LedgerResult<()> {
    let service = EntryService::new(storage);

    match cmd {
        EntryCommands::Add {
            amount,
            category,
            kind,
            date,
            note,
            planned,
            repeat,
        } => {
            let entry = Entry::new(
                parse_kind(&kind)?,
                parse_date(date.as_deref())?,
                category,
                parse_amount(&amount)?,
            )
            .with_note(note.unwrap_or_default())
            .with_planned(planned);

            if repeat > 0 {
                let created = service.add_recurring(entry, repeat + 1)?;
                println!("Added {} entries:", created.len());
                print!("{}", format_entry_table(&created, money));
            } else {
                let entry = service.add(entry)?;
                println!("Added entry: {}", entry.id.short());
                print!("{}", format_entry_details(&entry, money));
            }
        }

        EntryCommands::Edit {
            id,
            amount,
            category,
            kind,
            date,
            note,
            planned,
        } => {
            let (original_month, original) = find_entry(&service, &id)?;
            let mut entry = original.clone();

            if let Some(amount) = amount {
                entry.amount = parse_amount(&amount)?;
            }
            if let Some(category) = category {
                entry.category = category;
            }
            if let Some(kind) = kind {
                entry.kind = parse_kind(&kind)?;
            }
            if let Some(date) = date {
                entry.date = parse_date(Some(&date))?;
            }
            if let Some(note) = note {
                entry.note = note;
            }
            if let Some(planned) = planned {
                entry.planned = planned;
            }

            if entry == original {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(original_month, entry)?;
            println!("Updated entry: {}", updated.id.short());
            if updated.month_key() != original_month {
                println!("  Moved from {} to {}", original_month, updated.month_key());
            }
            print!("{}", format_entry_details(&updated, money));
        }

        EntryCommands::Delete { id } => {
            let (month, entry) = find_entry(&service, &id)?;
            let removed = service.remove(month, &entry.id)?;
            println!("Deleted entry: {} ({})", removed.id.short(), removed.category);
        }

        EntryCommands::Show { id } => {
            let (_, entry) = find_entry(&service, &id)?;
            print!("{}", format_entry_details(&entry, money));
        }

        EntryCommands::List {
            month,
            kind,
            planned,
            actual,
            category,
            limit,
        } => {
            let month = parse_month(month.as_deref())?;

            let mut filter = EntryFilter::default();
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            if planned {
                filter = filter.planned(true);
            } else if actual {
                filter = filter.planned(false);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            filter.limit = limit;

            let entries = service.list(month, &filter)?;
            println!("Entries for {}", month);
            print!("{}", format_entry_table(&entries, money));
        }
    }

    Ok(())
}
