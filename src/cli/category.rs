//! Category CLI commands
//!
//! Implements CLI commands for the global category list.

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::LedgerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories in display order
    List,

    /// Append a category
    Add {
        /// Category name
        name: String,
    },

    /// Remove a category (entries keep their category text)
    Remove {
        /// Category name
        name: String,
    },

    /// Move a category to a new position
    Move {
        /// Category name
        name: String,
        /// New 1-based position; past the end moves it last
        #[arg(short, long)]
        to: usize,
    },

    /// Restore the default category list
    Reset,
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            print!("{}", format_category_list(&service.list()?));
        }

        CategoryCommands::Add { name } => {
            if service.add(&name)? {
                println!("Added category: {}", name.trim());
            } else {
                println!("Category already exists: {}", name.trim());
            }
        }

        CategoryCommands::Remove { name } => {
            service.remove(&name)?;
            println!("Removed category: {}", name.trim());
        }

        CategoryCommands::Move { name, to } => {
            let list = service.move_to(&name, to.saturating_sub(1))?;
            print!("{}", format_category_list(&list));
        }

        CategoryCommands::Reset => {
            let list = service.reset()?;
            println!("Restored {} default categories.", list.len());
        }
    }

    Ok(())
}
