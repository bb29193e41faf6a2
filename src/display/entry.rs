//! Entry display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::MoneyFormat;
use crate::models::Entry;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Plan")]
    plan: &'static str,
    #[tabled(rename = "Note")]
    note: String,
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// Render entries as a table, one row per entry
pub fn format_entry_table(entries: &[Entry], money: &MoneyFormat) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }

    let rows = entries.iter().map(|entry| EntryRow {
        id: entry.id.short().to_string(),
        date: entry.date.format("%Y-%m-%d").to_string(),
        kind: entry.kind.to_string(),
        category: truncate(&entry.category, 20),
        amount: money.format(entry.amount),
        plan: if entry.planned { "planned" } else { "actual" },
        note: truncate(&entry.note, 30),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Multi-line details of a single entry
pub fn format_entry_details(entry: &Entry, money: &MoneyFormat) -> String {
    let mut output = String::new();
    output.push_str(&format!("Entry:    {}\n", entry.id));
    output.push_str(&format!("Date:     {}\n", entry.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:     {}\n", entry.kind));
    output.push_str(&format!("Category: {}\n", entry.category));
    output.push_str(&format!("Amount:   {}\n", money.format(entry.amount)));
    output.push_str(&format!(
        "Status:   {}\n",
        if entry.planned { "planned" } else { "actual" }
    ));
    if !entry.note.is_empty() {
        output.push_str(&format!("Note:     {}\n", entry.note));
    }
    output
}
