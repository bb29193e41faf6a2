//! Ledger entry model
//!
//! An entry is one income or expense line, either realized (actual) or
//! budgeted (planned). Its date decides which month bucket owns it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::EntryId;
use super::money::Money;
use super::month::MonthKey;

/// Whether an entry is money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown entry type '{}', expected income or expense", other)),
        }
    }
}

/// A single income or expense line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, stable for the entry's lifetime
    pub id: EntryId,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: EntryType,

    /// Calendar date; its `YYYY-MM` prefix is the owning month
    pub date: NaiveDate,

    /// Free-text category label
    pub category: String,

    /// Free-text description
    #[serde(default)]
    pub note: String,

    /// Non-negative magnitude; the sign is implied by `kind`
    pub amount: Money,

    /// true for a budgeted/forecast line, false for a realized transaction
    #[serde(default)]
    pub planned: bool,
}

impl Entry {
    /// Create a new actual entry with a fresh id
    pub fn new(kind: EntryType, date: NaiveDate, category: impl Into<String>, amount: Money) -> Self {
        Self {
            id: EntryId::new(),
            kind,
            date,
            category: category.into(),
            note: String::new(),
            amount,
            planned: false,
        }
    }

    /// Create a new income entry
    pub fn income(date: NaiveDate, category: impl Into<String>, amount: Money) -> Self {
        Self::new(EntryType::Income, date, category, amount)
    }

    /// Create a new expense entry
    pub fn expense(date: NaiveDate, category: impl Into<String>, amount: Money) -> Self {
        Self::new(EntryType::Expense, date, category, amount)
    }

    /// Builder-style: attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Builder-style: mark as planned (or actual)
    pub fn with_planned(mut self, planned: bool) -> Self {
        self.planned = planned;
        self
    }

    /// The month bucket that owns this entry
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    /// Copy of this entry with a fresh id and a new date
    pub fn duplicate_on(&self, date: NaiveDate) -> Self {
        Self {
            id: EntryId::new(),
            date,
            ..self.clone()
        }
    }

    /// Validate the entry
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.category.trim().is_empty() {
            return Err(EntryValidationError::MissingCategory);
        }

        if self.amount.is_negative() {
            return Err(EntryValidationError::NegativeAmount(self.amount));
        }

        if self.id.as_str().is_empty() {
            return Err(EntryValidationError::MissingId);
        }

        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}{}",
            self.date,
            self.kind,
            self.category,
            self.amount,
            if self.planned { " (planned)" } else { "" }
        )
    }
}

/// Validation errors for entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    MissingCategory,
    NegativeAmount(Money),
    MissingId,
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "Entry category is required"),
            Self::NegativeAmount(amount) => {
                write!(f, "Entry amount must not be negative: {}", amount)
            }
            Self::MissingId => write!(f, "Entry id is required"),
        }
    }
}

impl std::error::Error for EntryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_new_entry() {
        let entry = Entry::expense(test_date(), "Food", Money::from_units(250));
        assert_eq!(entry.kind, EntryType::Expense);
        assert!(!entry.planned);
        assert!(entry.note.is_empty());
        assert_eq!(entry.month_key().to_string(), "2024-03");
    }

    #[test]
    fn test_validation() {
        let entry = Entry::income(test_date(), "Salary", Money::from_units(50000));
        assert!(entry.validate().is_ok());

        let mut blank = entry.clone();
        blank.category = "   ".into();
        assert_eq!(blank.validate(), Err(EntryValidationError::MissingCategory));

        let mut negative = entry;
        negative.amount = Money::from_cents(-1);
        assert!(matches!(
            negative.validate(),
            Err(EntryValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_duplicate_on_gets_new_id() {
        let entry = Entry::expense(test_date(), "Rent", Money::from_units(12000)).with_planned(true);
        let next = entry.duplicate_on(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
        assert_ne!(next.id, entry.id);
        assert_eq!(next.category, "Rent");
        assert!(next.planned);
        assert_eq!(next.month_key().to_string(), "2024-04");
    }

    #[test]
    fn test_wire_format() {
        let mut entry = Entry::income(test_date(), "Salary", Money::from_units(50000))
            .with_note("March pay");
        entry.id = EntryId::from("e1");

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "e1",
                "type": "income",
                "date": "2024-03-15",
                "category": "Salary",
                "note": "March pay",
                "amount": 50000,
                "planned": false
            })
        );
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let entry: Entry = serde_json::from_str(
            r#"{"id":"x","type":"expense","date":"2024-03-01","category":"Food","amount":12.5}"#,
        )
        .unwrap();
        assert_eq!(entry.note, "");
        assert!(!entry.planned);
        assert_eq!(entry.amount.cents(), 1250);
    }

    #[test]
    fn test_entry_type_from_str() {
        assert_eq!("Income".parse::<EntryType>().unwrap(), EntryType::Income);
        assert_eq!("expense".parse::<EntryType>().unwrap(), EntryType::Expense);
        assert!("transfer".parse::<EntryType>().is_err());
    }
}
