//! Display formatting for terminal output

pub mod category;
pub mod entry;
pub mod report;

pub use category::format_category_list;
pub use entry::{format_entry_details, format_entry_table};
pub use report::{format_bar, format_percentage, separator};

use crate::config::Settings;
use crate::models::{DigitGrouping, Money};

/// How amounts are printed: currency symbol plus digit grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl MoneyFormat {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            symbol: settings.currency_symbol.clone(),
            grouping: settings.digit_grouping,
        }
    }

    pub fn format(&self, amount: Money) -> String {
        amount.format_grouped(&self.symbol, self.grouping)
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_rupees_indian_grouping() {
        let fmt = MoneyFormat::default();
        assert_eq!(fmt.format(Money::from_cents(12345650)), "₹1,23,456.50");
    }

    #[test]
    fn test_western_grouping() {
        let fmt = MoneyFormat {
            symbol: "$".into(),
            grouping: DigitGrouping::Western,
        };
        assert_eq!(fmt.format(Money::from_units(1234567)), "$1,234,567.00");
    }
}
