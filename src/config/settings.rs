//! User settings
//!
//! Stored as `config.json` next to the data directory. Every field has a
//! default, so a partial or older file still loads.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::DigitGrouping;
use crate::storage::DEFAULT_LEDGER_KEY;

/// Ledger preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Key the ledger aggregate is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default)]
    pub digit_grouping: DigitGrouping,

    /// Categories counted as earnings in the budget comparison
    #[serde(default = "default_income_categories")]
    pub income_categories: Vec<String>,

    /// Months shown by the planned-net forecast
    #[serde(default = "default_forecast_months")]
    pub forecast_months: u32,

    #[serde(default = "default_true")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_storage_key() -> String {
    DEFAULT_LEDGER_KEY.to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_income_categories() -> Vec<String> {
    vec!["Salary".to_string(), "Freelance".to_string()]
}

fn default_forecast_months() -> u32 {
    6
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            storage_key: default_storage_key(),
            currency_symbol: default_currency(),
            digit_grouping: DigitGrouping::default(),
            income_categories: default_income_categories(),
            forecast_months: default_forecast_months(),
            audit_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        self.validate()?;
        paths.ensure_directories()?;
        crate::storage::file_io::write_json_atomic(paths.settings_file(), self)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.storage_key.trim().is_empty() {
            return Err(LedgerError::Config("storage_key cannot be empty".into()));
        }
        if self.forecast_months == 0 {
            return Err(LedgerError::Config(
                "forecast_months must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether `category` counts as earnings
    pub fn is_income_category(&self, category: &str) -> bool {
        self.income_categories.iter().any(|c| c == category)
    }

    /// Set a field by its config-file name from a command-line string
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), LedgerError> {
        let invalid = |what: &str| {
            LedgerError::Validation(format!("Invalid value for {}: {:?} ({})", field, value, what))
        };

        match field {
            "storage_key" => self.storage_key = value.trim().to_string(),
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "digit_grouping" => {
                self.digit_grouping = match value.trim().to_lowercase().as_str() {
                    "indian" => DigitGrouping::Indian,
                    "western" => DigitGrouping::Western,
                    "none" => DigitGrouping::None,
                    _ => return Err(invalid("expected indian, western or none")),
                }
            }
            "income_categories" => {
                self.income_categories = value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "forecast_months" => {
                self.forecast_months = value.trim().parse().map_err(|_| invalid("expected a number"))?
            }
            "audit_enabled" => {
                self.audit_enabled = value.trim().parse().map_err(|_| invalid("expected true or false"))?
            }
            other => {
                return Err(LedgerError::Validation(format!(
                    "Unknown setting: {}",
                    other
                )))
            }
        }

        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.storage_key, "notebook-expense-tracker-v1");
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.digit_grouping, DigitGrouping::Indian);
        assert_eq!(settings.forecast_months, 6);
        assert!(settings.is_income_category("Salary"));
        assert!(!settings.is_income_category("Food"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set_field("forecast_months", "12").unwrap();
        settings.set_field("digit_grouping", "western").unwrap();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.forecast_months, 12);
        assert_eq!(loaded.digit_grouping, DigitGrouping::Western);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"currency_symbol": "$"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.income_categories, vec!["Salary", "Freelance"]);
    }

    #[test]
    fn test_set_field_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set_field("forecast_months", "six").is_err());
        assert!(settings.set_field("colour", "blue").is_err());

        settings.set_field("income_categories", "Salary, Bonus ,").unwrap();
        assert_eq!(settings.income_categories, vec!["Salary", "Bonus"]);
    }
}
