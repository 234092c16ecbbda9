//! Configuration for the shift ledger

use chrono::{FixedOffset, Weekday};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Directory holding one sheet file per operator key
    pub sheet_dir: PathBuf,

    /// Fixed category set, in sheet column order
    pub categories: Vec<String>,

    /// Weekday on which the accumulation window restarts (name or
    /// three-letter abbreviation, e.g. `Sunday` or `sun`)
    pub reset_weekday: String,

    /// Reference time zone as a whole-hour UTC offset
    pub utc_offset_hours: i32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            sheet_dir: PathBuf::from("./data/sheets"),
            categories: vec![
                "Streams".to_string(),
                "Messages".to_string(),
                "Tips".to_string(),
                "Calls".to_string(),
            ],
            reset_weekday: "Sunday".to_string(),
            utc_offset_hours: -5,
        }
    }
}

impl LedgerConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LedgerConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable category sets, weekdays, and offsets
    pub fn validate(&self) -> crate::Result<()> {
        if self.categories.is_empty() {
            return Err(crate::Error::Config(
                "Category set must not be empty".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            if category.is_empty() || category.contains(',') {
                return Err(crate::Error::Config(format!(
                    "Category name not usable as a sheet column: {:?}",
                    category
                )));
            }
            if !seen.insert(category) {
                return Err(crate::Error::Config(format!(
                    "Duplicate category: {}",
                    category
                )));
            }
        }

        self.parsed_reset_weekday()?;
        self.offset()?;
        Ok(())
    }

    /// Parsed reset weekday
    pub fn parsed_reset_weekday(&self) -> crate::Result<Weekday> {
        self.reset_weekday.parse().map_err(|_| {
            crate::Error::Config(format!("Bad reset weekday: {}", self.reset_weekday))
        })
    }

    /// Reference time zone offset
    pub fn offset(&self) -> crate::Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            crate::Error::Config(format!("Bad UTC offset: {}", self.utc_offset_hours))
        })
    }
}
