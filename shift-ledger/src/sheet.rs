//! Sheet materialization port
//!
//! One logical sheet per operator key:
//!
//! ```text
//! Date | <category_1> | ... | <category_N> | Total_Daily | Accumulated_Week | Time
//! ```
//!
//! The header is written once when the sheet is created; appends add exactly
//! one row at the end; a weekly reset clears data rows but keeps the header.
//! `CsvSheetStore` keeps each sheet as a CSV file and syncs after every write
//! so an acknowledged append survives a crash. A remote spreadsheet client
//! would implement the same trait.

use crate::{
    error::{Error, Result},
    types::{LedgerRow, OperatorKey},
};
use chrono::{NaiveDate, NaiveTime};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Passive persistence sink for per-operator ledger sheets
pub trait SheetStore: Send + Sync {
    /// Create the sheet with its header if it does not exist yet
    fn ensure_sheet(&self, key: &OperatorKey) -> Result<()>;

    /// Load all data rows, oldest first; empty for a missing sheet
    fn load_rows(&self, key: &OperatorKey) -> Result<Vec<LedgerRow>>;

    /// Append one row at the end, durably
    fn append_row(&self, key: &OperatorKey, row: &LedgerRow) -> Result<()>;

    /// Remove all data rows, keeping the header
    fn clear_rows(&self, key: &OperatorKey) -> Result<()>;
}

/// CSV-file sheet store, one file per operator key
pub struct CsvSheetStore {
    dir: PathBuf,
    categories: Vec<String>,
}

impl CsvSheetStore {
    /// Create a store rooted at `dir` for a fixed category set
    pub fn new(dir: impl AsRef<Path>, categories: Vec<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, categories })
    }

    fn sheet_path(&self, key: &OperatorKey) -> PathBuf {
        self.dir.join(format!("{}.csv", key.as_str()))
    }

    fn header(&self) -> String {
        format!(
            "Date,{},Total_Daily,Accumulated_Week,Time",
            self.categories.join(",")
        )
    }

    fn encode_row(&self, row: &LedgerRow) -> String {
        let values: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        format!(
            "{},{},{},{},{}",
            row.date.format(DATE_FORMAT),
            values.join(","),
            row.daily_total,
            row.weekly_accumulated,
            row.time.format(TIME_FORMAT)
        )
    }

    fn parse_row(&self, line: &str) -> Result<LedgerRow> {
        let fields: Vec<&str> = line.split(',').collect();
        let expected = self.categories.len() + 4;
        if fields.len() != expected {
            return Err(Error::Parse(format!(
                "Expected {} columns, found {}: {}",
                expected,
                fields.len(),
                line
            )));
        }

        let date = NaiveDate::parse_from_str(fields[0], DATE_FORMAT)
            .map_err(|e| Error::Parse(format!("Bad date {}: {}", fields[0], e)))?;

        let mut values = Vec::with_capacity(self.categories.len());
        for field in &fields[1..=self.categories.len()] {
            let value: u64 = field
                .parse()
                .map_err(|e| Error::Parse(format!("Bad amount {}: {}", field, e)))?;
            values.push(value);
        }

        let daily_total: u64 = fields[self.categories.len() + 1]
            .parse()
            .map_err(|e| Error::Parse(format!("Bad daily total: {}", e)))?;
        let weekly_accumulated: u64 = fields[self.categories.len() + 2]
            .parse()
            .map_err(|e| Error::Parse(format!("Bad accumulated total: {}", e)))?;

        let time = NaiveTime::parse_from_str(fields[self.categories.len() + 3], TIME_FORMAT)
            .map_err(|e| Error::Parse(format!("Bad time: {}", e)))?;

        Ok(LedgerRow {
            date,
            values,
            daily_total,
            weekly_accumulated,
            time,
        })
    }

    fn write_all_synced(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl SheetStore for CsvSheetStore {
    fn ensure_sheet(&self, key: &OperatorKey) -> Result<()> {
        let path = self.sheet_path(key);
        if path.exists() {
            return Ok(());
        }

        self.write_all_synced(&path, &format!("{}\n", self.header()))?;
        tracing::info!(operator = %key, path = ?path, "Sheet created");
        Ok(())
    }

    fn load_rows(&self, key: &OperatorKey) -> Result<Vec<LedgerRow>> {
        let path = self.sheet_path(key);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path)?;
        let mut lines = content.lines();

        match lines.next() {
            Some(header) if header == self.header() => {}
            Some(header) => {
                return Err(Error::Sheet(format!(
                    "Sheet {} header does not match configured categories: {}",
                    key, header
                )));
            }
            None => return Ok(Vec::new()),
        }

        lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_row(line))
            .collect()
    }

    fn append_row(&self, key: &OperatorKey, row: &LedgerRow) -> Result<()> {
        self.ensure_sheet(key)?;

        let path = self.sheet_path(key);
        let mut file = OpenOptions::new().append(true).open(&path)?;
        file.write_all(format!("{}\n", self.encode_row(row)).as_bytes())?;
        file.flush()?;
        file.sync_data()?;

        tracing::debug!(
            operator = %key,
            daily_total = row.daily_total,
            weekly_accumulated = row.weekly_accumulated,
            "Row appended"
        );

        Ok(())
    }

    fn clear_rows(&self, key: &OperatorKey) -> Result<()> {
        let path = self.sheet_path(key);
        self.write_all_synced(&path, &format!("{}\n", self.header()))?;

        tracing::info!(operator = %key, "Sheet rows cleared");
        Ok(())
    }
}
