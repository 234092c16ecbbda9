//! Main ledger orchestration layer
//!
//! `LedgerStore` validates submissions against the configured category set
//! and routes them to per-operator writer actors. Actors are spawned lazily:
//! an operator's ledger comes into existence on their first submission.
//!
//! # Example
//!
//! ```no_run
//! use shift_ledger::{LedgerConfig, LedgerStore, OperatorKey};
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> shift_ledger::Result<()> {
//!     let ledger = LedgerStore::open(LedgerConfig::default())?;
//!
//!     let key = OperatorKey::new("ana");
//!     let amounts = HashMap::from([("Streams".to_string(), 12u64)]);
//!     let row = ledger.append(&key, &amounts).await?;
//!     println!("accumulated this week: {}", row.weekly_accumulated);
//!
//!     Ok(())
//! }
//! ```

use crate::{
    actor::{spawn_operator_actor, OperatorHandle},
    config::LedgerConfig,
    error::{Error, Result},
    sheet::{CsvSheetStore, SheetStore},
    types::{LedgerRow, OperatorKey},
    week,
};
use chrono::{FixedOffset, Weekday};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-operator append-only ledger with weekly accumulation
pub struct LedgerStore {
    /// Sheet materialization sink
    sheet: Arc<dyn SheetStore>,

    /// Live writer actors, one per operator key
    handles: DashMap<String, OperatorHandle>,

    /// Fixed category set, sheet column order
    categories: Vec<String>,

    /// Parsed reset weekday
    reset_weekday: Weekday,

    /// Reference time zone
    offset: FixedOffset,
}

impl LedgerStore {
    /// Open ledger with the CSV sheet store
    pub fn open(config: LedgerConfig) -> Result<Self> {
        let sheet = Arc::new(CsvSheetStore::new(
            &config.sheet_dir,
            config.categories.clone(),
        )?);
        Self::with_sheet_store(config, sheet)
    }

    /// Open ledger over an injected sheet store
    pub fn with_sheet_store(config: LedgerConfig, sheet: Arc<dyn SheetStore>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            sheet,
            handles: DashMap::new(),
            reset_weekday: config.parsed_reset_weekday()?,
            offset: config.offset()?,
            categories: config.categories,
        })
    }

    /// Configured categories in sheet column order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Append a submission for an operator
    ///
    /// Missing categories default to 0; unknown categories are rejected, and
    /// nothing is appended. The returned row carries the derived daily total
    /// and weekly running total.
    pub async fn append(
        &self,
        key: &OperatorKey,
        amounts: &HashMap<String, u64>,
    ) -> Result<LedgerRow> {
        let values = self.ordered_values(amounts)?;
        let handle = self.handle_for(key)?;
        handle.append(values).await
    }

    /// Stored rows for an operator, oldest first
    ///
    /// Reads through a live actor when one exists; otherwise straight from
    /// the sheet, without creating one for a never-seen key.
    pub async fn rows(&self, key: &OperatorKey) -> Result<Vec<LedgerRow>> {
        // Clone the handle out before awaiting; map guards must not be held
        // across suspension points
        let live = self.handles.get(key.as_str()).map(|h| h.value().clone());
        match live {
            Some(handle) => handle.rows().await,
            None => self.sheet.load_rows(key),
        }
    }

    /// Current-window accumulated total for an operator
    ///
    /// 0 for an unseen operator or when the stored rows all predate the
    /// current window.
    pub async fn weekly_total(&self, key: &OperatorKey) -> Result<u64> {
        let today = week::now_in(self.offset).date_naive();
        Ok(self
            .rows(key)
            .await?
            .last()
            .filter(|row| week::in_current_window(row.date, today, self.reset_weekday))
            .map(|row| row.weekly_accumulated)
            .unwrap_or(0))
    }

    /// Shutdown all writer actors
    pub async fn shutdown(&self) -> Result<()> {
        let handles: Vec<OperatorHandle> = self
            .handles
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for handle in handles {
            handle.shutdown().await?;
        }
        Ok(())
    }

    /// Validate raw amounts and order them by configured category
    fn ordered_values(&self, amounts: &HashMap<String, u64>) -> Result<Vec<u64>> {
        for name in amounts.keys() {
            if !self.categories.iter().any(|c| c == name) {
                return Err(Error::UnknownCategory(name.clone()));
            }
        }

        Ok(self
            .categories
            .iter()
            .map(|category| amounts.get(category).copied().unwrap_or(0))
            .collect())
    }

    /// Get or lazily spawn the writer actor for a key
    fn handle_for(&self, key: &OperatorKey) -> Result<OperatorHandle> {
        match self.handles.entry(key.as_str().to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let handle = spawn_operator_actor(
                    key.clone(),
                    self.sheet.clone(),
                    self.reset_weekday,
                    self.offset,
                )?;
                entry.insert(handle.clone());
                tracing::debug!(operator = %key, "Operator ledger opened");
                Ok(handle)
            }
        }
    }
}
