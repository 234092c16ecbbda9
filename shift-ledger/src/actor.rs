//! Per-operator single-writer actors
//!
//! Deriving `weekly_accumulated` is a read-modify-write over the stored row
//! sequence, so each operator key gets exactly one writer task. Appends for
//! the same key are strictly ordered through the actor's mailbox; different
//! keys run in parallel. The actor owns the in-memory row sequence and the
//! sheet writes; nothing else touches an operator's sheet.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            OperatorHandle (Clone)             │
//! │        Sends messages to actor mailbox        │
//! └──────────────────────┬───────────────────────┘
//!                        │ mpsc::channel (bounded)
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │         OperatorActor (single task)           │
//! │  rows: Vec<LedgerRow>   reset-check → append  │
//! │                        │                      │
//! │                        ▼                      │
//! │            SheetStore::append_row             │
//! │         (synced before acknowledging)         │
//! └──────────────────────────────────────────────┘
//! ```

use crate::{
    error::{Error, Result},
    sheet::SheetStore,
    types::{LedgerRow, OperatorKey},
    week,
};
use chrono::{FixedOffset, Timelike, Weekday};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Message sent to an operator actor
pub enum LedgerMessage {
    /// Append a submission, values in configured category order
    Append {
        /// Per-category amounts
        values: Vec<u64>,
        /// Reply channel
        response: oneshot::Sender<Result<LedgerRow>>,
    },

    /// Snapshot of the current row sequence
    Rows {
        /// Reply channel
        response: oneshot::Sender<Vec<LedgerRow>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor owning one operator's row sequence
pub struct OperatorActor {
    key: OperatorKey,
    sheet: Arc<dyn SheetStore>,
    mailbox: mpsc::Receiver<LedgerMessage>,
    rows: Vec<LedgerRow>,
    reset_weekday: Weekday,
    offset: FixedOffset,
}

impl OperatorActor {
    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                LedgerMessage::Append { values, response } => {
                    let result = self.append(values);
                    let _ = response.send(result);
                }
                LedgerMessage::Rows { response } => {
                    let _ = response.send(self.rows.clone());
                }
                LedgerMessage::Shutdown => break,
            }
        }

        tracing::debug!(operator = %self.key, "Operator actor stopped");
    }

    fn append(&mut self, values: Vec<u64>) -> Result<LedgerRow> {
        let now = week::now_in(self.offset);
        let today = now.date_naive();

        // First append after the reset boundary clears the previous window.
        // Comparing the last row's date with the week start fires this once
        // per cycle, not on every reset-day submission.
        if let Some(last) = self.rows.last() {
            if !week::in_current_window(last.date, today, self.reset_weekday) {
                self.sheet.clear_rows(&self.key)?;
                self.rows.clear();
                tracing::info!(operator = %self.key, "Weekly window reset");
            }
        }

        let daily_total = values.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
        let weekly_accumulated = self
            .rows
            .last()
            .map(|row| row.weekly_accumulated)
            .unwrap_or(0)
            .saturating_add(daily_total);

        let time = now.time().with_nanosecond(0).unwrap_or_else(|| now.time());
        let row = LedgerRow {
            date: today,
            values,
            daily_total,
            weekly_accumulated,
            time,
        };

        // Durable before acknowledgement
        self.sheet.append_row(&self.key, &row)?;
        self.rows.push(row.clone());

        Ok(row)
    }
}

/// Handle for sending messages to an operator actor
#[derive(Clone)]
pub struct OperatorHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

impl OperatorHandle {
    /// Append a submission
    pub async fn append(&self, values: Vec<u64>) -> Result<LedgerRow> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::Append {
                values,
                response: tx,
            })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Snapshot of the row sequence
    pub async fn rows(&self) -> Result<Vec<LedgerRow>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::Rows { response: tx })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the single writer for one operator key
///
/// Ensures the sheet exists and loads persisted rows before the actor starts,
/// so the first append already sees the stored window.
pub fn spawn_operator_actor(
    key: OperatorKey,
    sheet: Arc<dyn SheetStore>,
    reset_weekday: Weekday,
    offset: FixedOffset,
) -> Result<OperatorHandle> {
    sheet.ensure_sheet(&key)?;
    let rows = sheet.load_rows(&key)?;

    let (tx, rx) = mpsc::channel(64);
    let actor = OperatorActor {
        key,
        sheet,
        mailbox: rx,
        rows,
        reset_weekday,
        offset,
    };

    tokio::spawn(async move {
        actor.run().await;
    });

    Ok(OperatorHandle { sender: tx })
}
