//! RoomDesk shift ledger
//!
//! Durable, per-operator append-only log of submission rows with weekly
//! accumulation and a fixed reset boundary.
//!
//! # Architecture
//!
//! - **Append-only**: rows are immutable once written
//! - **Single writer per key**: one actor task per operator key serializes
//!   the read-modify-write that derives the weekly running total
//! - **Lazy lifecycle**: an operator's ledger (and its sheet) is created on
//!   first submission; the row sequence is cleared once per weekly cycle, on
//!   the first append observed after the reset boundary
//! - **Durable before acknowledgement**: a row is flushed to its sheet before
//!   the caller sees it

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod actor;
pub mod config;
pub mod error;
pub mod ledger;
pub mod sheet;
pub mod types;
pub mod week;

// Re-exports
pub use config::LedgerConfig;
pub use error::{Error, Result};
pub use ledger::LedgerStore;
pub use sheet::{CsvSheetStore, SheetStore};
pub use types::{LedgerRow, OperatorKey};
