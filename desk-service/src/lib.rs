//! RoomDesk desk service
//!
//! Orchestration layer over room control and the shift ledger: a tagged
//! command model, the result submission flow, observable event payloads, and
//! the dispatch boundary that maps every failure onto the user-facing error
//! taxonomy. Transport (chat platform, notification delivery) stays outside;
//! this crate ends at typed replies and an event sink port.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod flow;
pub mod metrics;

// Re-exports
pub use command::Command;
pub use config::Config;
pub use dispatch::{Dispatcher, Reply};
pub use error::{Error, Result};
pub use events::{ChannelSink, DeskEvent, EventEnvelope, EventSink, LogSink};
pub use flow::ResultSubmissionFlow;
