//! RoomDesk room control
//!
//! Occupancy state machine for a fixed set of shared rooms.
//!
//! # Architecture
//!
//! - **Single occupant**: at most one operator holds a room at any instant
//! - **Durable map**: every occupancy mutation is persisted before the call
//!   returns
//! - **Per-room serialization**: operations on the same room are strictly
//!   ordered; different rooms proceed in parallel

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod arbiter;
pub mod config;
pub mod error;
pub mod registry;
pub mod storage;
pub mod turns;
pub mod types;

// Re-exports
pub use arbiter::ClaimArbiter;
pub use config::Config;
pub use error::{Error, Result};
pub use registry::RoomRegistry;
pub use turns::TurnController;
pub use types::{ClaimDecision, ClaimOutcome, OperatorId, RoomStatus, TurnRecord, TurnState};
