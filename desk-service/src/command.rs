//! Inbound command model
//!
//! One tagged variant per desk operation, constructed by the transport layer
//! and matched exhaustively by the dispatcher. Replaces opaque
//! `action::room` string tokens with typed routing.

use room_control::OperatorId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One inbound desk event from the external event source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    /// Claim a room
    Claim {
        /// Target room
        room: String,
        /// Requesting operator
        operator: OperatorId,
    },

    /// Start a turn on an assigned room
    Start {
        /// Target room
        room: String,
        /// Requesting operator
        operator: OperatorId,
    },

    /// Request a supervisory review of an assigned room
    Review {
        /// Target room
        room: String,
        /// Requesting operator
        operator: OperatorId,
    },

    /// Report a problem with a room, ownership not required
    Report {
        /// Target room
        room: String,
        /// Reporting operator
        operator: OperatorId,
        /// Free-text description
        text: String,
    },

    /// End a turn, releasing the room
    End {
        /// Target room
        room: String,
        /// Requesting operator
        operator: OperatorId,
    },

    /// Submit result amounts, raw tokens keyed by category name
    Submit {
        /// Submitting operator
        operator: OperatorId,
        /// Raw token per category, as typed by the operator
        entries: HashMap<String, String>,
    },
}

impl Command {
    /// Stable command kind label, used for logging and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Claim { .. } => "claim",
            Command::Start { .. } => "start",
            Command::Review { .. } => "review",
            Command::Report { .. } => "report",
            Command::End { .. } => "end",
            Command::Submit { .. } => "submit",
        }
    }
}
