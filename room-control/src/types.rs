//! Core types for room occupancy control

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator identifier (stable chat-platform user id or display name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorId(String);

impl OperatorId {
    /// Create new operator ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decision produced by a single claim request
///
/// A value, never stored: the registry's durable state is only the
/// room-to-occupant map itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    /// Room was free and is now held by the requester
    Granted,
    /// Requester already held the room; no state change
    Reaffirmed,
    /// Room is held by another operator; no state change
    Denied(OperatorId),
}

/// Externally visible outcome of an arbitrated claim
///
/// A rejection is an expected conflict, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOutcome {
    /// Requester now holds (or re-holds) the room
    Assigned {
        /// Room name
        room: String,
        /// Holder
        operator: OperatorId,
        /// True when the requester already held the room
        reaffirmed: bool,
    },
    /// Room is held by someone else; state untouched
    Rejected {
        /// Room name
        room: String,
        /// Current occupant
        held_by: OperatorId,
    },
}

/// Turn lifecycle state for one room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// Room is free
    Unassigned,
    /// Room has an occupant but no active turn
    Assigned,
    /// Occupant has started a turn
    InProgress,
}

/// Snapshot entry returned by `list_rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatus {
    /// Room name
    pub name: String,
    /// Current occupant, `None` when free
    pub occupant: Option<OperatorId>,
}

/// Record of a completed turn transition or side-action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Room the transition applied to
    pub room: String,
    /// Requesting operator
    pub operator: OperatorId,
    /// Transition timestamp
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_id_display() {
        let op = OperatorId::new("op-42");
        assert_eq!(op.as_str(), "op-42");
        assert_eq!(op.to_string(), "op-42");
    }

    #[test]
    fn test_claim_decision_equality() {
        let a = ClaimDecision::Denied(OperatorId::new("x"));
        let b = ClaimDecision::Denied(OperatorId::new("x"));
        assert_eq!(a, b);
        assert_ne!(a, ClaimDecision::Granted);
    }
}
