//! Observable event payloads
//!
//! Every committed desk operation produces one event, wrapped in an envelope
//! with a time-ordered id. Delivery goes through the `EventSink` port; the
//! transport that renders events for humans lives outside this crate.
//! Delivery failure never rolls back the state mutation that preceded it.

use chrono::{DateTime, Utc};
use room_control::OperatorId;
use serde::Serialize;
use shift_ledger::OperatorKey;
use uuid::Uuid;

/// Externally observable desk event
#[derive(Debug, Clone, Serialize)]
pub enum DeskEvent {
    /// A room was claimed (or re-claimed by its holder)
    RoomClaimed {
        /// Room name
        room: String,
        /// New holder
        operator: OperatorId,
    },

    /// A claim was denied
    RoomDenied {
        /// Room name
        room: String,
        /// Current occupant
        held_by: OperatorId,
    },

    /// A turn started
    TurnStarted {
        /// Room name
        room: String,
        /// Occupant
        operator: OperatorId,
        /// Transition timestamp
        at: DateTime<Utc>,
    },

    /// A supervisory review was requested
    ReviewRequested {
        /// Room name
        room: String,
        /// Occupant
        operator: OperatorId,
        /// Supervisory audience tag, when configured
        audience: Option<String>,
        /// Request timestamp
        at: DateTime<Utc>,
    },

    /// A problem was reported
    ProblemReported {
        /// Room name
        room: String,
        /// Reporter (not necessarily the occupant)
        operator: OperatorId,
        /// Free-text description
        text: String,
        /// Report timestamp
        at: DateTime<Utc>,
    },

    /// A turn ended and the room was released
    TurnEnded {
        /// Room name
        room: String,
        /// Former occupant
        operator: OperatorId,
        /// Transition timestamp
        at: DateTime<Utc>,
    },

    /// A result submission was appended to the ledger
    ResultSubmitted {
        /// Operator ledger key
        operator: OperatorKey,
        /// Per-category amounts, configured category order
        values: Vec<u64>,
        /// Daily total
        daily_total: u64,
        /// Weekly running total including this submission
        weekly_accumulated: u64,
        /// Submission timestamp
        at: DateTime<Utc>,
    },
}

impl DeskEvent {
    /// Stable event kind label
    pub fn kind(&self) -> &'static str {
        match self {
            DeskEvent::RoomClaimed { .. } => "room_claimed",
            DeskEvent::RoomDenied { .. } => "room_denied",
            DeskEvent::TurnStarted { .. } => "turn_started",
            DeskEvent::ReviewRequested { .. } => "review_requested",
            DeskEvent::ProblemReported { .. } => "problem_reported",
            DeskEvent::TurnEnded { .. } => "turn_ended",
            DeskEvent::ResultSubmitted { .. } => "result_submitted",
        }
    }
}

/// Event envelope
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Event id (UUIDv7 for time-ordering)
    pub id: Uuid,

    /// Envelope timestamp
    pub at: DateTime<Utc>,

    /// Payload
    pub event: DeskEvent,
}

impl EventEnvelope {
    /// Wrap an event
    pub fn new(event: DeskEvent) -> Self {
        Self {
            id: Uuid::now_v7(),
            at: Utc::now(),
            event,
        }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| crate::Error::Sink(e.to_string()))
    }
}

/// Delivery port for observable events
pub trait EventSink: Send + Sync {
    /// Deliver one envelope
    fn deliver(&self, envelope: &EventEnvelope) -> crate::Result<()>;
}

/// Sink that logs events as structured JSON
pub struct LogSink;

impl EventSink for LogSink {
    fn deliver(&self, envelope: &EventEnvelope) -> crate::Result<()> {
        let payload = serde_json::to_string(envelope)
            .map_err(|e| crate::Error::Sink(e.to_string()))?;

        tracing::info!(kind = envelope.event.kind(), payload = %payload, "Desk event");
        Ok(())
    }
}

/// Sink that forwards envelopes to an in-process channel
///
/// Used by tests and by embedders that bridge events onto their own
/// transport.
pub struct ChannelSink {
    sender: tokio::sync::mpsc::UnboundedSender<EventEnvelope>,
}

impl ChannelSink {
    /// Create a sink and the receiving half
    pub fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<EventEnvelope>) {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, envelope: &EventEnvelope) -> crate::Result<()> {
        self.sender
            .send(envelope.clone())
            .map_err(|_| crate::Error::Sink("Event channel closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes() {
        let envelope = EventEnvelope::new(DeskEvent::RoomClaimed {
            room: "Room 1".to_string(),
            operator: OperatorId::new("op-1"),
        });

        let bytes = envelope.to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("RoomClaimed"));
        assert!(text.contains("Room 1"));
    }

    #[test]
    fn test_channel_sink_captures_events() {
        let (sink, mut receiver) = ChannelSink::new();

        let envelope = EventEnvelope::new(DeskEvent::TurnEnded {
            room: "Room 2".to_string(),
            operator: OperatorId::new("op-1"),
            at: Utc::now(),
        });
        sink.deliver(&envelope).unwrap();

        let received = receiver.try_recv().unwrap();
        assert_eq!(received.event.kind(), "turn_ended");
        assert_eq!(received.id, envelope.id);
    }

    #[test]
    fn test_envelope_ids_are_distinct() {
        let first = EventEnvelope::new(DeskEvent::RoomDenied {
            room: "Room 1".to_string(),
            held_by: OperatorId::new("op-1"),
        });
        let second = EventEnvelope::new(DeskEvent::RoomDenied {
            room: "Room 1".to_string(),
            held_by: OperatorId::new("op-1"),
        });

        assert_ne!(first.id, second.id);
    }
}
