//! Turn lifecycle controller
//!
//! Models the bounded period between `start` and `end` on top of an
//! arbitrated claim. State is derived from registry occupancy plus an
//! in-memory in-progress flag; the flag is intentionally not persisted, since
//! the durable contract covers occupancy only.
//!
//! Ownership gating holds the same per-room lock as the registry, so a
//! `start` can never interleave with a concurrent `end` or `claim` on the
//! same room.

use crate::{
    error::{Error, Result},
    registry::RoomRegistry,
    types::{OperatorId, TurnRecord, TurnState},
};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

/// Per-room turn state machine
pub struct TurnController {
    registry: Arc<RoomRegistry>,

    /// Rooms with an active turn
    in_progress: DashMap<String, ()>,
}

impl TurnController {
    /// Create new controller over a registry
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self {
            registry,
            in_progress: DashMap::new(),
        }
    }

    /// Derived turn state of a room
    pub fn state(&self, room: &str) -> Result<TurnState> {
        match self.registry.occupant(room)? {
            None => Ok(TurnState::Unassigned),
            Some(_) if self.in_progress.contains_key(room) => Ok(TurnState::InProgress),
            Some(_) => Ok(TurnState::Assigned),
        }
    }

    /// Start a turn; requester must be the occupant
    pub async fn start(&self, room: &str, operator: &OperatorId) -> Result<TurnRecord> {
        let lock = self.registry.lock_for(room)?;
        let _guard = lock.lock().await;

        self.verify_owner(room, operator)?;
        self.in_progress.insert(room.to_string(), ());

        tracing::info!(room = %room, operator = %operator, "Turn started");
        Ok(self.record(room, operator))
    }

    /// Request a supervisory review; requester must be the occupant
    ///
    /// No state change; the caller forwards the record to the supervisory
    /// audience.
    pub async fn review(&self, room: &str, operator: &OperatorId) -> Result<TurnRecord> {
        let lock = self.registry.lock_for(room)?;
        let _guard = lock.lock().await;

        self.verify_owner(room, operator)?;

        tracing::info!(room = %room, operator = %operator, "Review requested");
        Ok(self.record(room, operator))
    }

    /// Report a problem; submittable regardless of ownership
    ///
    /// No precondition and no state change, so no lock is taken. The free-text
    /// payload travels with the caller's event, not through the controller.
    pub fn report(&self, room: &str, operator: &OperatorId) -> Result<TurnRecord> {
        if !self.registry.room_names().iter().any(|name| name == room) {
            return Err(Error::UnknownRoom(room.to_string()));
        }

        tracing::info!(room = %room, operator = %operator, "Problem reported");
        Ok(self.record(room, operator))
    }

    /// End a turn; requester must be the occupant
    ///
    /// Releases the room and clears the in-progress flag.
    pub async fn end(&self, room: &str, operator: &OperatorId) -> Result<TurnRecord> {
        let lock = self.registry.lock_for(room)?;
        let _guard = lock.lock().await;

        self.verify_owner(room, operator)?;
        self.registry.release(room)?;
        self.in_progress.remove(room);

        tracing::info!(room = %room, operator = %operator, "Turn ended");
        Ok(self.record(room, operator))
    }

    fn verify_owner(&self, room: &str, operator: &OperatorId) -> Result<()> {
        match self.registry.occupant(room)? {
            Some(ref holder) if holder == operator => Ok(()),
            held_by => Err(Error::NotOwner {
                room: room.to_string(),
                held_by,
            }),
        }
    }

    fn record(&self, room: &str, operator: &OperatorId) -> TurnRecord {
        TurnRecord {
            room: room.to_string(),
            operator: operator.clone(),
            at: Utc::now(),
        }
    }
}
