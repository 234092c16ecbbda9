//! Room registry with concurrency-safe claim arbitration
//!
//! The registry owns the durable occupancy map. All mutation routes through
//! `claim` and `release`; nothing else touches storage. Each room has its own
//! async mutex, so operations on the same room are strictly ordered while
//! different rooms proceed in parallel. Holding the lock across the storage
//! write keeps the durability-before-acknowledgement invariant: a granted
//! claim is on disk before the caller hears about it.

use crate::{
    error::{Error, Result},
    storage::RegistryStore,
    types::{ClaimDecision, OperatorId, RoomStatus},
    Config,
};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Durable map of room name to current occupant
pub struct RoomRegistry {
    /// Persistence sink
    store: RegistryStore,

    /// Configured room names, in display order
    order: Vec<String>,

    /// In-memory occupancy mirror of the store
    occupants: RwLock<HashMap<String, Option<OperatorId>>>,

    /// Per-room serialization locks
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RoomRegistry {
    /// Open the registry, loading persisted occupancy for the configured rooms
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let store = RegistryStore::open(config)?;
        let occupants = store.load(&config.rooms)?;

        let locks = DashMap::new();
        for room in &config.rooms {
            locks.insert(room.clone(), Arc::new(Mutex::new(())));
        }

        Ok(Self {
            store,
            order: config.rooms.clone(),
            occupants: RwLock::new(occupants),
            locks,
        })
    }

    /// Configured room names in display order
    pub fn room_names(&self) -> &[String] {
        &self.order
    }

    /// Snapshot of all rooms in display order; no side effect
    pub fn list_rooms(&self) -> Vec<RoomStatus> {
        let occupants = self.occupants.read();
        self.order
            .iter()
            .map(|name| RoomStatus {
                name: name.clone(),
                occupant: occupants.get(name).cloned().flatten(),
            })
            .collect()
    }

    /// Current occupant of a room; snapshot read
    pub fn occupant(&self, room: &str) -> Result<Option<OperatorId>> {
        self.occupants
            .read()
            .get(room)
            .cloned()
            .ok_or_else(|| Error::UnknownRoom(room.to_string()))
    }

    /// Reverse lookup: the room currently held by an operator, if any
    pub fn find_assignment(&self, operator: &OperatorId) -> Option<String> {
        let occupants = self.occupants.read();
        self.order
            .iter()
            .find(|name| occupants.get(*name).cloned().flatten().as_ref() == Some(operator))
            .cloned()
    }

    /// Serialization lock for one room; errors on unknown rooms
    pub(crate) fn lock_for(&self, room: &str) -> Result<Arc<Mutex<()>>> {
        self.locks
            .get(room)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::UnknownRoom(room.to_string()))
    }

    /// Claim a room for an operator
    ///
    /// Free room: occupant is set and persisted, `Granted`. Own room:
    /// `Reaffirmed`, no write. Foreign room: `Denied` with the holder's id,
    /// state untouched.
    pub async fn claim(&self, room: &str, operator: &OperatorId) -> Result<ClaimDecision> {
        let lock = self.lock_for(room)?;
        let _guard = lock.lock().await;

        let current = self.occupant(room)?;

        match current {
            None => {
                // Persist before the in-memory update and before returning
                self.store.put_occupant(room, Some(operator))?;
                self.occupants
                    .write()
                    .insert(room.to_string(), Some(operator.clone()));

                tracing::info!(room = %room, operator = %operator, "Room claimed");
                Ok(ClaimDecision::Granted)
            }
            Some(holder) if holder == *operator => Ok(ClaimDecision::Reaffirmed),
            Some(holder) => {
                tracing::debug!(room = %room, operator = %operator, held_by = %holder, "Claim denied");
                Ok(ClaimDecision::Denied(holder))
            }
        }
    }

    /// Release a room unconditionally; idempotent
    ///
    /// Only the turn controller's `end` transition calls this, while holding
    /// the room's serialization lock.
    pub(crate) fn release(&self, room: &str) -> Result<()> {
        // Unknown rooms were rejected by lock_for before this point
        self.store.put_occupant(room, None)?;
        self.occupants.write().insert(room.to_string(), None);

        tracing::info!(room = %room, "Room released");
        Ok(())
    }
}
