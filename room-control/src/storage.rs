//! Durable room map storage using RocksDB
//!
//! # Column Families
//!
//! - `rooms` - Occupancy map (key: room name, value: bincode `Option<operator id>`)
//!
//! `None` is the explicit free marker; a missing key means the room was never
//! initialized, which `open` repairs for every configured room. Writes go
//! through the RocksDB WAL, so a room claim acknowledged to the caller
//! survives a process crash.

use crate::{
    error::{Error, Result},
    types::OperatorId,
    Config,
};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, DB};
use std::collections::HashMap;
use std::sync::Arc;

/// Column family names
const CF_ROOMS: &str = "rooms";

/// Storage wrapper for the room occupancy map
pub struct RegistryStore {
    db: Arc<DB>,
}

impl RegistryStore {
    /// Open or create the database and initialize configured rooms
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(CF_ROOMS, Options::default())];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;
        let store = Self { db: Arc::new(db) };

        store.init_rooms(&config.rooms)?;

        tracing::info!(
            path = ?path,
            rooms = config.rooms.len(),
            "Opened room registry store"
        );

        Ok(store)
    }

    fn cf_handle(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_ROOMS)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", CF_ROOMS)))
    }

    /// Seed every configured room that is not yet present as free
    fn init_rooms(&self, rooms: &[String]) -> Result<()> {
        let cf = self.cf_handle()?;
        for room in rooms {
            if self.db.get_cf(cf, room.as_bytes())?.is_none() {
                let value = bincode::serialize(&None::<String>)?;
                self.db.put_cf(cf, room.as_bytes(), &value)?;
                tracing::debug!(room = %room, "Initialized room as free");
            }
        }
        Ok(())
    }

    /// Persist the occupant of one room
    pub fn put_occupant(&self, room: &str, occupant: Option<&OperatorId>) -> Result<()> {
        let cf = self.cf_handle()?;
        let value = bincode::serialize(&occupant.map(|o| o.as_str().to_string()))?;

        self.db.put_cf(cf, room.as_bytes(), &value)?;

        tracing::debug!(
            room = %room,
            occupant = occupant.map(|o| o.as_str()).unwrap_or("<free>"),
            "Room occupancy persisted"
        );

        Ok(())
    }

    /// Read the occupant of one room
    pub fn get_occupant(&self, room: &str) -> Result<Option<OperatorId>> {
        let cf = self.cf_handle()?;

        let value = self
            .db
            .get_cf(cf, room.as_bytes())?
            .ok_or_else(|| Error::UnknownRoom(room.to_string()))?;

        let occupant: Option<String> = bincode::deserialize(&value)?;
        Ok(occupant.map(OperatorId::new))
    }

    /// Load the full map for the configured room set
    pub fn load(&self, rooms: &[String]) -> Result<HashMap<String, Option<OperatorId>>> {
        let mut map = HashMap::with_capacity(rooms.len());
        for room in rooms {
            map.insert(room.clone(), self.get_occupant(room)?);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config() -> (Config, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        (config, temp_dir)
    }

    #[test]
    fn test_open_initializes_rooms_free() {
        let (config, _temp) = test_config();
        let store = RegistryStore::open(&config).unwrap();

        for room in &config.rooms {
            assert_eq!(store.get_occupant(room).unwrap(), None);
        }
    }

    #[test]
    fn test_put_and_get_occupant() {
        let (config, _temp) = test_config();
        let store = RegistryStore::open(&config).unwrap();

        let op = OperatorId::new("op-1");
        store.put_occupant("Room 2", Some(&op)).unwrap();

        assert_eq!(store.get_occupant("Room 2").unwrap(), Some(op));
        assert_eq!(store.get_occupant("Room 1").unwrap(), None);
    }

    #[test]
    fn test_occupancy_survives_reopen() {
        let (config, _temp) = test_config();

        {
            let store = RegistryStore::open(&config).unwrap();
            store
                .put_occupant("Room 3", Some(&OperatorId::new("op-9")))
                .unwrap();
        }

        let store = RegistryStore::open(&config).unwrap();
        assert_eq!(
            store.get_occupant("Room 3").unwrap(),
            Some(OperatorId::new("op-9"))
        );
    }

    #[test]
    fn test_reopen_does_not_clobber_existing() {
        let (config, _temp) = test_config();

        {
            let store = RegistryStore::open(&config).unwrap();
            store
                .put_occupant("Room 1", Some(&OperatorId::new("op-1")))
                .unwrap();
        }

        // init_rooms must only seed missing keys
        let store = RegistryStore::open(&config).unwrap();
        assert_eq!(
            store.get_occupant("Room 1").unwrap(),
            Some(OperatorId::new("op-1"))
        );
    }

    #[test]
    fn test_unknown_room_errors() {
        let (config, _temp) = test_config();
        let store = RegistryStore::open(&config).unwrap();

        let result = store.get_occupant("Cellar");
        assert!(matches!(result, Err(Error::UnknownRoom(_))));
    }
}
