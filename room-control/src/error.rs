//! Error types for room control

use crate::types::OperatorId;
use thiserror::Error;

/// Result type for room control operations
pub type Result<T> = std::result::Result<T, Error>;

/// Room control errors
#[derive(Error, Debug)]
pub enum Error {
    /// Room is not part of the configured set
    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    /// Ownership-gated transition requested by a non-occupant
    #[error("Room {room} is not held by the requester")]
    NotOwner {
        /// Room the transition was attempted on
        room: String,
        /// Current occupant, `None` when the room is free
        held_by: Option<OperatorId>,
    },

    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Concurrency error
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
