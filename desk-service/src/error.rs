//! Error types for the desk service

use thiserror::Error;

/// Result type for desk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Desk service errors
#[derive(Error, Debug)]
pub enum Error {
    /// Room control error
    #[error("Room control error: {0}")]
    Rooms(#[from] room_control::Error),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] shift_ledger::Error),

    /// Submission failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bounded external call did not finish in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Event sink error
    #[error("Event sink error: {0}")]
    Sink(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
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
