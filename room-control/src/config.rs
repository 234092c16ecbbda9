//! Configuration for room control

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Room control configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the registry store
    pub data_dir: PathBuf,

    /// Fixed room set, in display order
    pub rooms: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/rooms"),
            rooms: (1..=6).map(|n| format!("Room {}", n)).collect(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty or duplicated room sets
    pub fn validate(&self) -> crate::Result<()> {
        if self.rooms.is_empty() {
            return Err(crate::Error::Config("Room set must not be empty".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for room in &self.rooms {
            if !seen.insert(room) {
                return Err(crate::Error::Config(format!("Duplicate room: {}", room)));
            }
        }
        Ok(())
    }
}
