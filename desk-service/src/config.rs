//! Configuration for the desk service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Desk service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Data directory for the room registry store
    pub registry_data_dir: PathBuf,

    /// Directory holding per-operator ledger sheets
    pub sheet_dir: PathBuf,

    /// Fixed room set, in display order
    pub rooms: Vec<String>,

    /// Fixed category set, in sheet column order
    pub categories: Vec<String>,

    /// Weekday on which the accumulation window restarts
    pub reset_weekday: String,

    /// Reference time zone as a whole-hour UTC offset
    pub utc_offset_hours: i32,

    /// Supervisory audience tag attached to review requests
    pub monitor_audience: Option<String>,

    /// Upper bound on a single external call (ledger append)
    pub request_timeout_ms: u64,

    /// Metrics listen address
    pub metrics_listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "desk-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            registry_data_dir: PathBuf::from("./data/rooms"),
            sheet_dir: PathBuf::from("./data/sheets"),
            rooms: (1..=6).map(|n| format!("Room {}", n)).collect(),
            categories: vec![
                "Streams".to_string(),
                "Messages".to_string(),
                "Tips".to_string(),
                "Calls".to_string(),
            ],
            reset_weekday: "Sunday".to_string(),
            utc_offset_hours: -5,
            monitor_audience: None,
            request_timeout_ms: 10_000,
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(dir) = std::env::var("DESK_REGISTRY_DATA_DIR") {
            config.registry_data_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("DESK_SHEET_DIR") {
            config.sheet_dir = PathBuf::from(dir);
        }

        if let Ok(addr) = std::env::var("DESK_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        if let Ok(audience) = std::env::var("DESK_MONITOR_AUDIENCE") {
            config.monitor_audience = Some(audience);
        }

        Ok(config)
    }

    /// Room control configuration slice
    pub fn room_config(&self) -> room_control::Config {
        room_control::Config {
            data_dir: self.registry_data_dir.clone(),
            rooms: self.rooms.clone(),
        }
    }

    /// Ledger configuration slice
    pub fn ledger_config(&self) -> shift_ledger::LedgerConfig {
        shift_ledger::LedgerConfig {
            sheet_dir: self.sheet_dir.clone(),
            categories: self.categories.clone(),
            reset_weekday: self.reset_weekday.clone(),
            utc_offset_hours: self.utc_offset_hours,
        }
    }
}
