//! Desk service binary
//!
//! Opens the dispatcher with the logging event sink and waits for shutdown.
//! Transport adapters (chat platform, HTTP) attach to the dispatcher from
//! their own processes or embedding code.

use anyhow::Context;
use desk_service::{Config, Dispatcher, LogSink};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting RoomDesk desk server");

    // Load configuration: file wins over environment overrides
    let config = match std::env::var("DESK_CONFIG") {
        Ok(path) => Config::from_file(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => Config::from_env().context("loading configuration from environment")?,
    };

    let dispatcher =
        Dispatcher::open(&config, Arc::new(LogSink)).context("opening desk components")?;

    tracing::info!(
        rooms = config.rooms.len(),
        categories = config.categories.len(),
        "Desk service ready"
    );

    for room in dispatcher.rooms() {
        tracing::info!(
            room = %room.name,
            occupant = room.occupant.as_ref().map(|o| o.as_str()).unwrap_or("<free>"),
            "Room state restored"
        );
    }

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down desk server");
    dispatcher.shutdown().await?;

    Ok(())
}
