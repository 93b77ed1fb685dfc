//! Numgeon terminal client.
//!
//! Composition root: reads configuration from the environment (and `.env`),
//! routes logs to a per-session file, builds the [`Runtime`] and hands the
//! terminal to the line driver.

mod config;
mod logging;
mod repl;

use std::io;

use anyhow::Result;
use game_content::ConfigLoader;
use game_core::GameConfig;
use runtime::{Event, Runtime, RuntimeConfig, Topic};
use tokio::sync::broadcast::{Receiver, error::RecvError};

use crate::config::ClientConfig;
use crate::repl::Repl;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let session_id = config.session_id.clone().unwrap_or_else(|| {
        chrono::Local::now()
            .format("session_%Y%m%d_%H%M%S")
            .to_string()
    });
    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(logging::default_log_dir);
    let log_path = logging::setup_logging(&log_dir, &session_id)?;

    let game_config = match &config.config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => GameConfig::default(),
    };
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        ascension = config.ascension,
        loadout = %config.loadout,
        "starting numgeon"
    );

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            game_config,
            seed,
            ascension: config.ascension,
            loadout: config.loadout,
            ..RuntimeConfig::default()
        })
        .build()?;
    let recorder = tokio::spawn(record_events(
        runtime.subscribe(Topic::Combat),
        runtime.subscribe(Topic::Player),
    ));

    println!(
        "NUMGEON: seed {seed}, loadout {}, ascension {}",
        config.loadout.name(),
        config.ascension
    );
    println!("Logs: {}", log_path.display());
    println!("Type `help` for commands.");

    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        Repl::new(runtime, stdin.lock(), io::stdout()).run()
    })
    .await??;

    recorder.await?;
    tracing::info!("client shutdown complete");
    Ok(())
}

/// Mirrors every bus event into the log as JSON until the runtime is dropped.
async fn record_events(mut combat: Receiver<Event>, mut player: Receiver<Event>) {
    let mut combat_open = true;
    let mut player_open = true;
    while combat_open || player_open {
        tokio::select! {
            received = combat.recv(), if combat_open => combat_open = record(received),
            received = player.recv(), if player_open => player_open = record(received),
        }
    }
}

/// Logs one receive result; returns whether the channel is still open.
fn record(received: std::result::Result<Event, RecvError>) -> bool {
    match received {
        Ok(event) => {
            match serde_json::to_string(&event) {
                Ok(json) => tracing::debug!(target: "numgeon::events", topic = ?event.topic(), %json),
                Err(e) => tracing::warn!(error = %e, "event not serializable"),
            }
            true
        }
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "event recorder lagged");
            true
        }
        Err(RecvError::Closed) => false,
    }
}
