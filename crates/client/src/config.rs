//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use game_content::LoadoutId;

/// Settings for one terminal session.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Run seed; drawn at random when unset.
    pub seed: Option<u32>,
    pub ascension: u8,
    pub loadout: LoadoutId,
    /// TOML file with balance overrides.
    pub config_path: Option<PathBuf>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `NUMGEON_SEED` - Run seed (default: random)
    /// - `NUMGEON_ASCENSION` - Ascension level 0-10 (default: 0)
    /// - `NUMGEON_LOADOUT` - Starting loadout name (default: standard)
    /// - `NUMGEON_CONFIG` - Path to a GameConfig TOML file
    /// - `NUMGEON_SESSION_ID` - Session identifier for log files (default: timestamp)
    /// - `NUMGEON_LOG_DIR` - Log directory (default: platform cache dir)
    pub fn from_env() -> Self {
        Self {
            seed: read_env("NUMGEON_SEED"),
            ascension: read_env::<u8>("NUMGEON_ASCENSION")
                .unwrap_or(0)
                .min(game_core::MAX_ASCENSION),
            loadout: read_env("NUMGEON_LOADOUT").unwrap_or_default(),
            config_path: env::var("NUMGEON_CONFIG").ok().map(PathBuf::from),
            session_id: env::var("NUMGEON_SESSION_ID").ok(),
            log_dir: env::var("NUMGEON_LOG_DIR").ok().map(PathBuf::from),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
