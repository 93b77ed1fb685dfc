//! Balance configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loads [`GameConfig`] overrides from TOML.
///
/// Keys left out of the file keep their defaults, so a file only needs the
/// values it changes.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.near_miss_threshold < 0.0 || config.tight_window < 0.0 {
            anyhow::bail!("Config thresholds must not be negative");
        }
        Ok(config)
    }
}
