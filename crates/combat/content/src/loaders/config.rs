//! Combat tuning loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load tuning from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        if config.target_frame_rate == 0 {
            anyhow::bail!("target_frame_rate must be at least 1");
        }
        if config.buffer_window_frames() > CombatConfig::MAX_BUFFERED_INPUTS as u64 {
            anyhow::bail!(
                "buffer_window_ms = {} spans {} frames at {} fps; at most {} requests can be buffered",
                config.buffer_window_ms,
                config.buffer_window_frames(),
                config.target_frame_rate,
                CombatConfig::MAX_BUFFERED_INPUTS
            );
        }
        Ok(config)
    }
}
