//! Content factory for loading every combat data file from one directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{ConfigLoader, LoadResult, LoadedMoves, MoveListLoader};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── moves.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load the move list from `moves.ron`.
    pub fn load_moves(&self) -> LoadResult<LoadedMoves> {
        let path = self.data_dir.join("moves.ron");
        MoveListLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
