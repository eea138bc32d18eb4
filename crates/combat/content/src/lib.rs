//! Data-driven move lists and tuning.
//!
//! This crate reads the authored combat content into the types `combat-core`
//! consumes:
//! - Move lists (actions and hidden combos, RON, names interned to ids)
//! - Combat tuning (`CombatConfig`, TOML)
//!
//! Content is loaded once at setup time and never touched by the simulation.

pub mod loaders;

pub use loaders::{
    ActionSpec, ConfigLoader, ContentFactory, HiddenComboSpec, LoadResult, LoadedMoves, MoveList,
    MoveListLoader,
};
