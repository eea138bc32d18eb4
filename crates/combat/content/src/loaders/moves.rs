//! Move list loader.
//!
//! Move lists are authored with action names. Loading interns every name into
//! an [`ActionSymbols`] table, resolves cancel routes and hidden-combo
//! sequences against it, and rejects anything the core would only tolerate.

use std::path::Path;

use combat_core::{
    ActionDefinition, ActionId, ActionPriority, ActionRegistry, ActionSymbols, CancelWindow,
    HiddenComboDefinition, InteractionFlags,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Move list structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveList {
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(default)]
    pub hidden_combos: Vec<HiddenComboSpec>,
}

/// One authored action. Frame counts are at the configured frame rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    #[serde(default = "default_startup")]
    pub startup: u32,
    #[serde(default = "default_active")]
    pub active: u32,
    #[serde(default = "default_recovery")]
    pub recovery: u32,
    /// Inclusive `(start, end)` frame range.
    #[serde(default = "default_cancel_window")]
    pub cancel_window: (u32, u32),
    #[serde(default)]
    pub cancel_into: Vec<String>,
    #[serde(default)]
    pub priority: ActionPriority,
    #[serde(default)]
    pub hyper_armor: bool,
    #[serde(default)]
    pub blocked_by: InteractionFlags,
    #[serde(default)]
    pub requires: InteractionFlags,
    #[serde(default)]
    pub ends_on_landing: bool,
}

/// One authored hidden combo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiddenComboSpec {
    pub name: String,
    pub sequence: Vec<String>,
    #[serde(default = "default_max_gap_ms")]
    pub max_gap_ms: u64,
    #[serde(default)]
    pub requires_perfect_timing: bool,
    #[serde(default = "default_bonus_damage")]
    pub bonus_damage_multiplier: f32,
    #[serde(default = "default_bonus_style")]
    pub bonus_style_points: f32,
    #[serde(default)]
    pub special_effect: Option<String>,
}

fn default_startup() -> u32 {
    12
}

fn default_active() -> u32 {
    6
}

fn default_recovery() -> u32 {
    18
}

fn default_cancel_window() -> (u32, u32) {
    let window = CancelWindow::default();
    (window.start, window.end)
}

fn default_max_gap_ms() -> u64 {
    1_000
}

fn default_bonus_damage() -> f32 {
    2.0
}

fn default_bonus_style() -> f32 {
    100.0
}

/// A resolved move list, ready to hand to state machines.
#[derive(Debug, Clone)]
pub struct LoadedMoves {
    pub symbols: ActionSymbols,
    pub registry: ActionRegistry,
}

/// Loader for move lists from RON files.
pub struct MoveListLoader;

impl MoveListLoader {
    pub fn load(path: &Path) -> LoadResult<LoadedMoves> {
        let content = read_file(path)?;
        Self::from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load move list {}: {}", path.display(), e))
    }

    pub fn from_ron(content: &str) -> LoadResult<LoadedMoves> {
        let list: MoveList = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse move list RON: {}", e))?;
        Self::build(list)
    }

    /// The move list shipped with this crate.
    pub fn embedded() -> LoadResult<LoadedMoves> {
        Self::from_ron(include_str!("../../data/moves.ron"))
    }

    /// Interns names, resolves references and validates every definition.
    pub fn build(list: MoveList) -> LoadResult<LoadedMoves> {
        let mut symbols = ActionSymbols::new();
        for spec in &list.actions {
            if symbols.get(&spec.name).is_some() {
                anyhow::bail!("Action '{}' is defined twice", spec.name);
            }
            symbols.intern(&spec.name);
        }

        let actions = list
            .actions
            .iter()
            .map(|spec| build_action(spec, &symbols))
            .collect::<LoadResult<Vec<_>>>()?;

        let hidden_combos = list
            .hidden_combos
            .iter()
            .map(|spec| build_hidden_combo(spec, &symbols))
            .collect::<LoadResult<Vec<_>>>()?;

        tracing::debug!(
            "Resolved move list: {} actions, {} hidden combos",
            actions.len(),
            hidden_combos.len()
        );

        Ok(LoadedMoves {
            registry: ActionRegistry::with_definitions(actions, hidden_combos),
            symbols,
        })
    }
}

fn resolve(symbols: &ActionSymbols, name: &str, referenced_by: &str) -> LoadResult<ActionId> {
    symbols.get(name).ok_or_else(|| {
        anyhow::anyhow!("'{}' references unknown action '{}'", referenced_by, name)
    })
}

fn build_action(spec: &ActionSpec, symbols: &ActionSymbols) -> LoadResult<ActionDefinition> {
    let id = resolve(symbols, &spec.name, &spec.name)?;
    let targets = spec
        .cancel_into
        .iter()
        .map(|target| resolve(symbols, target, &spec.name))
        .collect::<LoadResult<Vec<_>>>()?;

    let (window_start, window_end) = spec.cancel_window;
    let mut builder = ActionDefinition::builder(id, spec.name.clone())
        .frames(spec.startup, spec.active, spec.recovery)
        .cancel_window(window_start, window_end)
        .cancel_into(targets)
        .priority(spec.priority)
        .blocked_by(spec.blocked_by)
        .requires(spec.requires);
    if spec.hyper_armor {
        builder = builder.hyper_armor();
    }
    if spec.ends_on_landing {
        builder = builder.ends_on_landing();
    }

    let definition = builder.build();
    definition
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid action '{}': {}", spec.name, e))?;
    Ok(definition)
}

fn build_hidden_combo(
    spec: &HiddenComboSpec,
    symbols: &ActionSymbols,
) -> LoadResult<HiddenComboDefinition> {
    let sequence = spec
        .sequence
        .iter()
        .map(|name| resolve(symbols, name, &spec.name))
        .collect::<LoadResult<Vec<_>>>()?;

    let mut combo = HiddenComboDefinition::new(spec.name.clone(), sequence)
        .with_max_gap(std::time::Duration::from_millis(spec.max_gap_ms));
    if spec.requires_perfect_timing {
        combo = combo.with_perfect_timing();
    }
    if let Some(effect) = &spec.special_effect {
        combo = combo.with_special_effect(effect.clone());
    }
    combo.bonus_damage_multiplier = spec.bonus_damage_multiplier;
    combo.bonus_style_points = spec.bonus_style_points;

    combo
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid hidden combo '{}': {}", spec.name, e))?;
    Ok(combo)
}
