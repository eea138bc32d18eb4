//! Action lifecycle phases.

use crate::action::ActionId;

/// Where the controlled entity is within its current action.
///
/// ```text
/// Idle -> Startup -> Active -> Recovery -> Idle
///           ^          |          |
///           +-- Canceling <-------+
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionPhase {
    #[default]
    Idle,
    Startup,
    Active,
    Recovery,
    Canceling,
}

impl ActionPhase {
    /// Phases in which a cancel window can be open.
    #[inline]
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::Active | Self::Recovery)
    }

    #[inline]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// The one mutable action instance owned by the state machine.
///
/// Replaced wholesale when an action starts or a cancel is processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveActionState {
    /// `None` while idle.
    pub action: Option<ActionId>,
    pub phase: ActionPhase,
    /// Frames since the action entered Startup.
    pub frame: u32,
    /// Frames since the current phase was entered.
    pub phase_frames: u32,
}

impl ActiveActionState {
    pub const IDLE: Self = Self {
        action: None,
        phase: ActionPhase::Idle,
        frame: 0,
        phase_frames: 0,
    };

    /// Fresh state for an action entering Startup.
    pub const fn starting(action: ActionId) -> Self {
        Self {
            action: Some(action),
            phase: ActionPhase::Startup,
            frame: 0,
            phase_frames: 0,
        }
    }

    pub const fn is_idle(&self) -> bool {
        self.action.is_none() && self.phase.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelable_phases() {
        assert!(ActionPhase::Active.is_cancelable());
        assert!(ActionPhase::Recovery.is_cancelable());
        assert!(!ActionPhase::Startup.is_cancelable());
        assert!(!ActionPhase::Canceling.is_cancelable());
        assert!(!ActionPhase::Idle.is_cancelable());
    }

    #[test]
    fn starting_state_resets_counters() {
        let state = ActiveActionState::starting(ActionId(7));
        assert_eq!(state.phase, ActionPhase::Startup);
        assert_eq!(state.frame, 0);
        assert!(!state.is_idle());
        assert!(ActiveActionState::IDLE.is_idle());
        assert_eq!(ActiveActionState::default(), ActiveActionState::IDLE);
    }
}
