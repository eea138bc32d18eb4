//! Immutable action and hidden-combo definitions.

use core::time::Duration;

use crate::action::ActionId;
use crate::cancel::InteractionFlags;
use crate::error::{CombatError, ErrorSeverity};

// ============================================================================
// Priority
// ============================================================================

/// Interrupt rank. Only a strictly higher rank may cancel into a lower one.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionPriority {
    #[default]
    Light = 0,
    Heavy = 1,
    Dash = 2,
    Special = 3,
    Ultimate = 4,
}

impl ActionPriority {
    pub const fn value(self) -> i32 {
        self as i32
    }
}

// ============================================================================
// Cancel Window
// ============================================================================

/// Inclusive frame range, counted from the first Startup frame, during which
/// the action may be canceled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CancelWindow {
    pub start: u32,
    pub end: u32,
}

impl CancelWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn contains(&self, frame: u32) -> bool {
        frame >= self.start && frame <= self.end
    }

    /// Frames elapsed since the window opened, or `None` before it opens.
    #[inline]
    pub const fn offset(&self, frame: u32) -> Option<u32> {
        if frame >= self.start {
            Some(frame - self.start)
        } else {
            None
        }
    }
}

impl Default for CancelWindow {
    fn default() -> Self {
        Self::new(8, 14)
    }
}

// ============================================================================
// Action Definition
// ============================================================================

/// Frame data and interruption rules for a single action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDefinition {
    pub id: ActionId,
    pub name: String,

    /// Wind-up frames before the action becomes active.
    pub startup_frames: u32,
    /// Frames during which the action can hit.
    pub active_frames: u32,
    pub recovery_frames: u32,

    pub cancel_window: CancelWindow,
    /// Actions this one may be canceled into, in authoring order.
    pub cancel_into: Vec<ActionId>,
    pub priority: ActionPriority,
    /// Cannot be interrupted during active frames.
    pub hyper_armor: bool,

    /// Interaction states that prevent this action from starting.
    pub blocked_by: InteractionFlags,
    /// Interaction states that must all be present for this action to start.
    pub requires: InteractionFlags,
    /// End the action as soon as the motion collaborator reports ground contact.
    pub ends_on_landing: bool,
}

impl ActionDefinition {
    pub fn builder(id: ActionId, name: impl Into<String>) -> ActionDefinitionBuilder {
        ActionDefinitionBuilder::new(id, name)
    }

    /// Startup + active + recovery, saturating at `u32::MAX`.
    pub const fn total_frames(&self) -> u32 {
        self.recovery_start().saturating_add(self.recovery_frames)
    }

    /// First frame of the Recovery phase.
    pub const fn recovery_start(&self) -> u32 {
        self.startup_frames.saturating_add(self.active_frames)
    }

    pub const fn is_active_frame(&self, frame: u32) -> bool {
        frame >= self.startup_frames && frame < self.recovery_start()
    }

    pub fn can_cancel_into(&self, other: ActionId) -> bool {
        self.cancel_into.contains(&other)
    }

    /// Checks the frame-data invariants.
    ///
    /// The registry tolerates definitions that fail this check; content loaders
    /// reject them.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyName { action: self.id });
        }
        if self.startup_frames == 0 || self.active_frames == 0 || self.recovery_frames == 0 {
            return Err(DefinitionError::ZeroLengthPhase { action: self.id });
        }
        if self
            .startup_frames
            .checked_add(self.active_frames)
            .and_then(|frames| frames.checked_add(self.recovery_frames))
            .is_none()
        {
            return Err(DefinitionError::FrameCountOverflow { action: self.id });
        }
        let window = self.cancel_window;
        if window.start > window.end {
            return Err(DefinitionError::InvertedCancelWindow {
                action: self.id,
                start: window.start,
                end: window.end,
            });
        }
        if window.end > self.total_frames() {
            return Err(DefinitionError::CancelWindowOutOfRange {
                action: self.id,
                end: window.end,
                total: self.total_frames(),
            });
        }
        Ok(())
    }
}

/// Builder for [`ActionDefinition`], seeded with the stock light-attack frame data
/// (12/6/18 at 60 fps, cancel window 8..=14).
#[derive(Clone, Debug)]
pub struct ActionDefinitionBuilder {
    definition: ActionDefinition,
}

impl ActionDefinitionBuilder {
    pub fn new(id: ActionId, name: impl Into<String>) -> Self {
        Self {
            definition: ActionDefinition {
                id,
                name: name.into(),
                startup_frames: 12,
                active_frames: 6,
                recovery_frames: 18,
                cancel_window: CancelWindow::default(),
                cancel_into: Vec::new(),
                priority: ActionPriority::Light,
                hyper_armor: false,
                blocked_by: InteractionFlags::empty(),
                requires: InteractionFlags::empty(),
                ends_on_landing: false,
            },
        }
    }

    pub fn frames(mut self, startup: u32, active: u32, recovery: u32) -> Self {
        self.definition.startup_frames = startup;
        self.definition.active_frames = active;
        self.definition.recovery_frames = recovery;
        self
    }

    pub fn cancel_window(mut self, start: u32, end: u32) -> Self {
        self.definition.cancel_window = CancelWindow::new(start, end);
        self
    }

    pub fn cancel_into(mut self, targets: impl IntoIterator<Item = ActionId>) -> Self {
        for target in targets {
            if !self.definition.cancel_into.contains(&target) {
                self.definition.cancel_into.push(target);
            }
        }
        self
    }

    pub fn priority(mut self, priority: ActionPriority) -> Self {
        self.definition.priority = priority;
        self
    }

    pub fn hyper_armor(mut self) -> Self {
        self.definition.hyper_armor = true;
        self
    }

    pub fn blocked_by(mut self, flags: InteractionFlags) -> Self {
        self.definition.blocked_by = flags;
        self
    }

    pub fn requires(mut self, flags: InteractionFlags) -> Self {
        self.definition.requires = flags;
        self
    }

    pub fn ends_on_landing(mut self) -> Self {
        self.definition.ends_on_landing = true;
        self
    }

    pub fn build(self) -> ActionDefinition {
        self.definition
    }
}

// ============================================================================
// Hidden Combo Definition
// ============================================================================

/// A secret input sequence that grants a bonus when it appears as the tail of
/// the combo chain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiddenComboDefinition {
    pub name: String,
    pub sequence: Vec<ActionId>,
    /// Longest allowed gap between two consecutive inputs of the sequence.
    pub max_time_between_inputs: Duration,
    /// Every link after the first must have been entered through a perfect cancel.
    pub requires_perfect_timing: bool,
    pub bonus_damage_multiplier: f32,
    pub bonus_style_points: f32,
    pub special_effect: Option<String>,
}

impl HiddenComboDefinition {
    pub fn new(name: impl Into<String>, sequence: impl IntoIterator<Item = ActionId>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into_iter().collect(),
            max_time_between_inputs: Duration::from_secs(1),
            requires_perfect_timing: false,
            bonus_damage_multiplier: 2.0,
            bonus_style_points: 100.0,
            special_effect: None,
        }
    }

    pub fn with_max_gap(mut self, gap: Duration) -> Self {
        self.max_time_between_inputs = gap;
        self
    }

    pub fn with_perfect_timing(mut self) -> Self {
        self.requires_perfect_timing = true;
        self
    }

    pub fn with_special_effect(mut self, tag: impl Into<String>) -> Self {
        self.special_effect = Some(tag.into());
        self
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.sequence.is_empty() {
            return Err(DefinitionError::EmptySequence {
                combo: self.name.clone(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Frame-data invariant violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("{action} has an empty name")]
    EmptyName { action: ActionId },

    #[error("{action} has a zero-length phase")]
    ZeroLengthPhase { action: ActionId },

    #[error("{action} frame counts overflow a u32 total")]
    FrameCountOverflow { action: ActionId },

    #[error("{action} cancel window is inverted ({start} > {end})")]
    InvertedCancelWindow { action: ActionId, start: u32, end: u32 },

    #[error("{action} cancel window ends at frame {end}, past the last frame {total}")]
    CancelWindowOutOfRange { action: ActionId, end: u32, total: u32 },

    #[error("hidden combo '{combo}' has an empty sequence")]
    EmptySequence { combo: String },
}

impl CombatError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use DefinitionError::*;
        match self {
            EmptyName { .. } => "DEFINITION_EMPTY_NAME",
            ZeroLengthPhase { .. } => "DEFINITION_ZERO_LENGTH_PHASE",
            FrameCountOverflow { .. } => "DEFINITION_FRAME_COUNT_OVERFLOW",
            InvertedCancelWindow { .. } => "DEFINITION_INVERTED_CANCEL_WINDOW",
            CancelWindowOutOfRange { .. } => "DEFINITION_CANCEL_WINDOW_OUT_OF_RANGE",
            EmptySequence { .. } => "DEFINITION_EMPTY_SEQUENCE",
        }
    }
}
