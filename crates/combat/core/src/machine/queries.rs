//! Read-only views and small conveniences over the machine's state.

use core::fmt;
use core::time::Duration;

use super::ActionStateMachine;
use crate::action::{ActionDefinition, ActionId, ActionPhase, ActiveActionState};
use crate::buffer::InputBufferEntry;
use crate::cancel::InteractionFlags;
use crate::clock::FrameClock;
use crate::combo::ComboLink;
use crate::config::CombatConfig;
use crate::registry::ActionRegistry;

impl ActionStateMachine {
    // ===== live action =====

    pub fn state(&self) -> ActiveActionState {
        self.state
    }

    pub fn current_action(&self) -> Option<ActionId> {
        self.state.action
    }

    pub fn current_phase(&self) -> ActionPhase {
        self.state.phase
    }

    pub fn current_frame(&self) -> u32 {
        self.state.frame
    }

    pub fn current_definition(&self) -> Option<&ActionDefinition> {
        self.state.action.and_then(|action| self.registry.get(action))
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Progress through the current phase in `[0, 1]`.
    ///
    /// Idle and Canceling report 0. A zero-length phase reports 1.
    pub fn phase_progress(&self) -> f32 {
        let Some(definition) = self.current_definition() else {
            return 0.0;
        };
        let length = match self.state.phase {
            ActionPhase::Startup => definition.startup_frames,
            ActionPhase::Active => definition.active_frames,
            ActionPhase::Recovery => definition.recovery_frames,
            ActionPhase::Idle | ActionPhase::Canceling => return 0.0,
        };
        ratio(self.state.phase_frames, length)
    }

    /// Progress through the whole action in `[0, 1]`.
    pub fn frame_progress(&self) -> f32 {
        match self.current_definition() {
            Some(definition) => ratio(self.state.frame, definition.total_frames()),
            None => 0.0,
        }
    }

    /// True in Active or Recovery while the frame lies inside the cancel window.
    pub fn is_in_cancel_window(&self) -> bool {
        self.state.phase.is_cancelable()
            && self
                .current_definition()
                .is_some_and(|definition| definition.cancel_window.contains(self.state.frame))
    }

    /// Whether [`try_start_action`](Self::try_start_action) would execute
    /// `action` right now rather than buffer it.
    pub fn can_start_action(&self, action: ActionId) -> bool {
        if self.state.is_idle() {
            self.check_start(action).is_ok()
        } else {
            self.evaluate_cancel(action).is_ok()
        }
    }

    /// Actions the current one could be canceled into at this frame, in
    /// authoring order.
    pub fn cancel_options(&self) -> Vec<ActionId> {
        let Some(definition) = self.current_definition() else {
            return Vec::new();
        };
        definition
            .cancel_into
            .iter()
            .copied()
            .filter(|&target| self.evaluate_cancel(target).is_ok())
            .collect()
    }

    // ===== input buffer =====

    pub fn buffered_inputs(&self) -> &[InputBufferEntry] {
        self.buffer.entries()
    }

    pub fn has_buffered_input(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn clear_input_buffer(&mut self) {
        self.buffer.clear();
    }

    // ===== combo =====

    pub fn combo_chain(&self) -> &[ComboLink] {
        self.combo.chain()
    }

    pub fn combo_count(&self) -> usize {
        self.combo.count()
    }

    pub fn combo_time_remaining(&self) -> Duration {
        self.combo.time_remaining()
    }

    pub fn extend_combo_time(&mut self, amount: Duration) {
        self.combo.extend_timer(amount);
    }

    /// Drops the chain and announces an empty combo.
    pub fn reset_combo(&mut self) {
        self.combo.reset();
        self.publish_combo();
    }

    /// Names of every registered hidden combo, in match order.
    pub fn available_hidden_combos(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry
            .hidden_combos()
            .iter()
            .map(|combo| combo.name.as_str())
    }

    // ===== environment =====

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn interaction_context(&self) -> InteractionFlags {
        self.context
    }

    /// One-line debug view of the machine.
    pub fn summary(&self) -> StateSummary<'_> {
        StateSummary {
            phase: self.state.phase,
            frame: self.state.frame,
            action: self.current_definition().map(|definition| definition.name.as_str()),
            combo_count: self.combo.count(),
        }
    }
}

fn ratio(value: u32, length: u32) -> f32 {
    if length == 0 {
        return 1.0;
    }
    (value as f32 / length as f32).clamp(0.0, 1.0)
}

/// Snapshot returned by [`ActionStateMachine::summary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateSummary<'a> {
    pub phase: ActionPhase,
    pub frame: u32,
    pub action: Option<&'a str>,
    pub combo_count: usize,
}

impl fmt::Display for StateSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "phase: {}, frame: {}, action: {}, combo: {}",
            self.phase,
            self.frame,
            self.action.unwrap_or("none"),
            self.combo_count
        )
    }
}
