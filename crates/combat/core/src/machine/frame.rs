//! Per-frame step and buffered-input replay.

use arrayvec::ArrayVec;

use super::ActionStateMachine;
use crate::action::{ActionId, ActionPhase};
use crate::config::CombatConfig;

impl ActionStateMachine {
    /// Runs one logical frame.
    ///
    /// Order: combo timer, counters, pending ground contact, phase boundaries,
    /// forced cancel grace, then buffer replay. Transitions always settle
    /// before the buffer is consulted.
    pub(super) fn step_frame(&mut self) {
        let previous = self.now();
        self.stepped = self.stepped.saturating_add(1);
        if self.combo.tick(self.now().saturating_sub(previous)) {
            tracing::debug!("Combo chain expired");
            self.publish_combo();
        }

        if !self.state.is_idle() {
            self.state.frame = self.state.frame.saturating_add(1);
            self.state.phase_frames = self.state.phase_frames.saturating_add(1);
        }

        if self.landing.take() {
            self.resolve_landing();
        }

        self.advance_phase();

        if self.state.phase == ActionPhase::Canceling
            && self.state.phase_frames >= self.config.cancel_grace_frames
        {
            self.end_current(true);
        }

        if self.state.is_idle() || self.is_in_cancel_window() {
            self.drain_input_buffer();
        }
    }

    /// Replays buffered requests newest-first. The first one that executes
    /// clears the buffer. Stale entries are purged on every pass.
    ///
    /// Returns the action that executed, if any.
    pub fn drain_input_buffer(&mut self) -> Option<ActionId> {
        let now = self.now();
        let expired = self.buffer.purge(now);
        if expired > 0 {
            tracing::trace!("Expired {} buffered inputs", expired);
        }

        let pending: ArrayVec<ActionId, { CombatConfig::MAX_BUFFERED_INPUTS }> =
            self.buffer.newest_first().collect();

        for action in pending {
            if self.attempt_action(action) {
                tracing::trace!("Replayed buffered {}", action);
                self.buffer.clear();
                return Some(action);
            }
        }
        None
    }

    fn resolve_landing(&mut self) {
        let Some(action) = self.state.action else {
            return;
        };
        let ends_on_landing = self
            .registry
            .get(action)
            .is_some_and(|definition| definition.ends_on_landing);

        if ends_on_landing {
            tracing::debug!("Ground contact ended {}", action);
            self.end_current(false);
        }
    }

    /// Moves through every phase boundary the current frame has reached.
    fn advance_phase(&mut self) {
        let Some(action) = self.state.action else {
            return;
        };
        let Some(definition) = self.registry.get(action) else {
            return;
        };
        let startup = definition.startup_frames;
        let recovery_start = definition.recovery_start();
        let total = definition.total_frames();

        loop {
            let frame = self.state.frame;
            match self.state.phase {
                ActionPhase::Startup if frame >= startup => self.set_phase(ActionPhase::Active),
                ActionPhase::Active if frame >= recovery_start => {
                    self.set_phase(ActionPhase::Recovery)
                }
                ActionPhase::Recovery if frame >= total => {
                    self.end_current(false);
                    break;
                }
                _ => break,
            }
        }
    }
}
