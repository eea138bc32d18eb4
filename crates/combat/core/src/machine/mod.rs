//! The per-entity action state machine.
//!
//! [`ActionStateMachine`] owns the live action, the input buffer and the combo
//! chain for one controlled entity. Every mutation goes through the request
//! methods here or through [`update`](ActionStateMachine::update), which turns
//! host time into fixed frame steps. Collaborators hear about changes through
//! [`ActionObserver`] callbacks, invoked synchronously in registration order.

mod frame;
mod queries;

pub use queries::StateSummary;

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use crate::action::{ActionId, ActionPhase, ActiveActionState};
use crate::buffer::InputBuffer;
use crate::cancel::{CancelArbiter, CancelGrade, CancelRejection, InteractionFlags};
use crate::clock::FrameClock;
use crate::combo::{ComboTracker, HiddenComboMatcher};
use crate::config::CombatConfig;
use crate::error::CombatError;
use crate::motion::{GroundContact, LandingLatch};
use crate::observer::ActionObserver;
use crate::registry::ActionRegistry;

/// Frame-driven action controller for a single entity.
pub struct ActionStateMachine {
    registry: Arc<ActionRegistry>,
    config: CombatConfig,
    clock: FrameClock,
    /// Frames this machine has stepped. Simulation time is derived from it.
    stepped: u64,
    state: ActiveActionState,
    buffer: InputBuffer,
    combo: ComboTracker,
    arbiter: CancelArbiter,
    matcher: HiddenComboMatcher,
    context: InteractionFlags,
    landing: LandingLatch,
    observers: Vec<Box<dyn ActionObserver>>,
}

impl ActionStateMachine {
    /// Creates an idle machine reading from `registry` with default tuning.
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self::with_config(registry, CombatConfig::default())
    }

    pub fn with_config(registry: Arc<ActionRegistry>, config: CombatConfig) -> Self {
        Self {
            registry,
            clock: FrameClock::new(config.target_frame_rate),
            stepped: 0,
            state: ActiveActionState::IDLE,
            buffer: InputBuffer::new(config.buffer_window()),
            combo: ComboTracker::new(config.combo_reset_time()),
            arbiter: CancelArbiter::new(config.perfect_cancel_frames),
            matcher: HiddenComboMatcher::new(config.hidden_combo_timing),
            context: InteractionFlags::empty(),
            landing: LandingLatch::new(),
            observers: Vec::new(),
            config,
        }
    }

    pub fn add_observer(&mut self, observer: impl ActionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Subscribes to the motion collaborator's ground-contact notifications.
    pub fn attach_motion(&mut self, motion: &mut dyn GroundContact) {
        motion.on_ground_contact(self.landing.listener());
    }

    /// Reports ground contact directly. Consumed on the next frame step.
    pub fn notify_ground_contact(&mut self) {
        self.landing.signal();
    }

    /// Replaces the interaction context consulted when actions start.
    pub fn set_interaction_context(&mut self, context: InteractionFlags) {
        self.context = context;
    }

    pub fn insert_interaction_flags(&mut self, flags: InteractionFlags) {
        self.context.insert(flags);
    }

    pub fn remove_interaction_flags(&mut self, flags: InteractionFlags) {
        self.context.remove(flags);
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Starts `action` if idle, or cancels into it if the current action allows.
    ///
    /// A refused request for a registered action is buffered and replayed on
    /// later frames while it stays inside the buffer window. Unknown actions are
    /// dropped.
    pub fn try_start_action(&mut self, action: ActionId) -> bool {
        if self.attempt_action(action) {
            return true;
        }

        if self.registry.has(action) {
            let now = self.now();
            self.buffer.push(action, now);
            tracing::trace!("Buffered {} ({} pending)", action, self.buffer.len());
        } else {
            tracing::trace!("Dropping request for unregistered {}", action);
        }
        false
    }

    /// Cancels the current action into `new`. Atomic: on refusal nothing changes.
    pub fn try_cancel(&mut self, new: ActionId) -> bool {
        match self.evaluate_cancel(new) {
            Ok(grade) => {
                self.apply_cancel(new, grade);
                true
            }
            Err(rejection) => {
                tracing::trace!(
                    code = rejection.error_code(),
                    "Cancel into {} refused: {}",
                    new,
                    rejection
                );
                false
            }
        }
    }

    /// Ends the current action immediately, bypassing all cancel rules.
    pub fn force_end_action(&mut self, was_canceled: bool) {
        if self.state.is_idle() {
            return;
        }
        self.end_current(was_canceled);
    }

    /// Puts the running action into `phase` without checking any rules.
    ///
    /// Forcing Idle ends the action. A forced Canceling phase resolves to Idle
    /// after the configured grace frames. Ignored while no action is running.
    pub fn force_phase(&mut self, phase: ActionPhase) {
        if phase.is_idle() {
            self.force_end_action(false);
            return;
        }
        if self.state.action.is_none() {
            tracing::trace!("Ignoring forced {} phase while idle", phase);
            return;
        }
        self.set_phase(phase);
    }

    /// Feeds `delta` of host time into the clock and steps every frame now due.
    ///
    /// A stalled host gets all pending frames in one call, each at its own
    /// simulation time, so the outcome does not depend on how time is split.
    pub fn update(&mut self, delta: Duration) {
        let frames = self.clock.advance(delta);
        for _ in 0..frames {
            self.step_frame();
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Simulation time of the frame being stepped, or of the last stepped
    /// frame between updates.
    fn now(&self) -> Duration {
        self.clock.frame_time(self.stepped)
    }

    /// Start-or-cancel without buffering on failure.
    fn attempt_action(&mut self, action: ActionId) -> bool {
        if !self.state.is_idle() {
            return self.try_cancel(action);
        }

        match self.check_start(action) {
            Ok(()) => self.begin_action(action, false),
            Err(rejection) => {
                tracing::trace!(
                    code = rejection.error_code(),
                    "Start of {} refused: {}",
                    action,
                    rejection
                );
                false
            }
        }
    }

    fn check_start(&self, action: ActionId) -> Result<(), CancelRejection> {
        let definition = self
            .registry
            .get(action)
            .ok_or(CancelRejection::UnknownAction(action))?;
        CancelArbiter::check_interaction(definition, self.context)
    }

    fn evaluate_cancel(&self, new: ActionId) -> Result<CancelGrade, CancelRejection> {
        let current = self.state.action.ok_or(CancelRejection::NothingToCancel)?;
        if !self.is_in_cancel_window() {
            return Err(CancelRejection::OutsideWindow {
                action: current,
                frame: self.state.frame,
            });
        }
        self.arbiter
            .evaluate(&self.registry, current, new, self.state.frame, self.context)
    }

    fn apply_cancel(&mut self, new: ActionId, grade: CancelGrade) {
        let Some(current) = self.state.action else {
            return;
        };

        tracing::debug!(
            "Canceling {} into {} at frame {} ({:?})",
            current,
            new,
            self.state.frame,
            grade
        );
        self.set_phase(ActionPhase::Canceling);
        self.notify(|observer| observer.on_action_ended(current, true));

        if grade.is_perfect() {
            self.combo.extend_timer(self.config.perfect_cancel_bonus());
            self.notify(|observer| observer.on_perfect_cancel(new));
        }

        self.begin_action(new, grade.is_perfect());
    }

    /// Enters Startup for `action`, records it in the combo chain and checks
    /// hidden combos. The caller has already approved the transition.
    fn begin_action(&mut self, action: ActionId, perfect: bool) -> bool {
        let registry = Arc::clone(&self.registry);
        let Some(definition) = registry.get(action) else {
            return false;
        };

        let previous = self.state.phase;
        self.state = ActiveActionState::starting(action);
        tracing::debug!("Started {} ('{}')", action, definition.name);
        self.notify(|observer| {
            observer.on_phase_changed(previous, ActionPhase::Startup, Some(action))
        });

        let now = self.now();
        self.combo.record(action, now, perfect);
        self.publish_combo();

        if let Some(combo) = self
            .matcher
            .check_match(registry.hidden_combos(), self.combo.chain())
        {
            tracing::debug!("Hidden combo '{}' executed", combo.name);
            self.notify(|observer| observer.on_hidden_combo_executed(combo));
        }

        self.notify(|observer| observer.on_action_started(action, definition));
        true
    }

    /// Returns to Idle and reports the end of the current action.
    fn end_current(&mut self, was_canceled: bool) {
        let Some(action) = self.state.action else {
            self.state = ActiveActionState::IDLE;
            return;
        };

        let previous = self.state.phase;
        self.state = ActiveActionState::IDLE;
        tracing::debug!("Ended {} (canceled: {})", action, was_canceled);

        self.notify(|observer| {
            observer.on_phase_changed(previous, ActionPhase::Idle, Some(action))
        });
        self.notify(|observer| observer.on_action_ended(action, was_canceled));
    }

    fn set_phase(&mut self, phase: ActionPhase) {
        let previous = self.state.phase;
        if previous == phase {
            return;
        }

        self.state.phase = phase;
        self.state.phase_frames = 0;
        let action = self.state.action;
        tracing::debug!(
            "Phase {} -> {} at frame {}",
            previous,
            phase,
            self.state.frame
        );
        self.notify(|observer| observer.on_phase_changed(previous, phase, action));
    }

    fn publish_combo(&mut self) {
        let chain = self.combo.chain();
        for observer in &mut self.observers {
            observer.on_combo_updated(chain.len(), chain);
        }
    }

    fn notify(&mut self, mut event: impl FnMut(&mut dyn ActionObserver)) {
        for observer in &mut self.observers {
            event(observer.as_mut());
        }
    }
}

impl fmt::Debug for ActionStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionStateMachine")
            .field("state", &self.state)
            .field("frames", &self.clock.frames())
            .field("buffer", &self.buffer.len())
            .field("combo", &self.combo.count())
            .field("context", &self.context)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
