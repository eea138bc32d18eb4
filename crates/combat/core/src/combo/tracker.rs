use core::time::Duration;

use arrayvec::ArrayVec;

use crate::action::ActionId;
use crate::config::CombatConfig;

/// One executed action in the combo chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboLink {
    pub action: ActionId,
    /// Simulation time the action started.
    pub at: Duration,
    /// Entered through a perfect cancel.
    pub perfect: bool,
}

/// Bounded recent-action history plus the idle timer that expires it.
///
/// The idle timer counts time since the last recorded action. Extending the
/// timer subtracts from it (never below zero); whatever cannot be subtracted is
/// banked as credit and spent before the timer grows again, so an extension
/// granted right after an action starts is not lost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboTracker {
    chain: ArrayVec<ComboLink, { CombatConfig::MAX_COMBO_CHAIN }>,
    idle: Duration,
    credit: Duration,
    reset_after: Duration,
}

impl ComboTracker {
    pub fn new(reset_after: Duration) -> Self {
        Self {
            chain: ArrayVec::new(),
            idle: Duration::ZERO,
            credit: Duration::ZERO,
            reset_after,
        }
    }

    /// Appends an action and restarts the idle timer.
    pub fn record(&mut self, action: ActionId, now: Duration, perfect: bool) {
        self.idle = Duration::ZERO;
        if self.chain.is_full() {
            self.chain.remove(0);
        }
        self.chain.push(ComboLink {
            action,
            at: now,
            perfect,
        });
    }

    /// Advances the idle timer. Returns true if the chain was just cleared.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let spent = self.credit.min(delta);
        self.credit -= spent;
        self.idle += delta - spent;

        if self.idle > self.reset_after && !self.chain.is_empty() {
            self.reset();
            return true;
        }
        false
    }

    /// Pushes the reset deadline back by `amount`.
    pub fn extend_timer(&mut self, amount: Duration) {
        let taken = self.idle.min(amount);
        self.idle -= taken;
        self.credit += amount - taken;
    }

    /// Clears the chain and forces the timer to the reset threshold.
    pub fn reset(&mut self) {
        self.chain.clear();
        self.idle = self.reset_after;
        self.credit = Duration::ZERO;
    }

    pub fn chain(&self) -> &[ComboLink] {
        &self.chain
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.chain.iter().map(|link| link.action)
    }

    pub fn count(&self) -> usize {
        self.chain.len()
    }

    pub fn idle_time(&self) -> Duration {
        self.idle
    }

    /// Time left before the chain expires, including banked credit.
    pub fn time_remaining(&self) -> Duration {
        (self.reset_after + self.credit).saturating_sub(self.idle)
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(CombatConfig::default().combo_reset_time())
    }
}
