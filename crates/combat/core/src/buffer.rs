//! Time-windowed input buffer.
//!
//! Holds requests that could not execute when they were made. The state
//! machine replays them newest-first whenever it is idle or inside a cancel
//! window; the first one that executes clears the whole buffer.

use core::time::Duration;

use arrayvec::ArrayVec;

use crate::action::ActionId;
use crate::config::CombatConfig;

/// A buffered request and the simulation time it was made at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputBufferEntry {
    pub action: ActionId,
    pub at: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputBuffer {
    entries: ArrayVec<InputBufferEntry, { CombatConfig::MAX_BUFFERED_INPUTS }>,
    window: Duration,
}

impl InputBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: ArrayVec::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Appends a request, dropping stale entries first and the oldest entry if full.
    pub fn push(&mut self, action: ActionId, now: Duration) {
        self.purge(now);
        if self.entries.is_full() {
            self.entries.remove(0);
        }
        self.entries.push(InputBufferEntry { action, at: now });
    }

    /// Removes entries older than the buffer window. Returns how many were dropped.
    pub fn purge(&mut self, now: Duration) -> usize {
        let before = self.entries.len();
        let window = self.window;
        self.entries
            .retain(|entry| now.saturating_sub(entry.at) <= window);
        before - self.entries.len()
    }

    /// Buffered actions, most recent first.
    pub fn newest_first(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.entries.iter().rev().map(|entry| entry.action)
    }

    pub fn entries(&self) -> &[InputBufferEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(CombatConfig::default().buffer_window())
    }
}
