use core::time::Duration;

use crate::combo::TimingPolicy;

/// Combat tuning constants and runtime-tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Logical frames per second. Frame data in definitions is authored against this rate.
    pub target_frame_rate: u32,
    /// How long a rejected request stays eligible for replay.
    ///
    /// At most [`MAX_BUFFERED_INPUTS`](Self::MAX_BUFFERED_INPUTS) requests are
    /// held, so windows longer than that many frames evict the oldest ones
    /// early. Content loaders reject such configs.
    pub buffer_window_ms: u64,
    /// Idle time after which the combo chain is discarded.
    pub combo_reset_ms: u64,
    /// Number of frames at the start of a cancel window that count as a perfect cancel.
    pub perfect_cancel_frames: u32,
    /// Combo timer extension granted by a perfect cancel.
    pub perfect_cancel_bonus_ms: u64,
    /// Frames a forced Canceling phase lingers before resolving to Idle.
    pub cancel_grace_frames: u32,
    /// Whether hidden combos check input timing or only input order.
    pub hidden_combo_timing: TimingPolicy,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_COMBO_CHAIN: usize = 20;
    /// One slot per frame of the default buffer window at 60 fps.
    pub const MAX_BUFFERED_INPUTS: usize = 12;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TARGET_FRAME_RATE: u32 = 60;
    pub const DEFAULT_BUFFER_WINDOW_MS: u64 = 200;
    pub const DEFAULT_COMBO_RESET_MS: u64 = 2_000;
    pub const DEFAULT_PERFECT_CANCEL_FRAMES: u32 = 3;
    pub const DEFAULT_PERFECT_CANCEL_BONUS_MS: u64 = 1_000;
    pub const DEFAULT_CANCEL_GRACE_FRAMES: u32 = 3;

    pub fn new() -> Self {
        Self {
            target_frame_rate: Self::DEFAULT_TARGET_FRAME_RATE,
            buffer_window_ms: Self::DEFAULT_BUFFER_WINDOW_MS,
            combo_reset_ms: Self::DEFAULT_COMBO_RESET_MS,
            perfect_cancel_frames: Self::DEFAULT_PERFECT_CANCEL_FRAMES,
            perfect_cancel_bonus_ms: Self::DEFAULT_PERFECT_CANCEL_BONUS_MS,
            cancel_grace_frames: Self::DEFAULT_CANCEL_GRACE_FRAMES,
            hidden_combo_timing: TimingPolicy::Enforced,
        }
    }

    pub fn with_frame_rate(mut self, target_frame_rate: u32) -> Self {
        self.target_frame_rate = target_frame_rate;
        self
    }

    pub fn with_hidden_combo_timing(mut self, policy: TimingPolicy) -> Self {
        self.hidden_combo_timing = policy;
        self
    }

    pub fn buffer_window(&self) -> Duration {
        Duration::from_millis(self.buffer_window_ms)
    }

    /// Whole frames covered by the buffer window at the target frame rate.
    pub fn buffer_window_frames(&self) -> u64 {
        self.buffer_window_ms
            .saturating_mul(u64::from(self.target_frame_rate))
            / 1_000
    }

    pub fn combo_reset_time(&self) -> Duration {
        Duration::from_millis(self.combo_reset_ms)
    }

    pub fn perfect_cancel_bonus(&self) -> Duration {
        Duration::from_millis(self.perfect_cancel_bonus_ms)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
