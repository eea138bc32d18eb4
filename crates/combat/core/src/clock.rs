//! Fixed-step frame clock.
//!
//! Converts variable host deltas into whole logical frames. Accumulation is done
//! in integer units of `nanoseconds * frame_rate`, so one frame is exactly
//! `1_000_000_000` units and no rounding error builds up between calls. For any
//! split of a total elapsed time `T`, the clock emits exactly
//! `floor(T / frame_duration)` frames.

use core::time::Duration;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Accumulator that turns wall-clock deltas into discrete frame steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameClock {
    frame_rate: u32,
    /// Leftover time in `nanos * frame_rate` units, always below one frame.
    accumulator: u128,
    elapsed: Duration,
    frames: u64,
}

impl FrameClock {
    /// Creates a clock running at `frame_rate` logical frames per second.
    ///
    /// A zero rate is treated as 1 fps.
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate: frame_rate.max(1),
            accumulator: 0,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    /// Feeds `delta` into the accumulator and returns how many whole frames are now due.
    ///
    /// A stalled caller receives every pending frame at once (catch-up, never skip).
    pub fn advance(&mut self, delta: Duration) -> u64 {
        self.elapsed += delta;
        self.accumulator += delta.as_nanos() * u128::from(self.frame_rate);

        let due = self.accumulator / NANOS_PER_SECOND;
        self.accumulator %= NANOS_PER_SECOND;

        let due = u64::try_from(due).unwrap_or(u64::MAX);
        self.frames = self.frames.saturating_add(due);
        due
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Nominal frame duration, truncated to whole nanoseconds.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos((NANOS_PER_SECOND / u128::from(self.frame_rate)) as u64)
    }

    /// Simulation time of logical frame `frame`, counted from creation.
    ///
    /// Depends only on the frame index, never on how host deltas were split.
    pub fn frame_time(&self, frame: u64) -> Duration {
        let nanos = u128::from(frame) * NANOS_PER_SECOND / u128::from(self.frame_rate);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Simulation time of the last emitted frame.
    pub fn now(&self) -> Duration {
        self.frame_time(self.frames)
    }

    /// Total host time fed into the clock, including the pending fraction.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total frames emitted since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Fraction of the next frame already accumulated, in `[0, 1)`.
    pub fn pending_fraction(&self) -> f32 {
        self.accumulator as f32 / NANOS_PER_SECOND as f32
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(crate::CombatConfig::DEFAULT_TARGET_FRAME_RATE)
    }
}
