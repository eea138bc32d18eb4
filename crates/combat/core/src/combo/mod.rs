//! Combo history and hidden-sequence detection.

mod hidden;
mod tracker;

pub use hidden::{HiddenComboMatcher, TimingPolicy};
pub use tracker::{ComboLink, ComboTracker};
