//! Deterministic action-resolution core for real-time action combat.
//!
//! `combat-core` decides, frame by frame, which action a controlled entity is
//! performing, when that action may be canceled into another, how chained
//! actions accumulate into combos, and when a registered hidden sequence fires.
//! All state mutation flows through [`machine::ActionStateMachine`]; the
//! [`registry::ActionRegistry`] it reads from is shared and never mutated while
//! the simulation runs.
pub mod action;
pub mod buffer;
pub mod cancel;
pub mod clock;
pub mod combo;
pub mod config;
pub mod error;
pub mod machine;
pub mod motion;
pub mod observer;
pub mod registry;

pub use action::{
    ActionDefinition, ActionDefinitionBuilder, ActionId, ActionPhase, ActionPriority,
    ActionSymbols, ActiveActionState, CancelWindow, DefinitionError, HiddenComboDefinition,
};
pub use buffer::{InputBuffer, InputBufferEntry};
pub use cancel::{CancelArbiter, CancelGrade, CancelRejection, InteractionFlags};
pub use clock::FrameClock;
pub use combo::{ComboLink, ComboTracker, HiddenComboMatcher, TimingPolicy};
pub use config::CombatConfig;
pub use error::{CombatError, ErrorSeverity};
pub use machine::{ActionStateMachine, StateSummary};
pub use motion::{GroundContact, GroundContactListener, LandingLatch};
pub use observer::{ActionObserver, CombatEvent, EventLog};
pub use registry::ActionRegistry;
