//! Action identifiers, definitions, and lifecycle phases.
//!
//! Definitions are immutable frame-data records; [`ActiveActionState`] is the
//! single mutable instance the state machine replaces as actions start and end.

mod definition;
mod id;
mod phase;

pub use definition::{
    ActionDefinition, ActionDefinitionBuilder, ActionPriority, CancelWindow, DefinitionError,
    HiddenComboDefinition,
};
pub use id::{ActionId, ActionSymbols};
pub use phase::{ActionPhase, ActiveActionState};
