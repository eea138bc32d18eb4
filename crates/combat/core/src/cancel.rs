//! Cancel arbitration.
//!
//! The arbiter answers one question: may the current action be interrupted by
//! a new one at this frame? It never mutates anything. The state machine checks
//! the cancel window first and then asks the arbiter about the route itself.

use bitflags::bitflags;

use crate::action::{ActionDefinition, ActionId};
use crate::error::{CombatError, ErrorSeverity};
use crate::registry::ActionRegistry;

bitflags! {
    /// Cross-action interaction state shared with the arbiter.
    ///
    /// Set by the owner of the state machine (movement, status systems) and
    /// passed in explicitly rather than queried from external tags per tick.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct InteractionFlags: u8 {
        const DASHING       = 1 << 0;
        const AIRBORNE      = 1 << 1;
        const BOUNCING      = 1 << 2;
        const STUNNED       = 1 << 3;
        const INPUT_BLOCKED = 1 << 4;
    }
}

/// Quality of an approved cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CancelGrade {
    Normal,
    /// Executed within the first frames of the cancel window.
    Perfect,
}

impl CancelGrade {
    pub const fn is_perfect(self) -> bool {
        matches!(self, Self::Perfect)
    }
}

/// Why a cancel or start request was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CancelRejection {
    #[error("no action is running")]
    NothingToCancel,

    #[error("frame {frame} is outside the cancel window of {action}")]
    OutsideWindow { action: ActionId, frame: u32 },

    #[error("{0} is not registered")]
    UnknownAction(ActionId),

    #[error("{action} has hyper armor during its active frames")]
    HyperArmor { action: ActionId },

    #[error("{from} cannot cancel into {to}")]
    RouteNotAllowed { from: ActionId, to: ActionId },

    #[error("{to} (priority {to_priority}) does not outrank {from} (priority {from_priority})")]
    InsufficientPriority {
        from: ActionId,
        to: ActionId,
        from_priority: i32,
        to_priority: i32,
    },

    #[error("{action} is blocked by interaction state {flags:?}")]
    Blocked {
        action: ActionId,
        flags: InteractionFlags,
    },

    #[error("{action} requires interaction state {missing:?}")]
    MissingRequirement {
        action: ActionId,
        missing: InteractionFlags,
    },
}

impl CombatError for CancelRejection {
    fn severity(&self) -> ErrorSeverity {
        use CancelRejection::*;
        match self {
            NothingToCancel | OutsideWindow { .. } | HyperArmor { .. } | Blocked { .. }
            | MissingRequirement { .. } => ErrorSeverity::Recoverable,
            UnknownAction(_) | RouteNotAllowed { .. } | InsufficientPriority { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use CancelRejection::*;
        match self {
            NothingToCancel => "CANCEL_NOTHING_TO_CANCEL",
            OutsideWindow { .. } => "CANCEL_OUTSIDE_WINDOW",
            UnknownAction(_) => "CANCEL_UNKNOWN_ACTION",
            HyperArmor { .. } => "CANCEL_HYPER_ARMOR",
            RouteNotAllowed { .. } => "CANCEL_ROUTE_NOT_ALLOWED",
            InsufficientPriority { .. } => "CANCEL_INSUFFICIENT_PRIORITY",
            Blocked { .. } => "CANCEL_BLOCKED",
            MissingRequirement { .. } => "CANCEL_MISSING_REQUIREMENT",
        }
    }
}

/// Decides whether a transition into a new action is legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancelArbiter {
    perfect_cancel_frames: u32,
}

impl CancelArbiter {
    pub const fn new(perfect_cancel_frames: u32) -> Self {
        Self {
            perfect_cancel_frames,
        }
    }

    /// Checks that `definition` may start under `context`.
    pub fn check_interaction(
        definition: &ActionDefinition,
        context: InteractionFlags,
    ) -> Result<(), CancelRejection> {
        let blocking = context & definition.blocked_by;
        if !blocking.is_empty() {
            return Err(CancelRejection::Blocked {
                action: definition.id,
                flags: blocking,
            });
        }
        let missing = definition.requires - context;
        if !missing.is_empty() {
            return Err(CancelRejection::MissingRequirement {
                action: definition.id,
                missing,
            });
        }
        Ok(())
    }

    /// Evaluates a cancel from `current` into `new` at `frame`.
    ///
    /// Does not check the cancel window; the caller does that against the live
    /// phase. Equal priority never cancels.
    pub fn evaluate(
        &self,
        registry: &ActionRegistry,
        current: ActionId,
        new: ActionId,
        frame: u32,
        context: InteractionFlags,
    ) -> Result<CancelGrade, CancelRejection> {
        let from = registry
            .get(current)
            .ok_or(CancelRejection::UnknownAction(current))?;

        if from.hyper_armor && from.is_active_frame(frame) {
            return Err(CancelRejection::HyperArmor { action: current });
        }

        let to = registry
            .get(new)
            .ok_or(CancelRejection::UnknownAction(new))?;

        if !from.can_cancel_into(new) {
            return Err(CancelRejection::RouteNotAllowed {
                from: current,
                to: new,
            });
        }

        if to.priority.value() <= from.priority.value() {
            return Err(CancelRejection::InsufficientPriority {
                from: current,
                to: new,
                from_priority: from.priority.value(),
                to_priority: to.priority.value(),
            });
        }

        Self::check_interaction(to, context)?;

        Ok(self.grade(from, frame))
    }

    /// Boolean form of [`evaluate`](Self::evaluate).
    pub fn can_cancel(
        &self,
        registry: &ActionRegistry,
        current: ActionId,
        new: ActionId,
        frame: u32,
        context: InteractionFlags,
    ) -> bool {
        self.evaluate(registry, current, new, frame, context).is_ok()
    }

    /// Perfect-cancel classification. Does not affect legality.
    pub fn grade(&self, from: &ActionDefinition, frame: u32) -> CancelGrade {
        match from.cancel_window.offset(frame) {
            Some(offset) if offset < self.perfect_cancel_frames => CancelGrade::Perfect,
            _ => CancelGrade::Normal,
        }
    }
}

impl Default for CancelArbiter {
    fn default() -> Self {
        Self::new(crate::CombatConfig::DEFAULT_PERFECT_CANCEL_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionPriority;

    const A: ActionId = ActionId(0);
    const B: ActionId = ActionId(1);
    const C: ActionId = ActionId(2);

    fn registry(b_priority: ActionPriority, hyper_armor: bool) -> ActionRegistry {
        let mut a = ActionDefinition::builder(A, "A")
            .frames(6, 6, 12)
            .cancel_window(8, 14)
            .cancel_into([B])
            .priority(ActionPriority::Light);
        if hyper_armor {
            a = a.hyper_armor();
        }
        let b = ActionDefinition::builder(B, "B")
            .priority(b_priority)
            .blocked_by(InteractionFlags::STUNNED)
            .build();
        let c = ActionDefinition::builder(C, "C")
            .priority(ActionPriority::Ultimate)
            .build();
        ActionRegistry::with_definitions([a.build(), b, c], [])
    }

    #[test]
    fn higher_priority_whitelisted_cancel_is_allowed() {
        let registry = registry(ActionPriority::Heavy, false);
        let arbiter = CancelArbiter::default();
        assert!(arbiter.can_cancel(&registry, A, B, 10, InteractionFlags::empty()));
    }

    #[test]
    fn equal_priority_never_cancels() {
        let registry = registry(ActionPriority::Light, false);
        let arbiter = CancelArbiter::default();
        let err = arbiter
            .evaluate(&registry, A, B, 10, InteractionFlags::empty())
            .unwrap_err();
        assert!(matches!(err, CancelRejection::InsufficientPriority { .. }));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn route_must_be_whitelisted() {
        let registry = registry(ActionPriority::Heavy, false);
        let arbiter = CancelArbiter::default();
        assert_eq!(
            arbiter.evaluate(&registry, A, C, 10, InteractionFlags::empty()),
            Err(CancelRejection::RouteNotAllowed { from: A, to: C })
        );
    }

    #[test]
    fn unknown_target_is_rejected() {
        let registry = registry(ActionPriority::Heavy, false);
        let arbiter = CancelArbiter::default();
        assert_eq!(
            arbiter.evaluate(&registry, A, ActionId(42), 10, InteractionFlags::empty()),
            Err(CancelRejection::UnknownAction(ActionId(42)))
        );
    }

    #[test]
    fn hyper_armor_only_covers_active_frames() {
        let registry = registry(ActionPriority::Heavy, true);
        let arbiter = CancelArbiter::default();
        // Active span is frames 6..12.
        assert_eq!(
            arbiter.evaluate(&registry, A, B, 10, InteractionFlags::empty()),
            Err(CancelRejection::HyperArmor { action: A })
        );
        assert!(arbiter.can_cancel(&registry, A, B, 12, InteractionFlags::empty()));
    }

    #[test]
    fn interaction_context_blocks_target() {
        let registry = registry(ActionPriority::Heavy, false);
        let arbiter = CancelArbiter::default();
        let err = arbiter
            .evaluate(&registry, A, B, 10, InteractionFlags::STUNNED | InteractionFlags::AIRBORNE)
            .unwrap_err();
        assert_eq!(
            err,
            CancelRejection::Blocked {
                action: B,
                flags: InteractionFlags::STUNNED
            }
        );
        assert!(err.severity().is_recoverable());
    }

    #[test]
    fn missing_requirement_is_reported() {
        let def = ActionDefinition::builder(C, "Air")
            .requires(InteractionFlags::AIRBORNE)
            .build();
        assert!(CancelArbiter::check_interaction(&def, InteractionFlags::AIRBORNE).is_ok());
        assert_eq!(
            CancelArbiter::check_interaction(&def, InteractionFlags::DASHING),
            Err(CancelRejection::MissingRequirement {
                action: C,
                missing: InteractionFlags::AIRBORNE
            })
        );
    }

    #[test]
    fn perfect_cancel_covers_first_three_window_frames() {
        let registry = registry(ActionPriority::Heavy, false);
        let arbiter = CancelArbiter::default();
        let grade = |frame| {
            arbiter
                .evaluate(&registry, A, B, frame, InteractionFlags::empty())
                .unwrap()
        };
        assert_eq!(grade(8), CancelGrade::Perfect);
        assert_eq!(grade(10), CancelGrade::Perfect);
        assert_eq!(grade(11), CancelGrade::Normal);
        assert_eq!(grade(14), CancelGrade::Normal);
    }
}
