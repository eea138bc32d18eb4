//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (e.g. [`DefinitionError`](crate::action::DefinitionError),
//! [`CancelRejection`](crate::cancel::CancelRejection)) live next to the code that
//! produces them. This module holds the shared classification they all report.
//!
//! None of these errors cross the state-machine boundary during simulation:
//! start and cancel attempts answer with `bool`, and the typed reason is only
//! used for logging and for callers that ask the arbiter directly.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the request may succeed later (e.g. outside a cancel window now)
/// - **Validation**: the request or definition is wrong and will never succeed as-is
/// - **Internal**: state inconsistency that indicates a bug
/// - **Fatal**: the simulation cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: cancel attempted outside the window, blocked by interaction state
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown action, cancel route not whitelisted
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - simulation state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
