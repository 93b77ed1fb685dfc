//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (e.g. [`ExpressionError`](crate::expression::ExpressionError),
//! [`ConditionViolation`](crate::condition::ConditionViolation)) live next to the
//! code that produces them. This module holds the shared classification used by
//! the runtime when deciding how to log and surface a failure.
//!
//! None of the errors here are fatal to a run: every rejected input can be
//! corrected by further player input.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the player can retry with a different action
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the player edits the expression and retries.
    ///
    /// Examples: malformed expression, condition not met
    Recoverable,

    /// Validation error - invalid input from the caller.
    ///
    /// Examples: unknown die, operator card not in hand
    Validation,

    /// Internal error - content or state inconsistency.
    ///
    /// Examples: unknown monster id, empty monster pool
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
