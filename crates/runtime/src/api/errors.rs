//! Unified error type surfaced by the runtime API.
//!
//! Wraps failures from the combat engine and the run state so clients can
//! bubble them up with consistent context.

use game_core::{
    CombatError, ErrorSeverity, EvaluateError, ExpressionError, GameError, StateError, TokenError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no combat in progress")]
    NoActiveCombat,

    #[error("a combat is already in progress")]
    CombatInProgress,

    #[error("the current combat has not ended")]
    CombatNotFinished,

    #[error("the run is over")]
    RunOver,

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Evaluate(#[from] EvaluateError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActiveCombat
            | Self::CombatInProgress
            | Self::CombatNotFinished
            | Self::RunOver => ErrorSeverity::Validation,
            Self::Serialization(_) => ErrorSeverity::Internal,
            Self::Token(e) => e.severity(),
            Self::Evaluate(e) => e.severity(),
            Self::Expression(e) => e.severity(),
            Self::Combat(e) => e.severity(),
            Self::State(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveCombat => "RUNTIME_NO_ACTIVE_COMBAT",
            Self::CombatInProgress => "RUNTIME_COMBAT_IN_PROGRESS",
            Self::CombatNotFinished => "RUNTIME_COMBAT_NOT_FINISHED",
            Self::RunOver => "RUNTIME_RUN_OVER",
            Self::Serialization(_) => "RUNTIME_SERIALIZATION",
            Self::Token(e) => e.error_code(),
            Self::Evaluate(e) => e.error_code(),
            Self::Expression(e) => e.error_code(),
            Self::Combat(e) => e.error_code(),
            Self::State(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_codes_pass_through() {
        let err = RuntimeError::from(TokenError::CardExhausted(2));
        assert_eq!(err.error_code(), "TOKEN_CARD_EXHAUSTED");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(RuntimeError::RunOver.error_code(), "RUNTIME_RUN_OVER");
    }
}
