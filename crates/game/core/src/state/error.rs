use crate::error::{ErrorSeverity, GameError};
use crate::relic::RelicId;

/// Errors raised when mutating run state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("relic {0} is already owned")]
    DuplicateRelic(RelicId),

    #[error("dice pool is empty")]
    EmptyDicePool,
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateRelic(_) => ErrorSeverity::Validation,
            Self::EmptyDicePool => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateRelic(_) => "STATE_DUPLICATE_RELIC",
            Self::EmptyDicePool => "STATE_EMPTY_DICE_POOL",
        }
    }
}
