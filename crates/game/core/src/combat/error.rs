//! Errors surfaced by the combat engine.

use crate::condition::ConditionViolation;
use crate::dice::DieId;
use crate::error::{ErrorSeverity, GameError};
use crate::expression::{ExpressionError, OperatorId};

/// Why an expression edit was rejected. The expression is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenError {
    #[error("combat is over")]
    NotBuilding,

    #[error("{0} is not on the tray")]
    UnknownDie(DieId),

    #[error("{0} has not been rolled")]
    DieNotRolled(DieId),

    #[error("{0} is already in the expression")]
    DieAlreadyPlaced(DieId),

    #[error("number does not match the face shown by {0}")]
    ValueMismatch(DieId),

    #[error("numbers must come from a die on the tray")]
    NumberWithoutDie,

    #[error("operators must come from a card in hand")]
    OperatorWithoutCard,

    #[error("no operator card at hand slot {0}")]
    UnknownCard(usize),

    #[error("hand slot {index} holds {held}, not {requested}")]
    CardMismatch {
        index: usize,
        held: OperatorId,
        requested: OperatorId,
    },

    #[error("operator card at hand slot {0} is already used up")]
    CardExhausted(usize),

    #[error("slot {index} is out of range for an expression of {len} tokens")]
    IndexOutOfRange { index: usize, len: usize },
}

impl GameError for TokenError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotBuilding => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotBuilding => "TOKEN_NOT_BUILDING",
            Self::UnknownDie(_) => "TOKEN_UNKNOWN_DIE",
            Self::DieNotRolled(_) => "TOKEN_DIE_NOT_ROLLED",
            Self::DieAlreadyPlaced(_) => "TOKEN_DIE_ALREADY_PLACED",
            Self::ValueMismatch(_) => "TOKEN_VALUE_MISMATCH",
            Self::NumberWithoutDie => "TOKEN_NUMBER_WITHOUT_DIE",
            Self::OperatorWithoutCard => "TOKEN_OPERATOR_WITHOUT_CARD",
            Self::UnknownCard(_) => "TOKEN_UNKNOWN_CARD",
            Self::CardMismatch { .. } => "TOKEN_CARD_MISMATCH",
            Self::CardExhausted(_) => "TOKEN_CARD_EXHAUSTED",
            Self::IndexOutOfRange { .. } => "TOKEN_INDEX_OUT_OF_RANGE",
        }
    }
}

/// A submission that did not resolve a turn.
///
/// Nothing is consumed: the turn, dice and RNG stream are as before the call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EvaluateError {
    #[error("combat is over")]
    NotBuilding,

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Condition(#[from] ConditionViolation),
}

impl GameError for EvaluateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotBuilding => ErrorSeverity::Recoverable,
            Self::Expression(err) => err.severity(),
            Self::Condition(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotBuilding => "EVALUATE_NOT_BUILDING",
            Self::Expression(err) => err.error_code(),
            Self::Condition(err) => err.error_code(),
        }
    }
}

/// Failures while setting up an encounter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CombatError {
    #[error("unknown monster: {0}")]
    UnknownMonster(String),

    #[error("no {kind} monsters available for tier {tier}")]
    EmptyMonsterPool { kind: &'static str, tier: u32 },

    #[error("the player has no dice")]
    EmptyDicePool,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyDicePool => ErrorSeverity::Validation,
            Self::UnknownMonster(_) | Self::EmptyMonsterPool { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMonster(_) => "COMBAT_UNKNOWN_MONSTER",
            Self::EmptyMonsterPool { .. } => "COMBAT_EMPTY_MONSTER_POOL",
            Self::EmptyDicePool => "COMBAT_EMPTY_DICE_POOL",
        }
    }
}
