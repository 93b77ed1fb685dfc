use super::ConditionId;
use crate::error::{ErrorSeverity, GameError};
use crate::expression::{Token, count_numbers, count_operators};

/// Structural rule a submission broke. The turn is not consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConditionViolation {
    #[error("Must use at least 3 dice")]
    TooFewDice,

    #[error("Max 2 operators allowed")]
    TooManyOperators,

    #[error("Can only use 1 die")]
    MoreThanOneDie,

    #[error("Result must be even")]
    NotEven,

    #[error("Result must be odd")]
    NotOdd,

    #[error("No decimals allowed")]
    Fractional,

    #[error("Must use ALL dice!")]
    NotAllDice,
}

impl ConditionViolation {
    /// Condition that produced the violation.
    pub const fn condition(self) -> ConditionId {
        match self {
            Self::TooFewDice => ConditionId::Use3Dice,
            Self::TooManyOperators => ConditionId::Max2Ops,
            Self::MoreThanOneDie => ConditionId::SingleDie,
            Self::NotEven => ConditionId::EvenOnly,
            Self::NotOdd => ConditionId::OddOnly,
            Self::Fractional => ConditionId::NoFractions,
            Self::NotAllDice => ConditionId::UseAllDice,
        }
    }
}

impl GameError for ConditionViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewDice => "CONDITION_TOO_FEW_DICE",
            Self::TooManyOperators => "CONDITION_TOO_MANY_OPERATORS",
            Self::MoreThanOneDie => "CONDITION_MORE_THAN_ONE_DIE",
            Self::NotEven => "CONDITION_NOT_EVEN",
            Self::NotOdd => "CONDITION_NOT_ODD",
            Self::Fractional => "CONDITION_FRACTIONAL",
            Self::NotAllDice => "CONDITION_NOT_ALL_DICE",
        }
    }
}

/// Checks dice count, operator count, parity and integrality in condition
/// order, returning the first violation.
///
/// `use_all_dice` needs the tray size and is checked by [`check_all_dice`].
pub fn validate_conditions(
    conditions: &[ConditionId],
    result: f64,
    tokens: &[Token],
) -> Result<(), ConditionViolation> {
    let dice_used = count_numbers(tokens);
    let operators_used = count_operators(tokens);

    for condition in conditions {
        match condition {
            ConditionId::Use3Dice if dice_used < 3 => {
                return Err(ConditionViolation::TooFewDice);
            }
            ConditionId::Max2Ops if operators_used > 2 => {
                return Err(ConditionViolation::TooManyOperators);
            }
            ConditionId::SingleDie if dice_used > 1 => {
                return Err(ConditionViolation::MoreThanOneDie);
            }
            ConditionId::EvenOnly if result % 2.0 != 0.0 => {
                return Err(ConditionViolation::NotEven);
            }
            ConditionId::OddOnly if result.floor() != result || result % 2.0 == 0.0 => {
                return Err(ConditionViolation::NotOdd);
            }
            ConditionId::NoFractions if result.floor() != result => {
                return Err(ConditionViolation::Fractional);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Enforces `use_all_dice` against the number of dice on the tray.
pub fn check_all_dice(
    conditions: &[ConditionId],
    tokens: &[Token],
    total_dice: usize,
) -> Result<(), ConditionViolation> {
    if conditions.contains(&ConditionId::UseAllDice) && count_numbers(tokens) < total_dice {
        return Err(ConditionViolation::NotAllDice);
    }
    Ok(())
}
