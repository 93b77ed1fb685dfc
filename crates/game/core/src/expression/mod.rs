//! Arithmetic expressions built from dice and operator cards.
//!
//! Tokens are assembled by the combat engine; this module only reads them.
//! [`evaluate`] runs the full pipeline: grammar validation, shunting-yard
//! conversion and postfix evaluation. A sequence that fails validation is never
//! evaluated.
mod operator;
mod postfix;
mod token;
mod validate;

pub use operator::{
    Fixity, MAX_EXPONENT, OperatorDef, OperatorFn, OperatorId, OperatorRarity, reward_pool,
};
pub use postfix::{evaluate_postfix, to_postfix};
pub use token::{
    NumberToken, OperatorToken, Token, count_numbers, count_operators, tokens_to_string,
};
pub use validate::validate;

use crate::error::{ErrorSeverity, GameError};
use crate::numbers;

/// Decimal places kept in an evaluation result.
pub const RESULT_PRECISION: i32 = 3;

/// Grammar and arithmetic failures. Positions are 1-indexed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExpressionError {
    #[error("Expression is empty")]
    Empty,

    #[error("Unexpected number at position {position}")]
    UnexpectedNumber { position: usize },

    #[error("Unexpected ( at position {position}")]
    UnexpectedOpenParen { position: usize },

    #[error("Unexpected ) at position {position}")]
    UnexpectedCloseParen { position: usize },

    #[error("Unmatched ) at position {position}")]
    UnmatchedCloseParen { position: usize },

    #[error("Unexpected prefix operator {symbol} at position {position}")]
    UnexpectedPrefix {
        symbol: &'static str,
        position: usize,
    },

    #[error("Unexpected postfix operator {symbol} at position {position}")]
    UnexpectedPostfix {
        symbol: &'static str,
        position: usize,
    },

    #[error("Unexpected operator {symbol} at position {position}")]
    UnexpectedOperator {
        symbol: &'static str,
        position: usize,
    },

    #[error("Expression ends with an operator")]
    TrailingOperator,

    #[error("Unmatched ( with {missing} missing closing {}", paren_noun(.missing))]
    UnclosedParen { missing: usize },

    #[error("Not enough operands")]
    NotEnoughOperands,

    #[error("Invalid operation: {symbol}({operand})")]
    InvalidUnary { symbol: &'static str, operand: f64 },

    #[error("Invalid operation: {lhs} {symbol} {rhs}")]
    InvalidBinary {
        lhs: f64,
        symbol: &'static str,
        rhs: f64,
    },

    #[error("Invalid expression structure")]
    InvalidStructure,
}

fn paren_noun(missing: &usize) -> &'static str {
    if *missing == 1 {
        "parenthesis"
    } else {
        "parentheses"
    }
}

impl ExpressionError {
    /// True for failures found by the grammar scan, before any arithmetic.
    pub const fn is_grammar(&self) -> bool {
        !matches!(
            self,
            Self::NotEnoughOperands
                | Self::InvalidUnary { .. }
                | Self::InvalidBinary { .. }
                | Self::InvalidStructure
        )
    }
}

impl GameError for ExpressionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "EXPR_EMPTY",
            Self::UnexpectedNumber { .. } => "EXPR_UNEXPECTED_NUMBER",
            Self::UnexpectedOpenParen { .. } => "EXPR_UNEXPECTED_OPEN_PAREN",
            Self::UnexpectedCloseParen { .. } => "EXPR_UNEXPECTED_CLOSE_PAREN",
            Self::UnmatchedCloseParen { .. } => "EXPR_UNMATCHED_CLOSE_PAREN",
            Self::UnexpectedPrefix { .. } => "EXPR_UNEXPECTED_PREFIX",
            Self::UnexpectedPostfix { .. } => "EXPR_UNEXPECTED_POSTFIX",
            Self::UnexpectedOperator { .. } => "EXPR_UNEXPECTED_OPERATOR",
            Self::TrailingOperator => "EXPR_TRAILING_OPERATOR",
            Self::UnclosedParen { .. } => "EXPR_UNCLOSED_PAREN",
            Self::NotEnoughOperands => "EXPR_NOT_ENOUGH_OPERANDS",
            Self::InvalidUnary { .. } => "EXPR_INVALID_UNARY",
            Self::InvalidBinary { .. } => "EXPR_INVALID_BINARY",
            Self::InvalidStructure => "EXPR_INVALID_STRUCTURE",
        }
    }
}

/// Successful evaluation of a token sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Result rounded to [`RESULT_PRECISION`] decimal places.
    pub result: f64,
    pub dice_used: usize,
    /// Operator tokens used, parentheses included.
    pub operators_used: usize,
}

/// Validates, converts and evaluates `tokens`.
pub fn evaluate(tokens: &[Token]) -> Result<Evaluation, ExpressionError> {
    validate(tokens)?;
    let raw = evaluate_postfix(&to_postfix(tokens))?;

    Ok(Evaluation {
        result: numbers::round_to(raw, RESULT_PRECISION),
        dice_used: count_numbers(tokens),
        operators_used: count_operators(tokens),
    })
}
