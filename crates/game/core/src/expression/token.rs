use crate::dice::DieId;

use super::operator::OperatorId;

/// A number placed from a die on the tray.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberToken {
    pub value: f64,
    /// Die that produced the value. Not consulted during evaluation.
    pub die: Option<DieId>,
}

/// An operator card placed from the player's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorToken {
    pub op: OperatorId,
    /// Slot of the card in the operator hand. Not consulted during evaluation.
    pub hand_index: Option<usize>,
}

/// One unit of an expression under construction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    Number(NumberToken),
    Operator(OperatorToken),
}

impl Token {
    /// A free-standing number with no die behind it.
    pub const fn number(value: f64) -> Self {
        Self::Number(NumberToken { value, die: None })
    }

    pub fn die(value: u32, die: DieId) -> Self {
        Self::Number(NumberToken {
            value: f64::from(value),
            die: Some(die),
        })
    }

    /// An operator with no hand slot behind it.
    pub const fn op(op: OperatorId) -> Self {
        Self::Operator(OperatorToken {
            op,
            hand_index: None,
        })
    }

    pub const fn card(op: OperatorId, hand_index: usize) -> Self {
        Self::Operator(OperatorToken {
            op,
            hand_index: Some(hand_index),
        })
    }

    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub const fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    pub const fn die_id(&self) -> Option<DieId> {
        match self {
            Self::Number(number) => number.die,
            Self::Operator(_) => None,
        }
    }
}

/// Number tokens in the sequence.
pub fn count_numbers(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.is_number()).count()
}

/// Operator tokens in the sequence, parentheses included.
pub fn count_operators(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.is_operator()).count()
}

/// Renders tokens separated by spaces, e.g. `5 × 8`.
pub fn tokens_to_string(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token {
            Token::Number(number) => number.value.to_string(),
            Token::Operator(op) => op.op.definition().symbol.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
