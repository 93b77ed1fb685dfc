//! Operator registry.
//!
//! Every operator card resolves to a static [`OperatorDef`] carrying its symbol,
//! fixity, precedence and numeric function. Functions are pure and signal a
//! domain failure by returning NaN or an infinity; the evaluator turns that
//! into an [`ExpressionError`](super::ExpressionError).
//!
//! Precedence (higher binds tighter):
//!
//! | level | operators |
//! |-------|-----------|
//! | 1 | `+` `−` |
//! | 2 | `×` `÷` `%` |
//! | 3 | `^` (right-associative) |
//! | 4 | `‖` concatenation |
//! | 5 | prefix `√` `−x` `log₂` |
//! | 6 | postfix `!` `²` `△` `▭` |
//!
//! Power is the only right-associative operator.

use crate::numbers;

/// Stable identifier of an operator card.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OperatorId {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Concat,
    Sqrt,
    Negate,
    Log,
    Factorial,
    Square,
    Triangle,
    Rectangle,
    Lparen,
    Rparen,
}

/// Where an operator sits relative to its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fixity {
    /// Unary, written before its operand.
    Prefix,
    /// Unary, written after its operand.
    Postfix,
    /// Binary, written between its operands.
    Infix,
    OpenParen,
    CloseParen,
}

/// How rare an operator card is in reward pools.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OperatorRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Exotic,
}

/// Numeric behaviour of an operator.
#[derive(Clone, Copy)]
pub enum OperatorFn {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    /// Parentheses only shape the parse.
    Grouping,
}

impl core::fmt::Debug for OperatorFn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unary(_) => f.write_str("Unary"),
            Self::Binary(_) => f.write_str("Binary"),
            Self::Grouping => f.write_str("Grouping"),
        }
    }
}

/// Registry entry for one operator.
#[derive(Clone, Copy, Debug)]
pub struct OperatorDef {
    pub id: OperatorId,
    pub name: &'static str,
    pub symbol: &'static str,
    pub fixity: Fixity,
    pub precedence: u8,
    pub right_associative: bool,
    pub rarity: OperatorRarity,
    pub apply: OperatorFn,
}

impl OperatorDef {
    pub const fn arity(&self) -> u8 {
        match self.fixity {
            Fixity::Prefix | Fixity::Postfix => 1,
            Fixity::Infix => 2,
            Fixity::OpenParen | Fixity::CloseParen => 0,
        }
    }

    pub const fn is_paren(&self) -> bool {
        matches!(self.fixity, Fixity::OpenParen | Fixity::CloseParen)
    }
}

/// Largest exponent magnitude accepted by power.
pub const MAX_EXPONENT: f64 = 20.0;

fn add(a: f64, b: f64) -> f64 {
    a + b
}

fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

fn divide(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a / b }
}

fn modulo(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a % b }
}

fn power(a: f64, b: f64) -> f64 {
    if b.abs() > MAX_EXPONENT {
        return f64::NAN;
    }
    a.powf(b)
}

/// Joins the digits of two non-negative integers: `12 ‖ 3 = 123`.
fn concat(a: f64, b: f64) -> f64 {
    if a < 0.0 || b < 0.0 || !numbers::is_integer(a) || !numbers::is_integer(b) {
        return f64::NAN;
    }
    format!("{a}{b}").parse().unwrap_or(f64::NAN)
}

fn sqrt(a: f64) -> f64 {
    if a < 0.0 { f64::NAN } else { a.sqrt() }
}

fn negate(a: f64) -> f64 {
    -a
}

fn log2(a: f64) -> f64 {
    if a <= 0.0 { f64::NAN } else { a.log2() }
}

fn square(a: f64) -> f64 {
    a * a
}

const fn infix(
    id: OperatorId,
    name: &'static str,
    symbol: &'static str,
    precedence: u8,
    rarity: OperatorRarity,
    apply: fn(f64, f64) -> f64,
) -> OperatorDef {
    OperatorDef {
        id,
        name,
        symbol,
        fixity: Fixity::Infix,
        precedence,
        right_associative: false,
        rarity,
        apply: OperatorFn::Binary(apply),
    }
}

const fn unary(
    id: OperatorId,
    name: &'static str,
    symbol: &'static str,
    fixity: Fixity,
    rarity: OperatorRarity,
    apply: fn(f64) -> f64,
) -> OperatorDef {
    let precedence = match fixity {
        Fixity::Prefix => 5,
        _ => 6,
    };
    OperatorDef {
        id,
        name,
        symbol,
        fixity,
        precedence,
        right_associative: false,
        rarity,
        apply: OperatorFn::Unary(apply),
    }
}

const fn paren(id: OperatorId, symbol: &'static str, fixity: Fixity) -> OperatorDef {
    OperatorDef {
        id,
        name: symbol,
        symbol,
        fixity,
        precedence: 0,
        right_associative: false,
        rarity: OperatorRarity::Uncommon,
        apply: OperatorFn::Grouping,
    }
}

use OperatorId as Op;
use OperatorRarity as R;

static ADD: OperatorDef = infix(Op::Add, "Add", "+", 1, R::Common, add);
static SUBTRACT: OperatorDef = infix(Op::Subtract, "Subtract", "−", 1, R::Common, subtract);
static MULTIPLY: OperatorDef = infix(Op::Multiply, "Multiply", "×", 2, R::Common, multiply);
static DIVIDE: OperatorDef = infix(Op::Divide, "Divide", "÷", 2, R::Uncommon, divide);
static MODULO: OperatorDef = infix(Op::Modulo, "Modulo", "%", 2, R::Uncommon, modulo);
static POWER: OperatorDef = OperatorDef {
    right_associative: true,
    ..infix(Op::Power, "Power", "^", 3, R::Rare, power)
};
static CONCAT: OperatorDef = infix(Op::Concat, "Concatenate", "‖", 4, R::Exotic, concat);
static SQRT: OperatorDef = unary(Op::Sqrt, "Square Root", "√", Fixity::Prefix, R::Rare, sqrt);
static NEGATE: OperatorDef = unary(
    Op::Negate,
    "Negate",
    "−x",
    Fixity::Prefix,
    R::Uncommon,
    negate,
);
static LOG: OperatorDef = unary(Op::Log, "Log Base 2", "log₂", Fixity::Prefix, R::Rare, log2);
static FACTORIAL: OperatorDef = unary(
    Op::Factorial,
    "Factorial",
    "!",
    Fixity::Postfix,
    R::Legendary,
    numbers::factorial,
);
static SQUARE: OperatorDef = unary(Op::Square, "Square", "²", Fixity::Postfix, R::Rare, square);
static TRIANGLE: OperatorDef = unary(
    Op::Triangle,
    "Triangle",
    "△",
    Fixity::Postfix,
    R::Uncommon,
    numbers::triangular,
);
static RECTANGLE: OperatorDef = unary(
    Op::Rectangle,
    "Rectangle",
    "▭",
    Fixity::Postfix,
    R::Uncommon,
    numbers::rectangular,
);
static LPAREN: OperatorDef = paren(Op::Lparen, "(", Fixity::OpenParen);
static RPAREN: OperatorDef = paren(Op::Rparen, ")", Fixity::CloseParen);

impl OperatorId {
    /// Registry entry for this operator.
    pub fn definition(self) -> &'static OperatorDef {
        match self {
            Self::Add => &ADD,
            Self::Subtract => &SUBTRACT,
            Self::Multiply => &MULTIPLY,
            Self::Divide => &DIVIDE,
            Self::Modulo => &MODULO,
            Self::Power => &POWER,
            Self::Concat => &CONCAT,
            Self::Sqrt => &SQRT,
            Self::Negate => &NEGATE,
            Self::Log => &LOG,
            Self::Factorial => &FACTORIAL,
            Self::Square => &SQUARE,
            Self::Triangle => &TRIANGLE,
            Self::Rectangle => &RECTANGLE,
            Self::Lparen => &LPAREN,
            Self::Rparen => &RPAREN,
        }
    }

    /// Whether this operator can turn integers into non-integers.
    pub const fn produces_fractions(self) -> bool {
        matches!(self, Self::Divide | Self::Sqrt)
    }
}

/// Operators offered at each reward rarity.
pub fn reward_pool(rarity: OperatorRarity) -> &'static [OperatorId] {
    match rarity {
        R::Common => &[Op::Add, Op::Subtract, Op::Multiply],
        R::Uncommon => &[
            Op::Divide,
            Op::Modulo,
            Op::Negate,
            Op::Lparen,
            Op::Rparen,
            Op::Triangle,
            Op::Rectangle,
        ],
        R::Rare => &[Op::Power, Op::Sqrt, Op::Log, Op::Square],
        R::Legendary => &[Op::Factorial],
        R::Exotic => &[Op::Concat],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn binary(id: OperatorId, a: f64, b: f64) -> f64 {
        match id.definition().apply {
            OperatorFn::Binary(f) => f(a, b),
            other => panic!("{id} is not binary: {other:?}"),
        }
    }

    fn unary_apply(id: OperatorId, a: f64) -> f64 {
        match id.definition().apply {
            OperatorFn::Unary(f) => f(a),
            other => panic!("{id} is not unary: {other:?}"),
        }
    }

    #[test]
    fn registry_entries_match_their_ids() {
        for id in OperatorId::iter() {
            assert_eq!(id.definition().id, id);
        }
    }

    #[test]
    fn only_power_is_right_associative() {
        let right: Vec<_> = OperatorId::iter()
            .filter(|id| id.definition().right_associative)
            .collect();
        assert_eq!(right, vec![OperatorId::Power]);
    }

    #[test]
    fn arity_follows_fixity() {
        assert_eq!(OperatorId::Add.definition().arity(), 2);
        assert_eq!(OperatorId::Sqrt.definition().arity(), 1);
        assert_eq!(OperatorId::Factorial.definition().arity(), 1);
        assert_eq!(OperatorId::Lparen.definition().arity(), 0);
    }

    #[test]
    fn division_and_modulo_by_zero_are_invalid() {
        assert!(binary(OperatorId::Divide, 4.0, 0.0).is_nan());
        assert!(binary(OperatorId::Modulo, 4.0, 0.0).is_nan());
        assert_eq!(binary(OperatorId::Divide, 9.0, 2.0), 4.5);
        assert_eq!(binary(OperatorId::Modulo, -7.0, 3.0), -1.0);
    }

    #[test]
    fn power_caps_the_exponent() {
        assert_eq!(binary(OperatorId::Power, 2.0, 10.0), 1024.0);
        assert!(binary(OperatorId::Power, 2.0, 21.0).is_nan());
        assert!(binary(OperatorId::Power, -8.0, 0.5).is_nan());
    }

    #[test]
    fn concat_joins_digits() {
        assert_eq!(binary(OperatorId::Concat, 12.0, 3.0), 123.0);
        assert!(binary(OperatorId::Concat, 1.5, 3.0).is_nan());
        assert!(binary(OperatorId::Concat, -1.0, 3.0).is_nan());
    }

    #[test]
    fn unary_domains() {
        assert!(unary_apply(OperatorId::Sqrt, -1.0).is_nan());
        assert_eq!(unary_apply(OperatorId::Sqrt, 16.0), 4.0);
        assert!(unary_apply(OperatorId::Log, 0.0).is_nan());
        assert_eq!(unary_apply(OperatorId::Log, 8.0), 3.0);
        assert!(unary_apply(OperatorId::Factorial, 13.0).is_nan());
        assert_eq!(unary_apply(OperatorId::Triangle, 4.0), 10.0);
        assert_eq!(unary_apply(OperatorId::Negate, 4.0), -4.0);
    }

    #[test]
    fn every_card_appears_in_a_reward_pool() {
        let pools = [
            OperatorRarity::Common,
            OperatorRarity::Uncommon,
            OperatorRarity::Rare,
            OperatorRarity::Legendary,
            OperatorRarity::Exotic,
        ];
        for id in OperatorId::iter() {
            assert!(
                pools.iter().any(|r| reward_pool(*r).contains(&id)),
                "{id} missing from reward pools"
            );
        }
    }
}
