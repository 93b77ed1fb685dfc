//! Combo detection. Combos scale the gold reward and never touch damage.

use crate::GameConfig;
use crate::expression::{Token, count_numbers, count_operators};
use crate::numbers;

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
pub enum ComboId {
    ExactHit,
    PrimeTime,
    Palindrome,
    PowerOfTwo,
    AllDice,
    NoOperators,
    TheAnswer,
    Century,
    TripleThreat,
    BigNumber,
}

impl ComboId {
    /// Every combo in evaluation order.
    pub const ALL: [ComboId; 10] = [
        Self::ExactHit,
        Self::PrimeTime,
        Self::Palindrome,
        Self::PowerOfTwo,
        Self::AllDice,
        Self::NoOperators,
        Self::TheAnswer,
        Self::Century,
        Self::TripleThreat,
        Self::BigNumber,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ExactHit => "EXACT HIT",
            Self::PrimeTime => "PRIME TIME",
            Self::Palindrome => "PALINDROME",
            Self::PowerOfTwo => "POWER OF 2",
            Self::AllDice => "ALL DICE",
            Self::NoOperators => "NAKED NUMBER",
            Self::TheAnswer => "THE ANSWER",
            Self::Century => "CENTURY",
            Self::TripleThreat => "TRIPLE THREAT",
            Self::BigNumber => "GO BIG",
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::ExactHit | Self::PrimeTime | Self::TripleThreat => 1.5,
            Self::Palindrome | Self::PowerOfTwo => 1.3,
            Self::AllDice | Self::Century => 2.0,
            Self::NoOperators => 3.0,
            Self::TheAnswer => 1.42,
            Self::BigNumber => 1.4,
        }
    }

    fn matches(self, ctx: &ScoreContext<'_>) -> bool {
        let result = ctx.result;
        match self {
            Self::ExactHit => (result - ctx.target).abs() < GameConfig::EXACT_TOLERANCE,
            Self::PrimeTime => numbers::is_prime(result),
            Self::Palindrome => numbers::is_palindrome(result),
            Self::PowerOfTwo => result.abs() > 2.0 && numbers::is_power_of_two(result.abs()),
            Self::AllDice => ctx.total_dice > 1 && ctx.dice_used() == ctx.total_dice,
            Self::NoOperators => count_operators(ctx.tokens) == 0 && ctx.dice_used() == 1,
            Self::TheAnswer => result == 42.0,
            Self::Century => result == 100.0,
            Self::TripleThreat => has_triple(ctx.tokens),
            Self::BigNumber => result.abs() >= 200.0,
        }
    }
}

/// Inputs to a scoring pass.
#[derive(Clone, Copy, Debug)]
pub struct ScoreContext<'a> {
    pub result: f64,
    pub target: f64,
    pub tokens: &'a [Token],
    /// Dice on the tray, used or not.
    pub total_dice: usize,
}

impl ScoreContext<'_> {
    fn dice_used(&self) -> usize {
        count_numbers(self.tokens)
    }
}

/// Combos that matched and their combined gold multiplier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboReport {
    pub combos: Vec<ComboId>,
    /// Product of the matched multipliers, rounded to two places. 1.0 when none.
    pub total_multiplier: f64,
}

impl ComboReport {
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// Log line such as `COMBOS: PRIME TIME (x1.5) → x1.5 gold!`.
    pub fn summary(&self) -> Option<String> {
        if self.combos.is_empty() {
            return None;
        }
        let names = self
            .combos
            .iter()
            .map(|c| format!("{} (x{})", c.name(), c.multiplier()))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!(
            "COMBOS: {names} → x{} gold!",
            self.total_multiplier
        ))
    }
}

/// Runs every combo predicate against the same context.
pub fn evaluate_combos(ctx: &ScoreContext<'_>) -> ComboReport {
    let combos: Vec<ComboId> = ComboId::ALL
        .into_iter()
        .filter(|combo| combo.matches(ctx))
        .collect();
    let product = combos.iter().map(|c| c.multiplier()).product::<f64>();

    ComboReport {
        combos,
        total_multiplier: numbers::round_to(product, 2),
    }
}

/// Some die value appears at least three times.
fn has_triple(tokens: &[Token]) -> bool {
    let values: Vec<f64> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Number(n) => Some(n.value),
            Token::Operator(_) => None,
        })
        .collect();
    values
        .iter()
        .any(|v| values.iter().filter(|other| *other == v).count() >= 3)
}
