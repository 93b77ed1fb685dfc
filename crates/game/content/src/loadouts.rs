//! Starting loadouts and the opening operator hand.

use game_core::DiceClass::{Fibonacci, Prime, Square, Standard};
use game_core::DieType::{D4, D6, D8, D10};
use game_core::{DieSpec, OperatorId};

/// Dice set a run starts with.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum LoadoutId {
    #[default]
    Standard,
    Naturalist,
    Architect,
    Chaos,
    Minimalist,
    Gambler,
}

impl LoadoutId {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Naturalist => "Naturalist",
            Self::Architect => "Architect",
            Self::Chaos => "Chaos",
            Self::Minimalist => "Minimalist",
            Self::Gambler => "Gambler",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Standard => "All normal dice. Predictable numbers, straightforward math.",
            Self::Naturalist => "Fibonacci dice give unusual numbers: 1, 1, 2, 3, 5, 8...",
            Self::Architect => "Square dice produce big jumps: 1, 4, 9, 16, 25, 36...",
            Self::Chaos => "A wild mix of special dice. Big numbers, weird math.",
            Self::Minimalist => "Only 3 dice, but they are bigger. Every roll counts.",
            Self::Gambler => "All prime dice. Weird numbers, but powerful combos if you know your primes.",
        }
    }

    pub const fn difficulty(self) -> &'static str {
        match self {
            Self::Standard => "Easy",
            Self::Naturalist | Self::Architect => "Medium",
            Self::Chaos | Self::Minimalist => "Hard",
            Self::Gambler => "Expert",
        }
    }

    /// Dice pool in the order they are dealt.
    pub fn dice(self) -> Vec<DieSpec> {
        match self {
            Self::Standard => vec![
                DieSpec::new(D6, Standard),
                DieSpec::new(D6, Standard),
                DieSpec::new(D6, Standard),
                DieSpec::new(D4, Standard),
                DieSpec::new(D8, Standard),
            ],
            Self::Naturalist => vec![
                DieSpec::new(D6, Standard),
                DieSpec::new(D6, Fibonacci),
                DieSpec::new(D6, Fibonacci),
                DieSpec::new(D4, Standard),
                DieSpec::new(D8, Standard),
            ],
            Self::Architect => vec![
                DieSpec::new(D6, Standard),
                DieSpec::new(D6, Square),
                DieSpec::new(D4, Square),
                DieSpec::new(D6, Standard),
                DieSpec::new(D8, Standard),
            ],
            Self::Chaos => vec![
                DieSpec::new(D6, Fibonacci),
                DieSpec::new(D6, Square),
                DieSpec::new(D6, Prime),
                DieSpec::new(D4, Standard),
                DieSpec::new(D8, Standard),
            ],
            Self::Minimalist => vec![
                DieSpec::new(D10, Standard),
                DieSpec::new(D8, Standard),
                DieSpec::new(D8, Standard),
            ],
            Self::Gambler => vec![
                DieSpec::new(D6, Prime),
                DieSpec::new(D6, Prime),
                DieSpec::new(D6, Prime),
                DieSpec::new(D8, Prime),
                DieSpec::new(D4, Prime),
            ],
        }
    }
}

/// Operator cards every run opens with.
pub fn starting_operators() -> Vec<OperatorId> {
    vec![
        OperatorId::Add,
        OperatorId::Subtract,
        OperatorId::Multiply,
        OperatorId::Divide,
    ]
}
