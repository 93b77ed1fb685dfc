//! Encounter conditions: rule modifiers attached to a monster.
//!
//! Conditions act at two points. [`validate_conditions`] rejects a submission
//! outright (the turn is not consumed), while [`calculate_damage`] applies the
//! targeting gate and classifies the outcome of a resolved turn.
mod damage;
mod validate;

pub use damage::{BlockReason, DamageOutcome, DamageRules, OutcomeKind, calculate_damage};
pub use validate::{ConditionViolation, check_all_dice, validate_conditions};

use arrayvec::ArrayVec;

use crate::GameConfig;
use crate::ascension::AscensionModifiers;
use crate::env::RngSource;
use crate::expression::OperatorId;

/// Conditions active in one encounter, at most [`GameConfig::MAX_CONDITIONS`].
pub type ActiveConditions = ArrayVec<ConditionId, { GameConfig::MAX_CONDITIONS }>;

/// Monster HP above which `single_die` is never drawn.
pub const SINGLE_DIE_MAX_HP: f64 = 30.0;

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
pub enum ConditionId {
    Gentle,
    Harsh,
    GlassCannon,
    TightWindow,
    NoOverkill,
    MustOverkill,
    #[strum(serialize = "use_3_dice")]
    Use3Dice,
    UseAllDice,
    #[strum(serialize = "max_2_ops")]
    Max2Ops,
    SingleDie,
    EvenOnly,
    OddOnly,
    NoFractions,
    DecimalTarget,
}

/// Grouping used to keep encounters varied: one condition per category,
/// except [`ConditionCategory::Number`] which may stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ConditionCategory {
    Damage,
    Targeting,
    Constraint,
    Number,
    Special,
}

impl ConditionId {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gentle => "Gentle",
            Self::Harsh => "Harsh",
            Self::GlassCannon => "Glass Cannon",
            Self::TightWindow => "Tight Window",
            Self::NoOverkill => "No Overkill",
            Self::MustOverkill => "Brute Force",
            Self::Use3Dice => "Three's Company",
            Self::UseAllDice => "All In",
            Self::Max2Ops => "Keep It Simple",
            Self::SingleDie => "One Shot",
            Self::EvenOnly => "Even Steven",
            Self::OddOnly => "Odd One Out",
            Self::NoFractions => "Whole Numbers Only",
            Self::DecimalTarget => "Decimal Dance",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Gentle => "No overkill penalty",
            Self::Harsh => "Take the FULL difference as damage if you miss",
            Self::GlassCannon => "Deal double damage, but take double overkill",
            Self::TightWindow => "Must be within 3 of target or deal no damage",
            Self::NoOverkill => "Going over the target deals zero damage",
            Self::MustOverkill => "Must exceed the target. Exact hits and underkills deal no damage",
            Self::Use3Dice => "Must use at least 3 dice",
            Self::UseAllDice => "Must use ALL your dice",
            Self::Max2Ops => "Can only use 2 operators max",
            Self::SingleDie => "Can only use 1 die. Choose wisely.",
            Self::EvenOnly => "Result must be even to deal damage",
            Self::OddOnly => "Result must be odd to deal damage",
            Self::NoFractions => "Decimal results deal no damage",
            Self::DecimalTarget => "Target includes a decimal",
        }
    }

    pub const fn category(self) -> ConditionCategory {
        match self {
            Self::Gentle | Self::Harsh | Self::GlassCannon => ConditionCategory::Damage,
            Self::TightWindow | Self::NoOverkill | Self::MustOverkill => {
                ConditionCategory::Targeting
            }
            Self::Use3Dice | Self::UseAllDice | Self::Max2Ops | Self::SingleDie => {
                ConditionCategory::Constraint
            }
            Self::EvenOnly | Self::OddOnly | Self::NoFractions => ConditionCategory::Number,
            Self::DecimalTarget => ConditionCategory::Special,
        }
    }

    /// Whether the two conditions may never share an encounter. Symmetric.
    pub const fn conflicts_with(self, other: ConditionId) -> bool {
        use ConditionId::*;
        matches!(
            (self, other),
            (NoOverkill, MustOverkill)
                | (MustOverkill, NoOverkill)
                | (Gentle, Harsh)
                | (Harsh, Gentle)
                | (SingleDie, Use3Dice | UseAllDice)
                | (Use3Dice | UseAllDice, SingleDie)
                | (EvenOnly, OddOnly)
                | (OddOnly, EvenOnly)
        )
    }
}

/// Conditions eligible on `floor`, in draw order before shuffling.
pub fn floor_pool(floor: u32) -> &'static [ConditionId] {
    use ConditionId::*;
    const EARLY: &[ConditionId] = &[Gentle, EvenOnly, OddOnly];
    const SHALLOW: &[ConditionId] = &[
        EvenOnly,
        OddOnly,
        Use3Dice,
        NoOverkill,
        MustOverkill,
        Max2Ops,
        NoFractions,
    ];
    const MIDDLE: &[ConditionId] = &[
        EvenOnly,
        OddOnly,
        Use3Dice,
        NoOverkill,
        MustOverkill,
        Max2Ops,
        NoFractions,
        Harsh,
        TightWindow,
        GlassCannon,
        SingleDie,
        DecimalTarget,
    ];
    const DEEP: &[ConditionId] = &[
        Use3Dice,
        NoOverkill,
        MustOverkill,
        UseAllDice,
        Max2Ops,
        Harsh,
        TightWindow,
        GlassCannon,
        SingleDie,
        DecimalTarget,
        EvenOnly,
        OddOnly,
        NoFractions,
    ];

    match floor {
        0..=1 => EARLY,
        2..=4 => SHALLOW,
        5..=7 => MIDDLE,
        8..=99 => DEEP,
        _ => EARLY,
    }
}

/// Probability that an encounter on `floor` carries any conditions.
pub fn condition_chance(floor: u32) -> f64 {
    (0.3 + f64::from(floor) * 0.08).min(0.85)
}

/// Draws the conditions for an encounter.
///
/// Floor 0 never has conditions and consumes no randomness. Otherwise one
/// draw decides whether any conditions apply, then the floor pool is shuffled
/// and walked, keeping candidates until the ascension limit is reached. A
/// candidate is skipped when its category is already taken (number rules
/// excepted), when it conflicts with a kept condition, or when the encounter
/// cannot support it: `single_die` needs a target of at most 30 and
/// `decimal_target` needs an operator that can produce fractions.
pub fn pick_conditions<R: RngSource>(
    floor: u32,
    rng: &mut R,
    monster_hp: f64,
    hand: &[OperatorId],
    modifiers: &AscensionModifiers,
) -> ActiveConditions {
    let mut picked = ActiveConditions::new();
    if floor == 0 {
        return picked;
    }
    if rng.next_f64() > condition_chance(floor) {
        return picked;
    }

    let can_make_fractions = hand.iter().any(|op| op.produces_fractions());
    let limit = modifiers.max_conditions.min(picked.capacity());

    for id in rng.shuffle(floor_pool(floor)) {
        if picked.len() >= limit {
            break;
        }
        let category = id.category();
        if category != ConditionCategory::Number
            && picked.iter().any(|c| c.category() == category)
        {
            continue;
        }
        if picked.iter().any(|c| id.conflicts_with(*c)) {
            continue;
        }
        if id == ConditionId::SingleDie && monster_hp > SINGLE_DIE_MAX_HP {
            continue;
        }
        if id == ConditionId::DecimalTarget && !can_make_fractions {
            continue;
        }
        picked.push(id);
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SeededRng;
    use std::str::FromStr;

    const FULL_HAND: [OperatorId; 4] = [
        OperatorId::Add,
        OperatorId::Subtract,
        OperatorId::Multiply,
        OperatorId::Divide,
    ];

    #[test]
    fn floor_zero_has_no_conditions_and_draws_nothing() {
        let mut rng = SeededRng::new(9);
        let before = rng;
        let picked = pick_conditions(0, &mut rng, 20.0, &FULL_HAND, &AscensionModifiers::default());
        assert!(picked.is_empty());
        assert_eq!(rng, before);
    }

    #[test]
    fn same_seed_picks_same_conditions() {
        let mods = AscensionModifiers::default();
        for seed in 0..100 {
            let a = pick_conditions(6, &mut SeededRng::new(seed), 25.0, &FULL_HAND, &mods);
            let b = pick_conditions(6, &mut SeededRng::new(seed), 25.0, &FULL_HAND, &mods);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn conflicting_pairs_never_share_an_encounter() {
        let mods = AscensionModifiers::for_level(7, &GameConfig::default());
        for floor in 1..12 {
            for seed in 0..300 {
                let picked =
                    pick_conditions(floor, &mut SeededRng::new(seed), 20.0, &FULL_HAND, &mods);
                for a in &picked {
                    for b in &picked {
                        assert!(!a.conflicts_with(*b), "{a} with {b} on floor {floor}");
                    }
                }
            }
        }
    }

    #[test]
    fn only_number_rules_share_a_category() {
        let mods = AscensionModifiers::for_level(7, &GameConfig::default());
        for seed in 0..300 {
            let picked = pick_conditions(9, &mut SeededRng::new(seed), 20.0, &FULL_HAND, &mods);
            assert!(picked.len() <= 3);
            for (i, a) in picked.iter().enumerate() {
                for b in picked.iter().skip(i + 1) {
                    if a.category() == b.category() {
                        assert_eq!(a.category(), ConditionCategory::Number);
                    }
                }
            }
        }
    }

    #[test]
    fn infeasible_conditions_are_skipped() {
        let mods = AscensionModifiers::default();
        let hand = [OperatorId::Add, OperatorId::Multiply];
        for seed in 0..300 {
            let picked = pick_conditions(6, &mut SeededRng::new(seed), 45.0, &hand, &mods);
            assert!(!picked.contains(&ConditionId::SingleDie));
            assert!(!picked.contains(&ConditionId::DecimalTarget));
            assert!(picked.len() <= 2);
        }
    }

    #[test]
    fn chance_is_capped() {
        assert!((condition_chance(1) - 0.38).abs() < 1e-9);
        assert_eq!(condition_chance(50), 0.85);
    }

    #[test]
    fn ids_use_snake_case() {
        assert_eq!(ConditionId::Use3Dice.to_string(), "use_3_dice");
        assert_eq!(ConditionId::from_str("max_2_ops"), Ok(ConditionId::Max2Ops));
        assert_eq!(ConditionId::MustOverkill.name(), "Brute Force");
    }
}
