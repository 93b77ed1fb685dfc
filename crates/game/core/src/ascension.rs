//! Ascension difficulty table.
//!
//! Each level adds one modifier on top of every level below it. Calculations
//! never compare ascension levels directly; they read the resolved
//! [`AscensionModifiers`] instead.

use crate::GameConfig;

/// Highest ascension level.
pub const MAX_ASCENSION: u8 = 10;

/// Display entry for one ascension level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AscensionLevel {
    pub level: u8,
    pub name: &'static str,
    pub description: &'static str,
}

pub const ASCENSION_LEVELS: [AscensionLevel; MAX_ASCENSION as usize] = [
    AscensionLevel {
        level: 1,
        name: "Thinner Margins",
        description: "Near-miss threshold reduced from 3 to 2.",
    },
    AscensionLevel {
        level: 2,
        name: "Poverty",
        description: "Start with 25 gold instead of 50.",
    },
    AscensionLevel {
        level: 3,
        name: "Fragile",
        description: "Start with 60 HP instead of 80.",
    },
    AscensionLevel {
        level: 4,
        name: "Stingy Monsters",
        description: "Earn 30% less gold from combat.",
    },
    AscensionLevel {
        level: 5,
        name: "Tougher Hides",
        description: "All monsters have +15% HP.",
    },
    AscensionLevel {
        level: 6,
        name: "No Free Lunch",
        description: "Rest sites only heal 20% HP (down from 30%).",
    },
    AscensionLevel {
        level: 7,
        name: "Extra Conditions",
        description: "Monsters can have up to 3 conditions.",
    },
    AscensionLevel {
        level: 8,
        name: "Price Gouging",
        description: "All shop prices increased by 40%.",
    },
    AscensionLevel {
        level: 9,
        name: "Relentless",
        description: "Monster attack dice upgraded by one tier.",
    },
    AscensionLevel {
        level: 10,
        name: "The Final Challenge",
        description: "Start with 1 fewer die.",
    },
];

/// Levels active at `level`, lowest first.
pub fn active_levels(level: u8) -> impl Iterator<Item = &'static AscensionLevel> {
    ASCENSION_LEVELS.iter().filter(move |a| a.level <= level)
}

/// Numeric adjustments in effect for one ascension level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AscensionModifiers {
    pub level: u8,
    pub near_miss_threshold: f64,
    pub starting_gold: u32,
    pub starting_hp: u32,
    /// Applied to combat gold before combos, floored.
    pub gold_multiplier: f64,
    /// Applied to scaled monster HP, rounded.
    pub monster_hp_multiplier: f64,
    /// Fraction of max HP restored at rest sites.
    pub rest_heal_fraction: f64,
    pub max_conditions: usize,
    pub shop_price_multiplier: f64,
    /// Extra steps up the attack die progression.
    pub attack_die_bonus: usize,
    /// Dice removed from the end of the starting pool.
    pub starting_dice_penalty: usize,
}

impl AscensionModifiers {
    /// Smallest pool the final-challenge penalty may shrink.
    pub const MIN_POOL_FOR_PENALTY: usize = 4;

    pub fn for_level(level: u8, config: &GameConfig) -> Self {
        let at = |threshold: u8| level >= threshold;
        Self {
            level: level.min(MAX_ASCENSION),
            near_miss_threshold: if at(1) {
                config.near_miss_threshold - 1.0
            } else {
                config.near_miss_threshold
            },
            starting_gold: if at(2) {
                config.starting_gold / 2
            } else {
                config.starting_gold
            },
            starting_hp: if at(3) {
                config.starting_hp * 3 / 4
            } else {
                config.starting_hp
            },
            gold_multiplier: if at(4) { 0.7 } else { 1.0 },
            monster_hp_multiplier: if at(5) { 1.15 } else { 1.0 },
            rest_heal_fraction: if at(6) { 0.2 } else { 0.3 },
            max_conditions: if at(7) { 3 } else { 2 },
            shop_price_multiplier: if at(8) { 1.4 } else { 1.0 },
            attack_die_bonus: usize::from(at(9)),
            starting_dice_penalty: usize::from(at(10)),
        }
    }
}

impl Default for AscensionModifiers {
    fn default() -> Self {
        Self::for_level(0, &GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_uses_config_defaults() {
        let mods = AscensionModifiers::default();
        assert_eq!(mods.near_miss_threshold, 3.0);
        assert_eq!(mods.starting_gold, 50);
        assert_eq!(mods.starting_hp, 80);
        assert_eq!(mods.max_conditions, 2);
        assert_eq!(mods.attack_die_bonus, 0);
    }

    #[test]
    fn modifiers_stack_with_level() {
        let config = GameConfig::default();
        let one = AscensionModifiers::for_level(1, &config);
        assert_eq!(one.near_miss_threshold, 2.0);
        assert_eq!(one.starting_gold, 50);

        let ten = AscensionModifiers::for_level(10, &config);
        assert_eq!(ten.near_miss_threshold, 2.0);
        assert_eq!(ten.starting_gold, 25);
        assert_eq!(ten.starting_hp, 60);
        assert_eq!(ten.gold_multiplier, 0.7);
        assert_eq!(ten.monster_hp_multiplier, 1.15);
        assert_eq!(ten.rest_heal_fraction, 0.2);
        assert_eq!(ten.max_conditions, 3);
        assert_eq!(ten.shop_price_multiplier, 1.4);
        assert_eq!(ten.attack_die_bonus, 1);
        assert_eq!(ten.starting_dice_penalty, 1);
    }

    #[test]
    fn active_levels_are_cumulative() {
        assert_eq!(active_levels(0).count(), 0);
        assert_eq!(active_levels(4).count(), 4);
        assert_eq!(active_levels(200).count(), 10);
    }
}
