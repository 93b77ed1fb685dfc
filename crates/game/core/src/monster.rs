//! Monster templates and per-encounter instances.

use crate::ascension::AscensionModifiers;
use crate::dice::DieType;
use crate::env::RngSource;
use crate::{GameConfig, numbers};

/// Restriction a boss places on which results can damage it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BossAbility {
    PrimeOnly,
    PalindromeOnly,
    PerfectSquareOnly,
}

impl BossAbility {
    pub const fn description(self) -> &'static str {
        match self {
            Self::PrimeOnly => "Only prime-numbered results deal damage.",
            Self::PalindromeOnly => "Only palindrome results deal damage.",
            Self::PerfectSquareOnly => "Only perfect square results deal damage.",
        }
    }

    /// Short warning shown when a result would be blocked.
    pub const fn warning(self) -> &'static str {
        match self {
            Self::PrimeOnly => "Not prime!",
            Self::PalindromeOnly => "Not a palindrome!",
            Self::PerfectSquareOnly => "Not a perfect square!",
        }
    }

    /// Whether `result`, rounded to the nearest integer, gets through.
    pub fn allows(self, result: f64) -> bool {
        let rounded = numbers::round_half_up(result);
        match self {
            Self::PrimeOnly => numbers::is_prime(rounded),
            Self::PalindromeOnly => numbers::is_palindrome(rounded),
            Self::PerfectSquareOnly => numbers::is_perfect_square(rounded),
        }
    }
}

/// Static monster definition from the content catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub id: &'static str,
    pub name: &'static str,
    /// Inclusive base HP range before floor scaling.
    pub hp_range: (u32, u32),
    pub attack_die: DieType,
    pub attack_dice_count: u32,
    pub tier: u32,
    pub elite: bool,
    pub boss: Option<BossAbility>,
}

/// A monster in an active encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterInstance {
    pub id: String,
    pub name: String,
    /// Current HP, which is also the number to hit. May be fractional.
    pub hp: f64,
    pub max_hp: f64,
    pub attack_die: DieType,
    pub attack_dice_count: u32,
    pub tier: u32,
    pub elite: bool,
    pub boss: Option<BossAbility>,
    pub hp_range: (u32, u32),
}

const BIG_PRIMES: [u32; 30] = [
    53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151,
    157, 163, 167, 173, 179, 181, 191, 193, 197,
];

impl MonsterInstance {
    /// Scales a template to the given floor and ascension.
    ///
    /// HP grows by 15% per floor (compounding), then by the ascension HP
    /// multiplier. From floor 3 the target is nudged toward numbers that are
    /// awkward to build. The attack die climbs one step every four floors.
    pub fn spawn(
        template: &MonsterTemplate,
        rng: &mut dyn RngSource,
        floor: u32,
        modifiers: &AscensionModifiers,
    ) -> Self {
        let mut hp = scaled_hp(template.hp_range, rng, floor, modifiers);
        if floor >= 3 {
            hp = harder_target(hp, floor, rng);
        }

        let progression = &DieType::ATTACK_PROGRESSION;
        let base_index = progression
            .iter()
            .position(|d| *d == template.attack_die)
            .unwrap_or(1);
        let index = (base_index + (floor / 4) as usize + modifiers.attack_die_bonus)
            .min(progression.len() - 1);

        let hp = f64::from(hp);
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            hp,
            max_hp: hp,
            attack_die: progression[index],
            attack_dice_count: template.attack_dice_count.max(1),
            tier: template.tier,
            elite: template.elite,
            boss: template.boss,
            hp_range: template.hp_range,
        }
    }

    /// Draws a fresh target from the HP range with the same scaling as spawning,
    /// without the hard-number bias.
    pub fn reroll_target(
        &mut self,
        rng: &mut dyn RngSource,
        floor: u32,
        modifiers: &AscensionModifiers,
    ) -> f64 {
        let hp = f64::from(scaled_hp(self.hp_range, rng, floor, modifiers));
        self.hp = hp;
        self.max_hp = hp;
        hp
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Lowest and highest total of one retaliation.
    pub fn attack_range(&self) -> (u32, u32) {
        let count = self.attack_dice_count;
        (count, count * self.attack_die.sides())
    }
}

fn scaled_hp(
    (low, high): (u32, u32),
    rng: &mut dyn RngSource,
    floor: u32,
    modifiers: &AscensionModifiers,
) -> u32 {
    let base = rng.next_int(i64::from(low), i64::from(high)) as f64;
    let growth = GameConfig::HP_GROWTH_PER_FLOOR.powi(floor as i32);
    let mut hp = numbers::round_half_up(base * growth);
    if modifiers.monster_hp_multiplier != 1.0 {
        hp = numbers::round_half_up(hp * modifiers.monster_hp_multiplier);
    }
    (hp as u32).max(GameConfig::MIN_MONSTER_HP)
}

/// Biases a target toward primes and away from multiples of 2, 3 and 5.
fn harder_target(hp: u32, floor: u32, rng: &mut dyn RngSource) -> u32 {
    let difficulty = (f64::from(floor) / 15.0).min(1.0);
    let mut hp = hp;

    if rng.next_f64() < 0.3 + difficulty * 0.4 {
        let prime = numbers::nearest_prime(hp);
        if prime.abs_diff(hp) <= 5 {
            hp = prime;
        }
    }

    if rng.next_f64() < difficulty * 0.5 && (hp % 2 == 0 || hp % 3 == 0 || hp % 5 == 0) {
        hp += rng.next_int(1, 3) as u32;
    }

    if floor >= 8 && rng.next_f64() < 0.3 {
        let low = numbers::round_half_up(f64::from(hp) * 0.8) as u32;
        let high = numbers::round_half_up(f64::from(hp) * 1.3) as u32;
        let candidates: Vec<u32> = BIG_PRIMES
            .iter()
            .copied()
            .filter(|p| (low..=high).contains(p))
            .collect();
        if !candidates.is_empty() {
            hp = candidates[rng.next_index(candidates.len())];
        }
    }

    hp.max(GameConfig::MIN_MONSTER_HP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SeededRng;

    const SLIME: MonsterTemplate = MonsterTemplate {
        id: "slime",
        name: "Gel Cube",
        hp_range: (8, 16),
        attack_die: DieType::D4,
        attack_dice_count: 1,
        tier: 1,
        elite: false,
        boss: None,
    };

    #[test]
    fn floor_zero_hp_stays_in_range() {
        let mods = AscensionModifiers::default();
        for seed in 0..50 {
            let mut rng = SeededRng::new(seed);
            let monster = MonsterInstance::spawn(&SLIME, &mut rng, 0, &mods);
            assert!((8.0..=16.0).contains(&monster.hp));
            assert_eq!(monster.hp, monster.max_hp);
            assert_eq!(monster.attack_die, DieType::D4);
        }
    }

    #[test]
    fn attack_die_climbs_with_depth_and_caps_at_d12() {
        let mods = AscensionModifiers::default();
        let mut rng = SeededRng::new(1);
        assert_eq!(
            MonsterInstance::spawn(&SLIME, &mut rng, 4, &mods).attack_die,
            DieType::D6
        );
        assert_eq!(
            MonsterInstance::spawn(&SLIME, &mut rng, 40, &mods).attack_die,
            DieType::D12
        );
    }

    #[test]
    fn relentless_ascension_adds_an_attack_step() {
        let mods = AscensionModifiers::for_level(9, &GameConfig::default());
        let mut rng = SeededRng::new(1);
        let monster = MonsterInstance::spawn(&SLIME, &mut rng, 0, &mods);
        assert_eq!(monster.attack_die, DieType::D6);
    }

    #[test]
    fn deep_floors_keep_minimum_hp() {
        let mods = AscensionModifiers::default();
        for seed in 0..50 {
            let mut rng = SeededRng::new(seed);
            let monster = MonsterInstance::spawn(&SLIME, &mut rng, 9, &mods);
            assert!(monster.hp >= f64::from(GameConfig::MIN_MONSTER_HP));
        }
    }

    #[test]
    fn boss_abilities_round_before_checking() {
        assert!(BossAbility::PrimeOnly.allows(6.6));
        assert!(!BossAbility::PrimeOnly.allows(6.0));
        assert!(BossAbility::PalindromeOnly.allows(121.0));
        assert!(BossAbility::PerfectSquareOnly.allows(48.7));
        assert!(!BossAbility::PerfectSquareOnly.allows(50.0));
    }

    #[test]
    fn attack_range_spans_all_dice() {
        let mods = AscensionModifiers::default();
        let mut rng = SeededRng::new(2);
        let mut monster = MonsterInstance::spawn(&SLIME, &mut rng, 0, &mods);
        monster.attack_dice_count = 2;
        assert_eq!(monster.attack_range(), (2, 8));
    }

    #[test]
    fn reroll_target_scales_like_spawn() {
        let mods = AscensionModifiers::default();
        let mut rng = SeededRng::new(4);
        let mut monster = MonsterInstance::spawn(&SLIME, &mut rng, 0, &mods);
        let hp = monster.reroll_target(&mut rng, 2, &mods);
        assert_eq!(monster.hp, hp);
        assert!((10.0..=22.0).contains(&hp));
    }
}
