use super::RelicId;
use crate::GameConfig;
use crate::dice::{BONUS_DIE, Die, DieId};
use crate::env::RngSource;
use crate::numbers;
use crate::state::PlayerState;

/// Per-combat relic bookkeeping, reset when a combat starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelicMemo {
    /// Expressions evaluated so far this combat.
    pub evaluations: u32,
    pub rubber_shield_used: bool,
}

/// Player-state change requested while evaluating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerEffect {
    /// Restore HP, capped at max HP.
    Heal(u32),
    /// Raise max HP and current HP together.
    RaiseMaxHp(u32),
}

impl PlayerEffect {
    pub fn apply(self, player: &mut PlayerState) {
        match self {
            Self::Heal(amount) => player.heal(amount),
            Self::RaiseMaxHp(amount) => player.raise_max_hp(amount),
        }
    }
}

/// Read-only inputs to the evaluate hook.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluateContext {
    /// Expression result before any relic touched it.
    pub raw: f64,
    pub target: f64,
    /// Expressions evaluated earlier in this combat.
    pub evaluations: u32,
}

/// Values threaded through the evaluate hook.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluateMods {
    /// Value the damage calculation will see.
    pub effective_value: f64,
    /// Applied to `effective_value` once every relic has run.
    pub damage_multiplier: f64,
    /// Applied to the gold reward after combos.
    pub gold_multiplier: f64,
    /// Retaliation from an overkill is ignored.
    pub prevent_overkill_damage: bool,
    /// Value that overshot the target before a relic wrapped it below.
    pub wrapped_overkill: Option<f64>,
    pub effects: Vec<PlayerEffect>,
}

impl EvaluateMods {
    pub fn new(value: f64) -> Self {
        Self {
            effective_value: value,
            damage_multiplier: 1.0,
            gold_multiplier: 1.0,
            prevent_overkill_damage: false,
            wrapped_overkill: None,
            effects: Vec::new(),
        }
    }
}

/// Inputs to the gold hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoldContext {
    pub combos: usize,
    pub exact: bool,
}

/// Behaviour of one relic at each hook point. Every hook defaults to a no-op.
pub trait RelicBehavior: Sync {
    fn on_pickup(&self, _player: &mut PlayerState) {}

    fn on_combat_start(&self, _dice: &mut Vec<Die>, _rerolls: &mut u32, _rng: &mut dyn RngSource) {
    }

    fn on_roll(&self, _die: &mut Die, _rng: &mut dyn RngSource) {}

    fn on_evaluate(&self, _ctx: &EvaluateContext, _mods: &mut EvaluateMods) {}

    fn on_take_damage(&self, damage: u32, _memo: &mut RelicMemo) -> u32 {
        damage
    }

    /// HP to survive a killing blow with, if this relic prevents death.
    fn on_lethal_check(&self) -> Option<u32> {
        None
    }

    fn on_gold_gain(&self, gold: u32, _ctx: &GoldContext) -> u32 {
        gold
    }

    fn on_combat_end(&self, _victory: bool, _player: &mut PlayerState) {}

    fn on_reroll(&self, _player: &mut PlayerState) {}

    /// Times each operator card may be placed in one expression.
    fn operator_card_uses(&self) -> usize {
        1
    }
}

struct LoadedDice;
struct IronSkin;
struct GoldMagnet;
struct LuckyCoin;
struct MagnifyingGlass;
struct MirrorShard;
struct ModularRing;
struct ThickSkin;
struct DecimalLens;
struct BerserkerMark;
struct ComboCrown;
struct PhoenixFeather;
struct ExtraHand;
struct SharpenedMind;
struct AlchemistFlask;
struct ChaosOrb;
struct LuckyDice;
struct Recycler;
struct HeadStart;
struct DoubleOrNothing;
struct EchoChamber;
struct RubberShield;
struct GoldenRatio;
struct GlassCannon;
struct SecondWind;
struct Perfectionist;

/// Behaviour implementation for `id`.
pub fn behavior(id: RelicId) -> &'static dyn RelicBehavior {
    match id {
        RelicId::LoadedDice => &LoadedDice,
        RelicId::IronSkin => &IronSkin,
        RelicId::GoldMagnet => &GoldMagnet,
        RelicId::LuckyCoin => &LuckyCoin,
        RelicId::MagnifyingGlass => &MagnifyingGlass,
        RelicId::MirrorShard => &MirrorShard,
        RelicId::ModularRing => &ModularRing,
        RelicId::ThickSkin => &ThickSkin,
        RelicId::DecimalLens => &DecimalLens,
        RelicId::BerserkerMark => &BerserkerMark,
        RelicId::ComboCrown => &ComboCrown,
        RelicId::PhoenixFeather => &PhoenixFeather,
        RelicId::ExtraHand => &ExtraHand,
        RelicId::SharpenedMind => &SharpenedMind,
        RelicId::AlchemistFlask => &AlchemistFlask,
        RelicId::ChaosOrb => &ChaosOrb,
        RelicId::LuckyDice => &LuckyDice,
        RelicId::Recycler => &Recycler,
        RelicId::HeadStart => &HeadStart,
        RelicId::DoubleOrNothing => &DoubleOrNothing,
        RelicId::EchoChamber => &EchoChamber,
        RelicId::RubberShield => &RubberShield,
        RelicId::GoldenRatio => &GoldenRatio,
        RelicId::GlassCannon => &GlassCannon,
        RelicId::SecondWind => &SecondWind,
        RelicId::Perfectionist => &Perfectionist,
    }
}

fn next_die_id(dice: &[Die]) -> DieId {
    DieId(dice.iter().map(|d| d.id.0 + 1).max().unwrap_or(0))
}

// ===== pickup =====

impl RelicBehavior for LoadedDice {
    fn on_pickup(&self, player: &mut PlayerState) {
        player.rerolls_per_turn += 1;
    }
}

impl RelicBehavior for IronSkin {
    fn on_pickup(&self, player: &mut PlayerState) {
        player.raise_max_hp(15);
    }
}

impl RelicBehavior for GlassCannon {
    fn on_pickup(&self, player: &mut PlayerState) {
        player.max_hp = player.max_hp.saturating_sub(20).max(20);
        player.hp = player.hp.min(player.max_hp);
    }

    fn on_evaluate(&self, _ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        mods.damage_multiplier *= 1.5;
    }
}

// ===== combat start =====

impl RelicBehavior for LuckyCoin {
    fn on_combat_start(&self, _dice: &mut Vec<Die>, rerolls: &mut u32, _rng: &mut dyn RngSource) {
        *rerolls += 1;
    }
}

impl RelicBehavior for MirrorShard {
    fn on_combat_start(&self, dice: &mut Vec<Die>, _rerolls: &mut u32, rng: &mut dyn RngSource) {
        if dice.is_empty() {
            return;
        }
        let source = dice[rng.next_index(dice.len())].clone();
        let id = next_die_id(dice);
        dice.push(Die {
            id,
            held: false,
            ..source
        });
    }
}

impl RelicBehavior for ExtraHand {
    fn on_combat_start(&self, dice: &mut Vec<Die>, _rerolls: &mut u32, rng: &mut dyn RngSource) {
        let id = next_die_id(dice);
        let mut die = Die::blank(id, BONUS_DIE);
        die.value = Some(rng.next_int(1, i64::from(BONUS_DIE.die_type.sides())) as u32);
        dice.push(die);
    }
}

// ===== roll =====

impl RelicBehavior for ChaosOrb {
    fn on_roll(&self, die: &mut Die, _rng: &mut dyn RngSource) {
        if let Some(value) = die.value {
            die.value = Some((value + 1).min(die.spec.max_face()));
        }
    }
}

impl RelicBehavior for LuckyDice {
    fn on_roll(&self, die: &mut Die, rng: &mut dyn RngSource) {
        if let Some(value) = die.value {
            die.value = Some(value.max(die.spec.roll(rng)));
        }
    }
}

// ===== evaluate =====

impl RelicBehavior for MagnifyingGlass {
    fn on_evaluate(&self, ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        if numbers::is_prime(numbers::round_half_up(ctx.raw).abs()) {
            mods.gold_multiplier *= 1.5;
        }
    }
}

impl RelicBehavior for ModularRing {
    fn on_evaluate(&self, ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        if mods.effective_value > ctx.target && ctx.target > 0.0 {
            let wrapped = mods.effective_value % ctx.target;
            mods.wrapped_overkill.get_or_insert(mods.effective_value);
            mods.effective_value = if wrapped == 0.0 { ctx.target } else { wrapped };
            mods.prevent_overkill_damage = true;
        }
    }
}

impl RelicBehavior for BerserkerMark {
    fn on_evaluate(&self, _ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        mods.prevent_overkill_damage = true;
        mods.damage_multiplier *= 0.8;
    }
}

impl RelicBehavior for DecimalLens {
    fn on_evaluate(&self, _ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        mods.effective_value = numbers::round_half_up(mods.effective_value);
    }
}

impl RelicBehavior for HeadStart {
    fn on_evaluate(&self, ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        if ctx.evaluations == 0 {
            mods.effective_value += 5.0;
        }
    }
}

impl RelicBehavior for GoldenRatio {
    fn on_evaluate(&self, ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        if numbers::is_fibonacci(numbers::round_half_up(ctx.raw).abs()) {
            mods.effects.push(PlayerEffect::Heal(3));
        }
    }
}

impl RelicBehavior for Perfectionist {
    fn on_evaluate(&self, ctx: &EvaluateContext, mods: &mut EvaluateMods) {
        if (mods.effective_value - ctx.target).abs() < GameConfig::EXACT_TOLERANCE {
            mods.effects.push(PlayerEffect::RaiseMaxHp(2));
        }
    }
}

// ===== take damage / lethal =====

impl RelicBehavior for ThickSkin {
    fn on_take_damage(&self, damage: u32, _memo: &mut RelicMemo) -> u32 {
        damage.saturating_sub(2)
    }
}

impl RelicBehavior for RubberShield {
    fn on_take_damage(&self, damage: u32, memo: &mut RelicMemo) -> u32 {
        if memo.rubber_shield_used {
            return damage;
        }
        memo.rubber_shield_used = true;
        0
    }
}

impl RelicBehavior for PhoenixFeather {
    fn on_lethal_check(&self) -> Option<u32> {
        Some(1)
    }
}

// ===== gold =====

impl RelicBehavior for GoldMagnet {
    fn on_gold_gain(&self, gold: u32, _ctx: &GoldContext) -> u32 {
        (f64::from(gold) * 1.25).floor() as u32
    }
}

impl RelicBehavior for ComboCrown {
    fn on_gold_gain(&self, gold: u32, ctx: &GoldContext) -> u32 {
        gold + 5 * ctx.combos as u32
    }
}

impl RelicBehavior for SharpenedMind {
    fn on_gold_gain(&self, gold: u32, ctx: &GoldContext) -> u32 {
        if ctx.exact {
            (f64::from(gold) * 1.5).floor() as u32
        } else {
            gold
        }
    }
}

impl RelicBehavior for EchoChamber {
    fn on_gold_gain(&self, gold: u32, ctx: &GoldContext) -> u32 {
        if ctx.combos > 0 { gold * 2 } else { gold }
    }
}

impl RelicBehavior for DoubleOrNothing {
    fn on_take_damage(&self, damage: u32, _memo: &mut RelicMemo) -> u32 {
        damage * 2
    }

    fn on_gold_gain(&self, gold: u32, ctx: &GoldContext) -> u32 {
        if ctx.exact { gold * 3 } else { gold }
    }
}

// ===== combat end / reroll / passive =====

impl RelicBehavior for AlchemistFlask {
    fn on_combat_end(&self, victory: bool, player: &mut PlayerState) {
        if victory {
            player.heal(3);
        }
    }
}

impl RelicBehavior for SecondWind {
    fn on_reroll(&self, player: &mut PlayerState) {
        player.heal(1);
    }
}

impl RelicBehavior for Recycler {
    fn operator_card_uses(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DiceClass, DieSpec, DieType};
    use crate::env::SeededRng;

    fn rolled(id: u32, value: u32) -> Die {
        let mut die = Die::blank(DieId(id), DieSpec::standard(DieType::D6));
        die.value = Some(value);
        die
    }

    fn evaluate(id: RelicId, raw: f64, target: f64, evaluations: u32) -> EvaluateMods {
        let mut mods = EvaluateMods::new(raw);
        let ctx = EvaluateContext {
            raw,
            target,
            evaluations,
        };
        behavior(id).on_evaluate(&ctx, &mut mods);
        mods
    }

    #[test]
    fn chaos_orb_caps_at_the_highest_face() {
        let mut rng = SeededRng::new(1);
        let mut die = rolled(0, 6);
        behavior(RelicId::ChaosOrb).on_roll(&mut die, &mut rng);
        assert_eq!(die.value, Some(6));

        let mut square = Die::blank(DieId(1), DieSpec::new(DieType::D4, DiceClass::Square));
        square.value = Some(9);
        behavior(RelicId::ChaosOrb).on_roll(&mut square, &mut rng);
        assert_eq!(square.value, Some(10));
    }

    #[test]
    fn lucky_dice_never_lowers_a_roll() {
        for seed in 0..50 {
            let mut rng = SeededRng::new(seed);
            let mut die = rolled(0, 4);
            behavior(RelicId::LuckyDice).on_roll(&mut die, &mut rng);
            assert!(die.value >= Some(4));
        }
    }

    #[test]
    fn combat_start_relics_extend_the_tray() {
        let mut rng = SeededRng::new(3);
        let mut dice = vec![rolled(0, 2), rolled(1, 5)];
        let mut rerolls = 1;
        behavior(RelicId::MirrorShard).on_combat_start(&mut dice, &mut rerolls, &mut rng);
        behavior(RelicId::ExtraHand).on_combat_start(&mut dice, &mut rerolls, &mut rng);
        behavior(RelicId::LuckyCoin).on_combat_start(&mut dice, &mut rerolls, &mut rng);

        assert_eq!(dice.len(), 4);
        assert_eq!(dice[2].id, DieId(2));
        assert!(matches!(dice[2].value, Some(2) | Some(5)));
        assert_eq!(dice[3].id, DieId(3));
        assert!((1..=6).contains(&dice[3].value.unwrap_or(0)));
        assert_eq!(rerolls, 2);
    }

    #[test]
    fn modular_ring_wraps_overkill() {
        let mods = evaluate(RelicId::ModularRing, 23.0, 10.0, 1);
        assert_eq!(mods.effective_value, 3.0);
        assert_eq!(mods.wrapped_overkill, Some(23.0));
        assert!(mods.prevent_overkill_damage);

        let mods = evaluate(RelicId::ModularRing, 20.0, 10.0, 1);
        assert_eq!(mods.effective_value, 10.0);

        let mods = evaluate(RelicId::ModularRing, 8.0, 10.0, 1);
        assert_eq!(mods.effective_value, 8.0);
        assert_eq!(mods.wrapped_overkill, None);
        assert!(!mods.prevent_overkill_damage);
    }

    #[test]
    fn head_start_only_boosts_the_first_evaluation() {
        assert_eq!(evaluate(RelicId::HeadStart, 10.0, 20.0, 0).effective_value, 15.0);
        assert_eq!(evaluate(RelicId::HeadStart, 10.0, 20.0, 1).effective_value, 10.0);
    }

    #[test]
    fn evaluate_effects_are_deferred() {
        let mods = evaluate(RelicId::GoldenRatio, 13.0, 40.0, 0);
        assert_eq!(mods.effects, vec![PlayerEffect::Heal(3)]);
        let mods = evaluate(RelicId::Perfectionist, 40.0, 40.0, 0);
        assert_eq!(mods.effects, vec![PlayerEffect::RaiseMaxHp(2)]);
        let mods = evaluate(RelicId::MagnifyingGlass, 6.6, 40.0, 0);
        assert_eq!(mods.gold_multiplier, 1.5);
    }

    #[test]
    fn rubber_shield_absorbs_one_hit_per_combat() {
        let shield = behavior(RelicId::RubberShield);
        let mut memo = RelicMemo::default();
        assert_eq!(shield.on_take_damage(7, &mut memo), 0);
        assert_eq!(shield.on_take_damage(7, &mut memo), 7);
    }

    #[test]
    fn gold_relics() {
        let ctx = GoldContext {
            combos: 2,
            exact: true,
        };
        assert_eq!(behavior(RelicId::GoldMagnet).on_gold_gain(10, &ctx), 12);
        assert_eq!(behavior(RelicId::ComboCrown).on_gold_gain(10, &ctx), 20);
        assert_eq!(behavior(RelicId::SharpenedMind).on_gold_gain(11, &ctx), 16);
        assert_eq!(behavior(RelicId::EchoChamber).on_gold_gain(10, &ctx), 20);
        assert_eq!(behavior(RelicId::DoubleOrNothing).on_gold_gain(10, &ctx), 30);
    }

    #[test]
    fn only_recycler_doubles_card_uses() {
        use strum::IntoEnumIterator;
        for id in RelicId::iter() {
            let expected = if id == RelicId::Recycler { 2 } else { 1 };
            assert_eq!(behavior(id).operator_card_uses(), expected);
        }
    }
}
