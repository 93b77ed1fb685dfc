use super::{
    EvaluateContext, EvaluateMods, GoldContext, HookPoints, PlayerEffect, RelicId, RelicMemo,
    behavior,
};
use crate::dice::{Die, DieId};
use crate::env::RngSource;
use crate::numbers;
use crate::state::PlayerState;

/// Result of the evaluate hook once the damage multiplier is folded in.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluateOutcome {
    pub effective_value: f64,
    pub gold_multiplier: f64,
    pub prevent_overkill_damage: bool,
    /// Set when the value was wrapped below the target; the turn still
    /// resolves as an overkill of this value.
    pub wrapped_overkill: Option<f64>,
    pub effects: Vec<PlayerEffect>,
}

/// A consumable relic that turned a killing blow into survival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LethalRescue {
    pub relic: RelicId,
    pub hp: u32,
}

impl LethalRescue {
    pub fn message(&self) -> String {
        format!("{} saves you from death!", self.relic.name())
    }
}

/// Applies relic hooks in acquisition order.
///
/// Relics are independent but not commutative (flat reduction followed by
/// doubling differs from the reverse), so the order of `relics` is the order
/// of application. Relics whose [`HookPoints`] lack the hook are skipped.
#[derive(Clone, Copy, Debug)]
pub struct RelicPipeline<'a> {
    relics: &'a [RelicId],
}

impl<'a> RelicPipeline<'a> {
    pub fn new(relics: &'a [RelicId]) -> Self {
        Self { relics }
    }

    fn with(self, hook: HookPoints) -> impl Iterator<Item = RelicId> + 'a {
        self.relics
            .iter()
            .copied()
            .filter(move |id| id.hooks().contains(hook))
    }

    /// Extra dice and rerolls granted when the tray is rolled for a turn.
    pub fn on_combat_start(&self, dice: &mut Vec<Die>, rerolls: &mut u32, rng: &mut dyn RngSource) {
        for id in self.with(HookPoints::COMBAT_START) {
            behavior(id).on_combat_start(dice, rerolls, rng);
        }
    }

    /// Adjusts freshly rolled dice. Dice not listed in `rolled` are untouched.
    pub fn on_roll(&self, dice: &mut [Die], rolled: &[DieId], rng: &mut dyn RngSource) {
        for id in self.with(HookPoints::ROLL) {
            let relic = behavior(id);
            for die in dice.iter_mut().filter(|d| rolled.contains(&d.id)) {
                relic.on_roll(die, rng);
            }
        }
    }

    /// Runs the evaluate hook and applies the accumulated damage multiplier.
    ///
    /// The effective value is rounded only when a multiplier other than 1
    /// applies, so fractional targets stay reachable.
    pub fn on_evaluate(&self, ctx: &EvaluateContext, memo: &mut RelicMemo) -> EvaluateOutcome {
        let mut mods = EvaluateMods::new(ctx.raw);
        for id in self.with(HookPoints::EVALUATE) {
            behavior(id).on_evaluate(ctx, &mut mods);
        }
        memo.evaluations += 1;

        let effective_value = if mods.damage_multiplier == 1.0 {
            mods.effective_value
        } else {
            numbers::round_half_up(mods.effective_value * mods.damage_multiplier)
        };
        EvaluateOutcome {
            effective_value,
            gold_multiplier: mods.gold_multiplier,
            prevent_overkill_damage: mods.prevent_overkill_damage,
            wrapped_overkill: mods.wrapped_overkill,
            effects: mods.effects,
        }
    }

    pub fn on_take_damage(&self, damage: u32, memo: &mut RelicMemo) -> u32 {
        self.with(HookPoints::TAKE_DAMAGE)
            .fold(damage, |acc, id| behavior(id).on_take_damage(acc, memo))
    }

    /// First relic that can rescue the player from a killing blow.
    pub fn lethal_rescue(&self) -> Option<LethalRescue> {
        self.with(HookPoints::LETHAL_CHECK).find_map(|id| {
            behavior(id)
                .on_lethal_check()
                .map(|hp| LethalRescue { relic: id, hp })
        })
    }

    pub fn on_gold_gain(&self, gold: u32, ctx: &GoldContext) -> u32 {
        self.with(HookPoints::GOLD_GAIN)
            .fold(gold, |acc, id| behavior(id).on_gold_gain(acc, ctx))
    }

    /// Times each operator card may appear in one expression.
    pub fn operator_card_uses(&self) -> usize {
        self.with(HookPoints::PASSIVE)
            .map(|id| behavior(id).operator_card_uses())
            .max()
            .unwrap_or(1)
    }
}

/// Hooks that write player state directly.
///
/// These borrow the player mutably, so the relic list is copied first.
impl RelicPipeline<'_> {
    pub fn on_combat_end(player: &mut PlayerState, victory: bool) {
        for id in owned_with(player, HookPoints::COMBAT_END) {
            behavior(id).on_combat_end(victory, player);
        }
    }

    pub fn on_reroll(player: &mut PlayerState) {
        for id in owned_with(player, HookPoints::REROLL) {
            behavior(id).on_reroll(player);
        }
    }

    /// Applies a lethal rescue: HP is set and consumable relics are removed.
    pub fn apply_rescue(player: &mut PlayerState, rescue: &LethalRescue) {
        player.hp = rescue.hp;
        if rescue.relic.definition().consumable {
            player.remove_relic(rescue.relic);
        }
    }
}

fn owned_with(player: &PlayerState, hook: HookPoints) -> Vec<RelicId> {
    player
        .relics
        .iter()
        .copied()
        .filter(|id| id.hooks().contains(hook))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DieSpec, DieType};
    use crate::env::SeededRng;
    use crate::expression::OperatorId;

    fn player_with(relics: &[RelicId]) -> PlayerState {
        let mut player = PlayerState::new(
            40,
            0,
            1,
            vec![DieSpec::standard(DieType::D6)],
            vec![OperatorId::Add],
        );
        player.relics = relics.to_vec();
        player
    }

    #[test]
    fn damage_relics_apply_in_acquisition_order() {
        let mut memo = RelicMemo::default();
        let reduce_then_double = [RelicId::ThickSkin, RelicId::DoubleOrNothing];
        let double_then_reduce = [RelicId::DoubleOrNothing, RelicId::ThickSkin];
        assert_eq!(
            RelicPipeline::new(&reduce_then_double).on_take_damage(5, &mut memo),
            6
        );
        assert_eq!(
            RelicPipeline::new(&double_then_reduce).on_take_damage(5, &mut memo),
            8
        );
    }

    #[test]
    fn multiplier_rounds_the_effective_value() {
        let relics = [RelicId::GlassCannon];
        let mut memo = RelicMemo::default();
        let ctx = EvaluateContext {
            raw: 7.0,
            target: 20.0,
            evaluations: 0,
        };
        let outcome = RelicPipeline::new(&relics).on_evaluate(&ctx, &mut memo);
        assert_eq!(outcome.effective_value, 11.0);
        assert_eq!(memo.evaluations, 1);
    }

    #[test]
    fn no_relics_keep_fractional_values() {
        let mut memo = RelicMemo::default();
        let ctx = EvaluateContext {
            raw: 12.5,
            target: 12.5,
            evaluations: 0,
        };
        let outcome = RelicPipeline::new(&[]).on_evaluate(&ctx, &mut memo);
        assert_eq!(outcome.effective_value, 12.5);
        assert_eq!(outcome.gold_multiplier, 1.0);
        assert!(!outcome.prevent_overkill_damage);
    }

    #[test]
    fn roll_hook_only_touches_rerolled_dice() {
        let relics = [RelicId::ChaosOrb];
        let mut rng = SeededRng::new(5);
        let mut dice: Vec<Die> = (0..2)
            .map(|i| {
                let mut die = Die::blank(DieId(i), DieSpec::standard(DieType::D6));
                die.value = Some(3);
                die
            })
            .collect();
        RelicPipeline::new(&relics).on_roll(&mut dice, &[DieId(1)], &mut rng);
        assert_eq!(dice[0].value, Some(3));
        assert_eq!(dice[1].value, Some(4));
    }

    #[test]
    fn phoenix_feather_is_consumed() {
        let mut player = player_with(&[RelicId::ThickSkin, RelicId::PhoenixFeather]);
        player.hp = 0;
        let rescue = RelicPipeline::new(&player.relics).lethal_rescue().unwrap();
        assert_eq!(rescue.message(), "Phoenix Feather saves you from death!");
        RelicPipeline::apply_rescue(&mut player, &rescue);
        assert_eq!(player.hp, 1);
        assert_eq!(player.relics, vec![RelicId::ThickSkin]);
        assert!(RelicPipeline::new(&player.relics).lethal_rescue().is_none());
    }

    #[test]
    fn player_hooks_heal() {
        let mut player = player_with(&[RelicId::AlchemistFlask, RelicId::SecondWind]);
        player.hp = 30;
        RelicPipeline::on_combat_end(&mut player, false);
        assert_eq!(player.hp, 30);
        RelicPipeline::on_combat_end(&mut player, true);
        assert_eq!(player.hp, 33);
        RelicPipeline::on_reroll(&mut player);
        assert_eq!(player.hp, 34);
    }

    #[test]
    fn gold_hooks_chain() {
        let relics = [RelicId::GoldMagnet, RelicId::ComboCrown];
        let ctx = GoldContext {
            combos: 1,
            exact: false,
        };
        assert_eq!(RelicPipeline::new(&relics).on_gold_gain(20, &ctx), 30);
        assert_eq!(RelicPipeline::new(&[RelicId::Recycler]).operator_card_uses(), 2);
        assert_eq!(RelicPipeline::new(&[]).operator_card_uses(), 1);
    }
}
