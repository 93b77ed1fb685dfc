use super::CombatPhase;
use crate::GameConfig;
use crate::condition::DamageOutcome;
use crate::dice::DieType;
use crate::relic::RelicId;
use crate::scoring::ComboReport;

/// Everything that happened in one resolved turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnResolution {
    pub turn: u32,
    /// Expression result as evaluated.
    pub raw_value: f64,
    /// Value after relic adjustments, used for damage.
    pub value: f64,
    pub target: f64,
    pub outcome: DamageOutcome,
    pub combos: ComboReport,
    pub attack_die: DieType,
    pub attack_rolls: Vec<u32>,
    /// Damage taken after relic reductions.
    pub damage_taken: u32,
    pub gold_earned: u32,
    pub monster_hp: f64,
    pub player_hp: u32,
    pub monster_dead: bool,
    pub player_dead: bool,
    /// Relic that kept the player alive, if one fired.
    pub rescued_by: Option<RelicId>,
    pub phase: CombatPhase,
}

/// Inputs to the victory gold formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GoldInputs {
    pub monster_dead: bool,
    pub elite: bool,
    pub exact: bool,
    pub floor: u32,
    pub target: f64,
    pub ascension_multiplier: f64,
    pub combo_multiplier: f64,
    pub relic_multiplier: f64,
}

/// Gold before the relic gold hook.
///
/// A kill pays the elite or regular base plus two per floor; an exact hit adds
/// half the target plus ten, kill or not. Each multiplier is applied in turn
/// and floored.
pub(crate) fn base_gold(config: &GameConfig, inputs: &GoldInputs) -> u32 {
    let mut gold = 0.0;
    if inputs.monster_dead {
        let base = if inputs.elite {
            config.elite_gold
        } else {
            config.base_gold
        };
        gold += f64::from(base) + f64::from(inputs.floor * 2);
    }
    if inputs.exact {
        gold += (inputs.target / 2.0).floor() + 10.0;
    }
    for multiplier in [
        inputs.ascension_multiplier,
        inputs.combo_multiplier,
        inputs.relic_multiplier,
    ] {
        if multiplier != 1.0 {
            gold = (gold * multiplier).floor();
        }
    }
    gold.max(0.0) as u32
}
