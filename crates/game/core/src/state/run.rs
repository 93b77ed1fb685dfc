use super::{PlayerState, StateError};
use crate::GameConfig;
use crate::ascension::AscensionModifiers;
use crate::dice::DieSpec;
use crate::expression::OperatorId;

/// Counters accumulated over one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStats {
    pub turns_played: u32,
    pub monsters_killed: u32,
    pub exact_hits: u32,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub total_combos_triggered: u32,
    pub best_combo_multiplier: f64,
    pub gold_earned: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            turns_played: 0,
            monsters_killed: 0,
            exact_hits: 0,
            total_damage_dealt: 0,
            total_damage_taken: 0,
            total_combos_triggered: 0,
            best_combo_multiplier: 1.0,
            gold_earned: 0,
        }
    }
}

/// Where the run is and how hard it is.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunState {
    pub seed: u32,
    pub floor: u32,
    /// 1-based act; each act ends with a boss.
    pub act: u32,
    pub modifiers: AscensionModifiers,
    pub stats: RunStats,
}

impl RunState {
    pub const FLOORS_PER_ACT: u32 = 10;

    pub fn new(seed: u32, modifiers: AscensionModifiers) -> Self {
        Self {
            seed,
            floor: 0,
            act: 1,
            modifiers,
            stats: RunStats::default(),
        }
    }

    pub fn ascension(&self) -> u8 {
        self.modifiers.level
    }

    /// Moves to the next floor, entering a new act every ten floors.
    pub fn advance_floor(&mut self) {
        self.floor += 1;
        self.act = self.floor / Self::FLOORS_PER_ACT + 1;
    }
}

/// Everything a combat reads and writes outside its own session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunContext {
    pub player: PlayerState,
    pub run: RunState,
}

impl RunContext {
    /// Starts a run with ascension adjustments applied to the player.
    ///
    /// The final-challenge penalty removes the last die only while the pool
    /// holds more than three dice.
    pub fn new_run(
        seed: u32,
        mut dice_pool: Vec<DieSpec>,
        operator_hand: Vec<OperatorId>,
        ascension: u8,
        config: &GameConfig,
    ) -> Result<Self, StateError> {
        if dice_pool.is_empty() {
            return Err(StateError::EmptyDicePool);
        }
        let modifiers = AscensionModifiers::for_level(ascension, config);
        for _ in 0..modifiers.starting_dice_penalty {
            if dice_pool.len() >= AscensionModifiers::MIN_POOL_FOR_PENALTY {
                dice_pool.pop();
            }
        }

        let player = PlayerState::new(
            modifiers.starting_hp,
            modifiers.starting_gold,
            config.rerolls_per_turn,
            dice_pool,
            operator_hand,
        );
        Ok(Self {
            player,
            run: RunState::new(seed, modifiers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DieType;

    fn pool(n: usize) -> Vec<DieSpec> {
        vec![DieSpec::standard(DieType::D6); n]
    }

    #[test]
    fn fresh_run_uses_config_defaults() {
        let ctx = RunContext::new_run(7, pool(5), vec![], 0, &GameConfig::default()).unwrap();
        assert_eq!(ctx.player.hp, 80);
        assert_eq!(ctx.player.max_hp, 80);
        assert_eq!(ctx.player.gold, 50);
        assert_eq!(ctx.player.rerolls_per_turn, 1);
        assert_eq!(ctx.player.dice_pool.len(), 5);
        assert_eq!((ctx.run.floor, ctx.run.act), (0, 1));
        assert_eq!(ctx.run.stats.best_combo_multiplier, 1.0);
    }

    #[test]
    fn top_ascension_trims_large_pools_only() {
        let config = GameConfig::default();
        let ctx = RunContext::new_run(7, pool(5), vec![], 10, &config).unwrap();
        assert_eq!(ctx.player.dice_pool.len(), 4);
        assert_eq!(ctx.player.hp, 60);
        assert_eq!(ctx.player.gold, 25);

        let small = RunContext::new_run(7, pool(3), vec![], 10, &config).unwrap();
        assert_eq!(small.player.dice_pool.len(), 3);
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert_eq!(
            RunContext::new_run(1, vec![], vec![], 0, &GameConfig::default()),
            Err(StateError::EmptyDicePool)
        );
    }

    #[test]
    fn acts_change_every_ten_floors() {
        let mut run = RunState::new(1, AscensionModifiers::default());
        for _ in 0..10 {
            run.advance_floor();
        }
        assert_eq!((run.floor, run.act), (10, 2));
    }
}
