//! Event payloads for each topic.

use game_core::{
    BossAbility, CombatPhase, ConditionId, DieType, RelicId, TurnResolution,
};
use serde::{Deserialize, Serialize};

/// Encounter lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    Started(EncounterSummary),

    /// A submission was refused and nothing was consumed.
    Rejected {
        turn: u32,
        code: String,
        reason: String,
    },

    /// A submission resolved into a full turn.
    Resolved(Box<TurnResolution>),

    Rerolled { turn: u32, rerolls_left: u32 },

    BossTargetRerolled { target: f64 },

    /// The encounter reached victory or defeat.
    Ended { phase: CombatPhase, turns: u32 },

    /// The player walked away mid-encounter.
    Abandoned { turn: u32 },
}

/// Who the player is fighting and under which conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub floor: u32,
    pub act: u32,
    pub monster_id: String,
    pub monster_name: String,
    pub target: f64,
    pub attack_die: DieType,
    pub attack_dice_count: u32,
    pub elite: bool,
    pub boss: Option<BossAbility>,
    pub conditions: Vec<ConditionId>,
}

/// Changes to the player's persistent resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    HpChanged { hp: u32, max_hp: u32 },
    GoldChanged { gold: u32, delta: u32 },
    RelicGained { relic: RelicId },
    /// A one-shot relic was spent.
    RelicConsumed { relic: RelicId },
    FloorAdvanced { floor: u32, act: u32 },
}
