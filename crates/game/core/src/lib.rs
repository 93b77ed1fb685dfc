//! Deterministic combat rules shared across clients.
//!
//! `game-core` defines the canonical rules of a dice-and-operator dungeon
//! crawl: the expression engine and operator registry, dice, monsters,
//! encounter conditions, combo scoring, relics and the combat state machine.
//! It performs no I/O. All combat state changes flow through
//! [`combat::CombatEngine`], and every random draw comes from the encounter's
//! [`env::SeededRng`], so a seed and an action sequence fully determine a run.
pub mod ascension;
pub mod combat;
pub mod condition;
pub mod config;
pub mod dice;
pub mod env;
pub mod error;
pub mod expression;
pub mod monster;
pub mod numbers;
pub mod relic;
pub mod scoring;
pub mod state;

pub use ascension::{AscensionLevel, AscensionModifiers, MAX_ASCENSION};
pub use combat::{
    CombatEngine, CombatError, CombatPhase, CombatPreview, CombatSession, DamagePreview,
    Encounter, EvaluateError, TokenError, TurnResolution,
};
pub use condition::{
    ActiveConditions, BlockReason, ConditionCategory, ConditionId, ConditionViolation,
    DamageOutcome, DamageRules, OutcomeKind,
};
pub use config::GameConfig;
pub use dice::{DiceClass, Die, DieId, DieSpec, DieType};
pub use env::{MonsterOracle, RngSource, SeededRng};
pub use error::{ErrorSeverity, GameError};
pub use expression::{Evaluation, ExpressionError, OperatorId, Token};
pub use monster::{BossAbility, MonsterInstance, MonsterTemplate};
pub use relic::{HookPoints, RelicId, RelicPipeline, RelicRarity};
pub use scoring::{ComboId, ComboReport};
pub use state::{PlayerState, RunContext, RunState, RunStats, StateError};
