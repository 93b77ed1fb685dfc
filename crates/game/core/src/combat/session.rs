use super::TurnResolution;
use crate::condition::ActiveConditions;
use crate::dice::{Die, DieId};
use crate::env::SeededRng;
use crate::expression::Token;
use crate::monster::MonsterInstance;
use crate::relic::RelicMemo;

/// Where an encounter stands.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatPhase {
    /// The player is assembling an expression.
    Building,
    Victory,
    Defeat,
}

impl CombatPhase {
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Building)
    }
}

/// State of one encounter.
///
/// The session owns the encounter's RNG, so every draw after
/// [`CombatEngine::start`](super::CombatEngine::start) comes from the same
/// stream. Replaying the same actions against the same seed yields an equal
/// session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub monster: MonsterInstance,
    pub dice: Vec<Die>,
    pub conditions: ActiveConditions,
    /// 1-based turn counter.
    pub turn: u32,
    pub rerolls_left: u32,
    pub phase: CombatPhase,
    pub expression: Vec<Token>,
    pub log: Vec<String>,
    pub last_resolution: Option<TurnResolution>,
    pub boss_reroll_used: bool,
    pub(crate) rng: SeededRng,
    pub(crate) memo: RelicMemo,
}

impl CombatSession {
    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.dice.iter().find(|d| d.id == id)
    }

    /// Whether a token for `id` is already in the expression.
    pub fn is_placed(&self, id: DieId) -> bool {
        self.expression.iter().any(|t| t.die_id() == Some(id))
    }

    /// Times the card at `hand_index` appears in the expression.
    pub fn card_uses(&self, hand_index: usize) -> usize {
        self.expression
            .iter()
            .filter(|t| matches!(t, Token::Operator(op) if op.hand_index == Some(hand_index)))
            .count()
    }

    /// SHA-256 over the bincode encoding of the session.
    ///
    /// Two sessions driven by the same seed and the same actions have the same
    /// digest.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}
