use super::StateError;
use crate::dice::DieSpec;
use crate::expression::OperatorId;
use crate::relic::{self, RelicId};

/// The player's persistent resources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub hp: u32,
    pub max_hp: u32,
    pub gold: u32,
    pub rerolls_per_turn: u32,
    pub dice_pool: Vec<DieSpec>,
    pub operator_hand: Vec<OperatorId>,
    /// Owned relics in acquisition order.
    pub relics: Vec<RelicId>,
}

impl PlayerState {
    pub fn new(
        hp: u32,
        gold: u32,
        rerolls_per_turn: u32,
        dice_pool: Vec<DieSpec>,
        operator_hand: Vec<OperatorId>,
    ) -> Self {
        Self {
            hp,
            max_hp: hp,
            gold,
            rerolls_per_turn,
            dice_pool,
            operator_hand,
            relics: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Restores HP without exceeding max HP.
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Raises max HP and current HP by the same amount.
    pub fn raise_max_hp(&mut self, amount: u32) {
        self.max_hp = self.max_hp.saturating_add(amount);
        self.hp = self.hp.saturating_add(amount);
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn has_relic(&self, id: RelicId) -> bool {
        self.relics.contains(&id)
    }

    /// Adds a relic and applies its pickup effect.
    pub fn add_relic(&mut self, id: RelicId) -> Result<(), StateError> {
        if self.has_relic(id) {
            return Err(StateError::DuplicateRelic(id));
        }
        self.relics.push(id);
        if id.hooks().contains(relic::HookPoints::PICKUP) {
            relic::behavior(id).on_pickup(self);
        }
        Ok(())
    }

    /// Removes a relic, returning whether it was owned.
    pub fn remove_relic(&mut self, id: RelicId) -> bool {
        let before = self.relics.len();
        self.relics.retain(|r| *r != id);
        self.relics.len() != before
    }
}
