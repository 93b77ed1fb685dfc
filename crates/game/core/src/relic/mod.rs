//! Relic catalog and the hook pipeline that applies relic effects.
//!
//! A relic is identified by [`RelicId`]; its static data lives in
//! [`RelicDef`] and its behaviour in a [`RelicBehavior`] implementation that
//! overrides only the hooks it cares about. [`RelicPipeline`] walks the
//! player's relics in acquisition order at each hook point.
mod behavior;
mod pipeline;

pub use behavior::{
    EvaluateContext, EvaluateMods, GoldContext, PlayerEffect, RelicBehavior, RelicMemo, behavior,
};
pub use pipeline::{EvaluateOutcome, LethalRescue, RelicPipeline};

use bitflags::bitflags;

bitflags! {
    /// Extension points a relic participates in.
    ///
    /// The pipeline skips relics whose flags do not include the hook being run.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HookPoints: u16 {
        const PICKUP       = 1 << 0;
        const COMBAT_START = 1 << 1;
        const ROLL         = 1 << 2;
        const EVALUATE     = 1 << 3;
        const TAKE_DAMAGE  = 1 << 4;
        const LETHAL_CHECK = 1 << 5;
        const GOLD_GAIN    = 1 << 6;
        const COMBAT_END   = 1 << 7;
        const REROLL       = 1 << 8;
        /// Always-on rule change read directly by the engine.
        const PASSIVE      = 1 << 9;
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RelicRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl RelicRarity {
    /// First floor on which relics of this rarity can be offered.
    pub const fn min_floor(self) -> u32 {
        match self {
            Self::Common => 0,
            Self::Uncommon => 2,
            Self::Rare => 5,
            Self::Legendary => 8,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RelicId {
    LoadedDice,
    IronSkin,
    GoldMagnet,
    LuckyCoin,
    MagnifyingGlass,
    MirrorShard,
    ModularRing,
    ThickSkin,
    DecimalLens,
    BerserkerMark,
    ComboCrown,
    PhoenixFeather,
    ExtraHand,
    SharpenedMind,
    AlchemistFlask,
    ChaosOrb,
    LuckyDice,
    Recycler,
    HeadStart,
    DoubleOrNothing,
    EchoChamber,
    RubberShield,
    GoldenRatio,
    GlassCannon,
    SecondWind,
    Perfectionist,
}

/// Static catalog entry for a relic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelicDef {
    pub id: RelicId,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: RelicRarity,
    pub hooks: HookPoints,
    /// Removed from the player after it triggers.
    pub consumable: bool,
    /// Keeps state that resets when a combat starts.
    pub per_combat: bool,
}

const fn relic(
    id: RelicId,
    name: &'static str,
    description: &'static str,
    rarity: RelicRarity,
    hooks: HookPoints,
) -> RelicDef {
    RelicDef {
        id,
        name,
        description,
        rarity,
        hooks,
        consumable: false,
        per_combat: false,
    }
}

impl RelicId {
    pub const fn definition(self) -> RelicDef {
        use RelicRarity::*;
        type H = HookPoints;
        match self {
            Self::LoadedDice => relic(self, "Loaded Dice", "+1 reroll per turn.", Common, H::PICKUP),
            Self::IronSkin => relic(self, "Iron Skin", "+15 max HP.", Common, H::PICKUP),
            Self::GoldMagnet => relic(
                self,
                "Gold Magnet",
                "Earn 25% more gold from combat.",
                Common,
                H::GOLD_GAIN,
            ),
            Self::LuckyCoin => relic(
                self,
                "Lucky Coin",
                "Start each combat with +1 reroll.",
                Common,
                H::COMBAT_START,
            ),
            Self::MagnifyingGlass => relic(
                self,
                "Magnifying Glass",
                "Prime number results get an extra x1.5 multiplier.",
                Uncommon,
                H::EVALUATE,
            ),
            Self::MirrorShard => relic(
                self,
                "Mirror Shard",
                "Duplicate one random die at the start of each combat.",
                Rare,
                H::COMBAT_START,
            ),
            Self::ModularRing => relic(
                self,
                "Ring of Modular Arithmetic",
                "Overkill damage wraps around (mod target). No self-damage from overkill.",
                Legendary,
                H::EVALUATE,
            ),
            Self::ThickSkin => relic(
                self,
                "Thick Skin",
                "Reduce all damage taken by 2.",
                Uncommon,
                H::TAKE_DAMAGE,
            ),
            Self::DecimalLens => relic(
                self,
                "Decimal Lens",
                "Your results are rounded to the nearest integer (helps with division).",
                Common,
                H::EVALUATE,
            ),
            Self::BerserkerMark => relic(
                self,
                "Berserker's Mark",
                "Overkill no longer damages you, but you deal 20% less effective damage.",
                Rare,
                H::EVALUATE,
            ),
            Self::ComboCrown => relic(
                self,
                "Combo Crown",
                "Each combo triggered gives +5 bonus gold.",
                Uncommon,
                H::GOLD_GAIN,
            ),
            Self::PhoenixFeather => RelicDef {
                consumable: true,
                ..relic(
                    self,
                    "Phoenix Feather",
                    "Once per run: survive a killing blow with 1 HP. Consumed on use.",
                    Legendary,
                    H::LETHAL_CHECK,
                )
            },
            Self::ExtraHand => relic(
                self,
                "Extra Hand",
                "Start each combat with one free bonus d6.",
                Uncommon,
                H::COMBAT_START,
            ),
            Self::SharpenedMind => relic(
                self,
                "Sharpened Mind",
                "Exact hits give double gold bonus.",
                Uncommon,
                H::GOLD_GAIN,
            ),
            Self::AlchemistFlask => relic(
                self,
                "Alchemist's Flask",
                "Heal 3 HP after each combat victory.",
                Common,
                H::COMBAT_END,
            ),
            Self::ChaosOrb => relic(
                self,
                "Chaos Orb",
                "All dice rolls get +1 to their result (capped at max faces).",
                Rare,
                H::ROLL,
            ),
            Self::LuckyDice => relic(
                self,
                "Lucky Dice",
                "All dice roll twice and keep the higher result.",
                Legendary,
                H::ROLL,
            ),
            Self::Recycler => relic(
                self,
                "Recycler",
                "Each operator can be placed twice per expression.",
                Rare,
                H::PASSIVE,
            ),
            Self::HeadStart => relic(
                self,
                "Head Start",
                "The first expression you evaluate each combat gets +5 to the result.",
                Uncommon,
                H::EVALUATE,
            ),
            Self::DoubleOrNothing => relic(
                self,
                "Double or Nothing",
                "Exact hits give 3x gold. Overkill/underkill deals double retaliation.",
                Rare,
                H::TAKE_DAMAGE.union(H::GOLD_GAIN),
            ),
            Self::EchoChamber => relic(
                self,
                "Echo Chamber",
                "Gold multiplier from combos is doubled.",
                Legendary,
                H::GOLD_GAIN,
            ),
            Self::RubberShield => RelicDef {
                per_combat: true,
                ..relic(
                    self,
                    "Rubber Shield",
                    "The first hit each combat deals 0 damage to you.",
                    Uncommon,
                    H::TAKE_DAMAGE,
                )
            },
            Self::GoldenRatio => relic(
                self,
                "Golden Ratio",
                "Fibonacci number results heal you for 3 HP.",
                Rare,
                H::EVALUATE,
            ),
            Self::GlassCannon => relic(
                self,
                "Glass Cannon Relic",
                "Deal 50% more effective damage, but you have 20 less max HP.",
                Rare,
                H::PICKUP.union(H::EVALUATE),
            ),
            Self::SecondWind => relic(
                self,
                "Second Wind",
                "Heal 1 HP every time you reroll dice.",
                Uncommon,
                H::REROLL,
            ),
            Self::Perfectionist => relic(
                self,
                "Perfectionist",
                "Exact hits permanently increase your max HP by 2.",
                Legendary,
                H::EVALUATE,
            ),
        }
    }

    pub const fn name(self) -> &'static str {
        self.definition().name
    }

    pub const fn rarity(self) -> RelicRarity {
        self.definition().rarity
    }

    pub const fn hooks(self) -> HookPoints {
        self.definition().hooks
    }
}

/// Relics that can be offered on `floor`, in catalog order.
pub fn relic_pool(floor: u32) -> Vec<RelicId> {
    use strum::IntoEnumIterator;

    let mut pool = Vec::new();
    for rarity in RelicRarity::iter().filter(|r| floor >= r.min_floor()) {
        pool.extend(RelicId::iter().filter(|id| id.rarity() == rarity));
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn catalog_entries_match_their_ids() {
        for id in RelicId::iter() {
            let def = id.definition();
            assert_eq!(def.id, id);
            assert!(!def.hooks.is_empty(), "{id} has no hooks");
        }
        assert_eq!(RelicId::iter().count(), 26);
    }

    #[test]
    fn only_phoenix_feather_is_consumable() {
        let consumables: Vec<_> = RelicId::iter()
            .filter(|id| id.definition().consumable)
            .collect();
        assert_eq!(consumables, vec![RelicId::PhoenixFeather]);
    }

    #[test]
    fn pool_is_gated_by_floor() {
        let first = relic_pool(0);
        assert!(first.iter().all(|r| r.rarity() == RelicRarity::Common));
        assert!(first.contains(&RelicId::LoadedDice));

        let deep = relic_pool(8);
        assert_eq!(deep.len(), 26);
        assert!(!relic_pool(7).contains(&RelicId::PhoenixFeather));
        assert!(relic_pool(5).contains(&RelicId::MirrorShard));
    }

    #[test]
    fn ids_use_snake_case() {
        assert_eq!(RelicId::DoubleOrNothing.to_string(), "double_or_nothing");
        assert_eq!(
            "phoenix_feather".parse::<RelicId>(),
            Ok(RelicId::PhoenixFeather)
        );
    }
}
