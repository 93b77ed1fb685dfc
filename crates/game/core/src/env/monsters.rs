use crate::monster::MonsterTemplate;

/// Lookup of monster templates by id, tier and act.
///
/// Pools are returned in catalog order so that a seeded pick over them is
/// reproducible.
pub trait MonsterOracle {
    fn template(&self, id: &str) -> Option<&MonsterTemplate>;

    /// Non-elite, non-boss monsters of `tier`.
    fn regulars(&self, tier: u32) -> Vec<&'static str>;

    /// Elite, non-boss monsters of `tier`.
    fn elites(&self, tier: u32) -> Vec<&'static str>;

    /// Boss guarding the end of `act` (1-based).
    fn boss_for_act(&self, act: u32) -> Option<&'static str>;
}
