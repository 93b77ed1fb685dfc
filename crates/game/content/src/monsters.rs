//! Monster catalog.
//!
//! Tiers: 1 and 2 cover act one, 3 and 4 act two, 5 and 6 act three. Bosses
//! sit on tiers 10, 20 and 30.

use game_core::DieType::{D4, D6, D8, D10, D12};
use game_core::{BossAbility, DieType, MonsterOracle, MonsterTemplate};

const fn regular(
    id: &'static str,
    name: &'static str,
    hp_range: (u32, u32),
    attack_die: DieType,
    attack_dice_count: u32,
    tier: u32,
) -> MonsterTemplate {
    MonsterTemplate {
        id,
        name,
        hp_range,
        attack_die,
        attack_dice_count,
        tier,
        elite: false,
        boss: None,
    }
}

const fn elite(
    id: &'static str,
    name: &'static str,
    hp_range: (u32, u32),
    attack_die: DieType,
    attack_dice_count: u32,
    tier: u32,
) -> MonsterTemplate {
    MonsterTemplate {
        elite: true,
        ..regular(id, name, hp_range, attack_die, attack_dice_count, tier)
    }
}

const fn boss(
    id: &'static str,
    name: &'static str,
    hp_range: (u32, u32),
    attack_die: DieType,
    attack_dice_count: u32,
    tier: u32,
    ability: BossAbility,
) -> MonsterTemplate {
    MonsterTemplate {
        boss: Some(ability),
        ..elite(id, name, hp_range, attack_die, attack_dice_count, tier)
    }
}

static MONSTERS: [MonsterTemplate; 37] = [
    // act one
    regular("slime", "Gel Cube", (8, 16), D4, 1, 1),
    regular("rat", "Sewer Rat", (6, 12), D6, 1, 1),
    regular("goblin", "Goblin Arithmancer", (12, 22), D6, 1, 1),
    regular("skeleton", "Bone Counter", (15, 25), D6, 1, 1),
    regular("bat", "Cave Bat", (5, 10), D8, 1, 1),
    regular("spider", "Webweaver", (10, 18), D6, 1, 1),
    regular("mushroom", "Toxic Spore", (7, 14), D4, 1, 1),
    regular("snake", "Viper", (8, 15), D8, 1, 1),
    regular("ghost", "Wraith", (11, 19), D6, 1, 1),
    elite("ogre", "Ogre Mathematician", (30, 45), D8, 2, 2),
    elite("mimic", "Mimic Chest", (25, 35), D10, 2, 2),
    elite("gargoyle", "Stone Gargoyle", (28, 40), D8, 2, 2),
    boss(
        "prime_minister",
        "The Prime Minister",
        (50, 65),
        D4,
        2,
        10,
        BossAbility::PrimeOnly,
    ),
    // act two
    regular("golem", "Clay Golem", (20, 35), D8, 1, 3),
    regular("wizard", "Rogue Wizard", (18, 28), D10, 1, 3),
    regular("imp", "Flame Imp", (15, 25), D10, 1, 3),
    regular("wolf", "Dire Wolf", (22, 32), D8, 2, 3),
    regular("eye", "Floating Eye", (16, 26), D8, 1, 3),
    regular("troll", "Bridge Troll", (25, 38), D8, 2, 3),
    regular("scorpion", "Giant Scorpion", (20, 30), D10, 1, 3),
    regular("shadow", "Shadow Stalker", (18, 28), D10, 1, 3),
    elite("dragon", "Young Dragon", (45, 65), D10, 2, 4),
    elite("lich", "Lich Numeromancer", (40, 55), D12, 2, 4),
    elite("hydra", "Hydra", (50, 70), D8, 3, 4),
    boss(
        "palindromer",
        "The Palindromer",
        (70, 90),
        D6,
        2,
        20,
        BossAbility::PalindromeOnly,
    ),
    // act three
    regular("demon", "Infernal Demon", (35, 55), D10, 2, 5),
    regular("elemental", "Chaos Elemental", (30, 50), D12, 1, 5),
    regular("chimera", "Chimera", (40, 60), D10, 2, 5),
    regular("phantom", "Phantom", (28, 45), D12, 1, 5),
    regular("wyvern", "Wyvern", (38, 58), D10, 2, 5),
    regular("minotaur", "Minotaur", (45, 65), D10, 2, 5),
    regular("necromancer", "Necromancer", (32, 48), D12, 2, 5),
    regular("colossus", "Iron Colossus", (50, 70), D8, 3, 5),
    elite("ancient_dragon", "Ancient Dragon", (65, 90), D12, 3, 6),
    elite("archlich", "Archlich", (55, 80), D12, 2, 6),
    elite("seraph", "Fallen Seraph", (60, 85), D10, 3, 6),
    boss(
        "the_infinity",
        "The Infinity",
        (100, 130),
        D8,
        3,
        30,
        BossAbility::PerfectSquareOnly,
    ),
];

/// Built-in monster catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonsterCatalog;

impl MonsterCatalog {
    /// Boss tier guarding the end of an act.
    pub const fn boss_tier(act: u32) -> u32 {
        match act {
            0 | 1 => 10,
            2 => 20,
            _ => 30,
        }
    }

    pub fn all(&self) -> &'static [MonsterTemplate] {
        &MONSTERS
    }

    fn ids_where(&self, pred: impl Fn(&MonsterTemplate) -> bool) -> Vec<&'static str> {
        MONSTERS.iter().filter(|m| pred(m)).map(|m| m.id).collect()
    }
}

impl MonsterOracle for MonsterCatalog {
    fn template(&self, id: &str) -> Option<&MonsterTemplate> {
        MONSTERS.iter().find(|m| m.id == id)
    }

    fn regulars(&self, tier: u32) -> Vec<&'static str> {
        self.ids_where(|m| m.tier == tier && !m.elite && m.boss.is_none())
    }

    fn elites(&self, tier: u32) -> Vec<&'static str> {
        self.ids_where(|m| m.tier == tier && m.elite && m.boss.is_none())
    }

    fn boss_for_act(&self, act: u32) -> Option<&'static str> {
        let tier = Self::boss_tier(act);
        MONSTERS
            .iter()
            .find(|m| m.tier == tier && m.boss.is_some())
            .map(|m| m.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_ranges_ordered() {
        let mut seen = HashSet::new();
        for m in MonsterCatalog.all() {
            assert!(seen.insert(m.id), "duplicate id {}", m.id);
            assert!(m.hp_range.0 <= m.hp_range.1, "{} range", m.id);
            assert!(m.attack_dice_count >= 1);
        }
    }

    #[test]
    fn tier_pools_follow_catalog_order() {
        let catalog = MonsterCatalog;
        let tier1 = catalog.regulars(1);
        assert_eq!(tier1.len(), 9);
        assert_eq!(tier1[0], "slime");
        assert_eq!(catalog.elites(2), vec!["ogre", "mimic", "gargoyle"]);
        assert_eq!(catalog.elites(4), vec!["dragon", "lich", "hydra"]);
        assert!(catalog.regulars(10).is_empty());
        assert!(catalog.elites(10).is_empty());
    }

    #[test]
    fn each_act_has_a_boss() {
        let catalog = MonsterCatalog;
        let bosses: Vec<_> = (1..=3).filter_map(|a| catalog.boss_for_act(a)).collect();
        assert_eq!(bosses, vec!["prime_minister", "palindromer", "the_infinity"]);
        let infinity = catalog.template("the_infinity").unwrap();
        assert_eq!(infinity.boss, Some(BossAbility::PerfectSquareOnly));
        assert!(infinity.elite);
    }

    #[test]
    fn unknown_id_has_no_template() {
        assert!(MonsterCatalog.template("dragonfly").is_none());
    }
}
