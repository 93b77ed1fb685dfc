/// Game configuration constants and tunable balance parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Hit points a fresh run starts with (before ascension).
    pub starting_hp: u32,
    /// Gold a fresh run starts with (before ascension).
    pub starting_gold: u32,
    /// Rerolls granted at the start of every turn.
    pub rerolls_per_turn: u32,
    /// How far below the target a result may land and still kill.
    pub near_miss_threshold: f64,
    /// Maximum distance from the target allowed under the tight window condition.
    pub tight_window: f64,
    /// Gold for killing a regular monster, before floor scaling.
    pub base_gold: u32,
    /// Gold for killing an elite monster, before floor scaling.
    pub elite_gold: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Results closer than this to the target count as exact hits.
    pub const EXACT_TOLERANCE: f64 = 0.001;
    /// Most conditions an encounter can carry.
    pub const MAX_CONDITIONS: usize = 3;
    /// Compounding monster HP growth per floor.
    pub const HP_GROWTH_PER_FLOOR: f64 = 1.15;
    /// Monster HP never drops below this after scaling.
    pub const MIN_MONSTER_HP: u32 = 5;
    /// Floor offset multiplier when deriving the per-combat seed.
    pub const FLOOR_SEED_STRIDE: u32 = 1000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STARTING_HP: u32 = 80;
    pub const DEFAULT_STARTING_GOLD: u32 = 50;
    pub const DEFAULT_REROLLS_PER_TURN: u32 = 1;
    pub const DEFAULT_NEAR_MISS_THRESHOLD: f64 = 3.0;
    pub const DEFAULT_TIGHT_WINDOW: f64 = 3.0;
    pub const DEFAULT_BASE_GOLD: u32 = 15;
    pub const DEFAULT_ELITE_GOLD: u32 = 30;

    pub fn new() -> Self {
        Self {
            starting_hp: Self::DEFAULT_STARTING_HP,
            starting_gold: Self::DEFAULT_STARTING_GOLD,
            rerolls_per_turn: Self::DEFAULT_REROLLS_PER_TURN,
            near_miss_threshold: Self::DEFAULT_NEAR_MISS_THRESHOLD,
            tight_window: Self::DEFAULT_TIGHT_WINDOW,
            base_gold: Self::DEFAULT_BASE_GOLD,
            elite_gold: Self::DEFAULT_ELITE_GOLD,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
