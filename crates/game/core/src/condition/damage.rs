use super::ConditionId;
use crate::GameConfig;
use crate::ascension::AscensionModifiers;
use crate::monster::BossAbility;
use crate::numbers;

/// Thresholds used to classify a result against a target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRules {
    /// Largest shortfall that still kills.
    pub near_miss_threshold: f64,
    /// Largest distance allowed under `tight_window`.
    pub tight_window: f64,
    pub exact_tolerance: f64,
}

impl DamageRules {
    pub fn new(config: &GameConfig, modifiers: &AscensionModifiers) -> Self {
        Self {
            near_miss_threshold: modifiers.near_miss_threshold,
            tight_window: config.tight_window,
            exact_tolerance: GameConfig::EXACT_TOLERANCE,
        }
    }

    pub fn is_exact(&self, result: f64, target: f64) -> bool {
        (result - target).abs() < self.exact_tolerance
    }
}

impl Default for DamageRules {
    fn default() -> Self {
        Self::new(&GameConfig::default(), &AscensionModifiers::default())
    }
}

/// Why a resolved turn dealt no damage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockReason {
    NoOverkill,
    MustOverkill,
    TightWindow,
    /// The boss ability rejected the rounded result.
    Boss { ability: BossAbility, result: f64 },
}

impl core::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoOverkill => f.write_str("No overkill allowed!"),
            Self::MustOverkill => f.write_str("Must exceed the target!"),
            Self::TightWindow => f.write_str("Outside the tight window!"),
            Self::Boss { ability, result } => write!(
                f,
                "{} Your result of {} was blocked!",
                ability.description(),
                numbers::round_half_up(*result)
            ),
        }
    }
}

/// Classification of a resolved turn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeKind {
    Exact,
    Overkill,
    NearMiss,
    Underkill,
    Blocked(BlockReason),
}

/// Damage dealt to the monster and whether it strikes back.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    pub dealt: f64,
    pub retaliate: bool,
    pub kind: OutcomeKind,
}

impl DamageOutcome {
    /// Zero damage with forced retaliation.
    pub const fn blocked(reason: BlockReason) -> Self {
        Self {
            dealt: 0.0,
            retaliate: true,
            kind: OutcomeKind::Blocked(reason),
        }
    }

    pub const fn is_exact(&self) -> bool {
        matches!(self.kind, OutcomeKind::Exact)
    }

    pub const fn is_overkill(&self) -> bool {
        matches!(self.kind, OutcomeKind::Overkill)
    }

    pub const fn is_near_miss(&self) -> bool {
        matches!(self.kind, OutcomeKind::NearMiss)
    }

    pub const fn is_underkill(&self) -> bool {
        matches!(self.kind, OutcomeKind::Underkill)
    }

    pub const fn block_reason(&self) -> Option<BlockReason> {
        match self.kind {
            OutcomeKind::Blocked(reason) => Some(reason),
            _ => None,
        }
    }

    /// Exact hits, overkills and near misses kill the monster.
    pub const fn is_lethal(&self) -> bool {
        matches!(
            self.kind,
            OutcomeKind::Exact | OutcomeKind::Overkill | OutcomeKind::NearMiss
        )
    }
}

/// Resolves `result` against `target` under the active conditions.
///
/// Targeting conditions are checked first, in order; a failing gate deals
/// nothing and always provokes retaliation. Past the gate the result is exact
/// (kill, no retaliation), over (kill, retaliation unless `gentle`), just
/// under within the near-miss threshold (kill, retaliation) or further under
/// (the monster survives and takes `ceil(result)`, doubled by
/// `glass_cannon`). Near misses only exist below the target; any result
/// above it is an overkill however close.
pub fn calculate_damage(
    conditions: &[ConditionId],
    result: f64,
    target: f64,
    rules: &DamageRules,
) -> DamageOutcome {
    let diff = (result - target).abs();
    let exact = rules.is_exact(result, target);
    let over = result > target && !exact;
    let under = result < target && !exact;

    for condition in conditions {
        let reason = match condition {
            ConditionId::NoOverkill if over => BlockReason::NoOverkill,
            ConditionId::MustOverkill if !over => BlockReason::MustOverkill,
            ConditionId::TightWindow if diff > rules.tight_window && !exact => {
                BlockReason::TightWindow
            }
            _ => continue,
        };
        return DamageOutcome::blocked(reason);
    }

    if exact {
        return DamageOutcome {
            dealt: target,
            retaliate: false,
            kind: OutcomeKind::Exact,
        };
    }

    if over {
        return DamageOutcome {
            dealt: target,
            retaliate: !conditions.contains(&ConditionId::Gentle),
            kind: OutcomeKind::Overkill,
        };
    }

    if under && diff <= rules.near_miss_threshold {
        return DamageOutcome {
            dealt: target,
            retaliate: true,
            kind: OutcomeKind::NearMiss,
        };
    }

    let dealt = if conditions.contains(&ConditionId::GlassCannon) {
        (result * 2.0).ceil()
    } else {
        result.ceil()
    };
    DamageOutcome {
        dealt,
        retaliate: true,
        kind: OutcomeKind::Underkill,
    }
}
