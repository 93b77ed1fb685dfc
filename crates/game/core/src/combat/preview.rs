use crate::condition::DamageOutcome;
use crate::dice::DieType;
use crate::scoring::ComboReport;

/// Projected retaliation for the current expression.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamagePreview {
    /// Absent when the boss ability would block the result.
    pub outcome: Option<DamageOutcome>,
    pub attack_die: DieType,
    /// Dice the monster would roll; zero when it would not retaliate.
    pub attack_dice_count: u32,
    pub min_damage: u32,
    pub max_damage: u32,
    /// Distance between the result and the target.
    pub diff: f64,
    pub boss_blocked: bool,
}

/// What evaluating the current expression would do, computed without
/// touching the session or its RNG.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatPreview {
    pub result: f64,
    pub dice_used: usize,
    pub operators_used: usize,
    pub combos: ComboReport,
    /// Reason the submission would be rejected.
    pub condition_error: Option<String>,
    pub boss_warning: Option<String>,
    /// Absent while a condition would reject the submission.
    pub damage: Option<DamagePreview>,
}
