//! Combat state machine.
//!
//! A [`CombatSession`] holds one encounter: the monster, the dice tray, the
//! expression under construction and the encounter's RNG. [`CombatEngine`]
//! applies player actions to a session and the run it belongs to:
//!
//! - expression editing (`place_token`, `remove_token`, `move_token`, ...)
//! - dice actions (`reroll`, `toggle_hold`, `reroll_boss_target`)
//! - `evaluate`, which resolves a turn and moves the session to the next turn,
//!   [`CombatPhase::Victory`] or [`CombatPhase::Defeat`]
//! - `preview`, a read-only projection of `evaluate`
mod engine;
mod error;
mod preview;
mod resolution;
mod session;

pub use engine::{CombatEngine, Encounter};
pub use error::{CombatError, EvaluateError, TokenError};
pub use preview::{CombatPreview, DamagePreview};
pub use resolution::TurnResolution;
pub use session::{CombatPhase, CombatSession};
