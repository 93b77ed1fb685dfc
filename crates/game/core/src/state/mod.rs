//! Persistent run state shared between combats.
//!
//! [`PlayerState`] and [`RunState`] outlive any single encounter. The combat
//! engine borrows them mutably for the duration of one action, so there is
//! exactly one writer at a time.
mod error;
mod player;
mod run;

pub use error::StateError;
pub use player::PlayerState;
pub use run::{RunContext, RunState, RunStats};
