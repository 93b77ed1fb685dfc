//! Read-only collaborators consulted by the combat engine.
//!
//! The engine never owns content tables. Monster templates come through
//! [`MonsterOracle`], and every random draw comes from an [`RngSource`].
mod monsters;
mod rng;

pub use monsters::MonsterOracle;
pub use rng::{RngSource, SeededRng};
