//! Static content for the combat core.
//!
//! - Monster catalog, implementing [`game_core::MonsterOracle`]
//! - Starting dice loadouts and the opening operator hand
//! - TOML loader for [`game_core::GameConfig`] (`loaders` feature)
//!
//! Content is consulted when sessions are created and never stored in game state.

pub mod loadouts;
pub mod monsters;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use loadouts::{LoadoutId, starting_operators};
pub use monsters::MonsterCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult};
