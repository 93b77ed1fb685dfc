//! Run orchestration around the deterministic combat core.
//!
//! [`Runtime`] owns one run: the player's persistent state and, at most, one
//! active combat. Every action is logged with `tracing` and published on a
//! topic-based [`EventBus`] so front ends can react without polling.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the error types downstream clients handle
//! - [`events`] provides the topic-based event bus
pub mod api;
pub mod events;
pub mod runtime;

pub use api::{Result, RuntimeError};
pub use events::{CombatEvent, EncounterSummary, Event, EventBus, PlayerEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
