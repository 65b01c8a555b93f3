//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no delta time
//! - Stable iteration order (shards in spawn order)
//! - No rendering or platform dependencies beyond the viewport size

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{Enemy, Player, Shard, World};
pub use tick::{GameEvent, StepOutcome, TickInput, tick};
