//! Shard Runner - a minimal 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, the per-tick step)
//! - `session`: Score, health and the game-over condition
//! - `frame`: Asset barrier and the refresh-driven frame loop
//! - `render`: Render sink and draw command recording
//! - `input`: Keyboard binding and held-action state
//! - `platform`: Viewport abstraction supplied by the host
//! - `settings`: Player-facing configuration

pub mod error;
pub mod frame;
pub mod input;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{LoopError, SettingsError};
pub use frame::{AssetKind, CancelToken, FrameLoop, FrameStatus, LoopPhase};
pub use input::{Action, InputState};
pub use platform::{SharedViewport, Viewport, ViewportProvider};
pub use render::{DrawCommand, DrawList, RenderSink};
pub use session::{GameSession, SessionSnapshot};
pub use settings::Settings;

/// Game configuration constants (per-tick units, tuned for a 60 Hz refresh)
pub mod consts {
    /// Downward acceleration added to the player's vertical velocity each tick
    pub const GRAVITY: f32 = 0.5;
    /// Horizontal player speed while a direction is held
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Vertical velocity applied on jump (negative is up)
    pub const JUMP_FORCE: f32 = -10.0;

    /// Ground sits this far above the bottom of the viewport
    pub const GROUND_OFFSET: f32 = 100.0;

    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;

    /// Pickup hitbox, independent of the sprite's natural size
    pub const SHARD_SIZE: f32 = 20.0;
    /// Shards float this far above the ground
    pub const SHARD_HOVER: f32 = 50.0;

    pub const ENEMY_WIDTH: f32 = 32.0;
    pub const ENEMY_HEIGHT: f32 = 32.0;
    pub const ENEMY_SPEED: f32 = 1.0;

    /// Patrol bounds as fractions of the viewport width
    pub const PATROL_MIN_FRACTION: f32 = 0.6;
    pub const PATROL_MAX_FRACTION: f32 = 0.8;

    /// Horizontal push applied to the player on enemy contact
    pub const KNOCKBACK: f32 = 50.0;

    pub const START_HEALTH: i32 = 3;

    /// Spawn positions as fractions of the viewport width
    pub const PLAYER_SPAWN_FRACTION: f32 = 0.1;
    pub const SHARD_SPAWN_FRACTIONS: [f32; 2] = [0.3, 0.5];
    pub const ENEMY_SPAWN_FRACTION: f32 = 0.7;
}
