//! Entities and the world they live in
//!
//! Entities are plain data. All behavior lives in [`super::tick`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::platform::Viewport;

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Resting on the ground this tick (eligible to jump)
    pub grounded: bool,
}

impl Player {
    /// Spawn standing on the ground at `x`
    pub fn new(x: f32, ground: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            grounded: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A collectible pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shard {
    /// Top-left corner, fixed at spawn
    pub pos: Vec2,
    /// Once set, never cleared
    pub collected: bool,
}

impl Shard {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            collected: false,
        }
    }

    /// Pickup hitbox (always 20x20, whatever the sprite size)
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(SHARD_SIZE))
    }
}

/// The patrolling enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed, always +1 or -1
    pub vx: f32,
}

impl Enemy {
    pub fn new(x: f32, ground: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground),
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            vx: ENEMY_SPEED,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Every entity in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub player: Player,
    /// Stable order; collected shards stay in place
    pub shards: Vec<Shard>,
    pub enemy: Enemy,
}

impl World {
    /// Lay out the level for the viewport at this instant
    ///
    /// Positions are not recomputed on later resizes.
    pub fn spawn(viewport: Viewport) -> Self {
        let w = viewport.width;
        let ground = viewport.ground_level();

        let shards = SHARD_SPAWN_FRACTIONS
            .iter()
            .map(|&f| Shard::new(Vec2::new(w * f, ground - SHARD_HOVER)))
            .collect();

        Self {
            player: Player::new(w * PLAYER_SPAWN_FRACTION, ground),
            shards,
            enemy: Enemy::new(w * ENEMY_SPAWN_FRACTION, ground),
        }
    }

    /// Shards still visible in the level
    pub fn remaining_shards(&self) -> impl Iterator<Item = &Shard> {
        self.shards.iter().filter(|s| !s.collected)
    }
}
