//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one display refresh. The sub-steps
//! run in a fixed order because later ones observe the results of earlier
//! ones (pickups and damage use the post-clamp player position).

use super::state::World;
use crate::consts::*;
use crate::platform::Viewport;

/// Held actions sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Shard at this index in `World::shards` was picked up
    ShardCollected { index: usize },
    /// Player touched the enemy and was knocked back to `player_x`
    PlayerHit { player_x: f32 },
}

/// Effects of one tick that the session applies to score and health
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
}

impl StepOutcome {
    /// Points earned this tick
    pub fn score_delta(&self) -> u64 {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::ShardCollected { .. }))
            .count() as u64
    }

    /// Health lost this tick
    pub fn damage(&self) -> i32 {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count() as i32
    }
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput, viewport: Viewport) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let player = &mut world.player;

    // Horizontal movement. Right is applied last so it wins a tie.
    player.vel.x = 0.0;
    if input.left {
        player.vel.x = -PLAYER_SPEED;
    }
    if input.right {
        player.vel.x = PLAYER_SPEED;
    }
    player.pos.x += player.vel.x;

    if input.jump && player.grounded {
        player.vel.y = JUMP_FORCE;
        player.grounded = false;
    }

    // Semi-implicit Euler: velocity first, then position
    player.vel.y += GRAVITY;
    player.pos.y += player.vel.y;

    // Ground is re-read every tick so a resize moves it immediately
    let ground = viewport.ground_level();
    if player.pos.y + player.size.y > ground + player.size.y {
        player.pos.y = ground;
        player.vel.y = 0.0;
        player.grounded = true;
    }

    // Pickups: scan every shard, several may be collected on the same tick
    let player_box = player.bounds();
    for (index, shard) in world.shards.iter_mut().enumerate() {
        if !shard.collected && player_box.overlaps(&shard.bounds()) {
            shard.collected = true;
            outcome.events.push(GameEvent::ShardCollected { index });
        }
    }

    // Enemy patrol. Both bound checks run every tick.
    let enemy = &mut world.enemy;
    enemy.pos.x += enemy.vx;
    let (patrol_min, patrol_max) = viewport.patrol_bounds();
    if enemy.pos.x < patrol_min {
        enemy.vx = ENEMY_SPEED;
    }
    if enemy.pos.x > patrol_max {
        enemy.vx = -ENEMY_SPEED;
    }

    // Contact damage, no invulnerability window
    if world.player.bounds().overlaps(&world.enemy.bounds()) {
        world.player.pos.x -= KNOCKBACK;
        outcome.events.push(GameEvent::PlayerHit {
            player_x: world.player.pos.x,
        });
    }

    outcome
}
