//! Game session
//!
//! Owns every entity plus score and health, and gates the simulation on the
//! game-over condition. Rendering keeps going after game over.

use serde::Serialize;

use crate::consts::START_HEALTH;
use crate::input::InputState;
use crate::platform::{Viewport, ViewportProvider};
use crate::render::RenderSink;
use crate::sim::{GameEvent, StepOutcome, World, tick};

/// Read-only view handed to the render sink
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<'a> {
    pub world: &'a World,
    pub score: u64,
    pub health: i32,
    pub terminal: bool,
    pub viewport: Viewport,
    /// Simulation steps run so far
    pub ticks: u64,
}

/// A single play-through, from spawn to game over
pub struct GameSession<V: ViewportProvider> {
    world: World,
    score: u64,
    health: i32,
    ticks: u64,
    input: InputState,
    viewport: V,
}

impl<V: ViewportProvider> GameSession<V> {
    /// Spawn the level for the viewport as it is right now
    pub fn new(viewport: V, input: InputState) -> Self {
        let vp = viewport.viewport();
        log::info!("New session on {}x{} viewport", vp.width, vp.height);
        Self {
            world: World::spawn(vp),
            score: 0,
            health: START_HEALTH,
            ticks: 0,
            input,
            viewport,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_game_over(&self) -> bool {
        self.health <= 0
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Run one simulation step unless the game is over
    pub fn advance(&mut self) -> Option<StepOutcome> {
        if self.is_game_over() {
            return None;
        }

        let viewport = self.viewport.viewport();
        let input = self.input.tick_input();
        let outcome = tick(&mut self.world, &input, viewport);
        self.ticks += 1;

        for event in &outcome.events {
            match event {
                GameEvent::ShardCollected { index } => {
                    log::info!("Shard {} collected", index);
                }
                GameEvent::PlayerHit { player_x } => {
                    log::info!("Player hit, knocked back to x={}", player_x);
                }
            }
        }

        self.score = self.score.saturating_add(outcome.score_delta());
        self.health = (self.health - outcome.damage()).max(0);

        if self.is_game_over() {
            log::info!(
                "Game over after {} ticks (score {})",
                self.ticks,
                self.score
            );
        }

        Some(outcome)
    }

    /// One frame: advance if still playing, then always render
    pub fn tick<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        self.advance();
        sink.render(&self.snapshot());
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            world: &self.world,
            score: self.score,
            health: self.health,
            terminal: self.is_game_over(),
            viewport: self.viewport.viewport(),
            ticks: self.ticks,
        }
    }
}
