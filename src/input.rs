//! Keyboard input
//!
//! Key events arrive from the host independently of the simulation clock and
//! only flip held flags. The simulation samples them once per tick.

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Gameplay actions a key can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

impl Action {
    /// Fixed binding from `KeyboardEvent.code`
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Action::MoveLeft),
            "ArrowRight" => Some(Action::MoveRight),
            "Space" => Some(Action::Jump),
            _ => None,
        }
    }
}

/// Currently held actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    left: bool,
    right: bool,
    jump: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or release. Last write wins; repeats are harmless.
    pub fn set_key(&mut self, action: Action, pressed: bool) {
        match action {
            Action::MoveLeft => self.left = pressed,
            Action::MoveRight => self.right = pressed,
            Action::Jump => self.jump = pressed,
        }
    }

    /// Apply a raw key event, returns false for unbound keys (which are ignored)
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        match Action::from_key_code(code) {
            Some(action) => {
                self.set_key(action, pressed);
                true
            }
            None => {
                log::trace!("Ignoring unbound key {code:?}");
                false
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::Jump => self.jump,
        }
    }

    /// Sample for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}
