//! Platform abstraction layer
//!
//! The host (browser canvas or a headless driver) owns the drawable size and
//! may change it at any time. The simulation only ever reads it through
//! [`ViewportProvider`], once per tick.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::{GROUND_OFFSET, PATROL_MAX_FRACTION, PATROL_MIN_FRACTION};

/// Current drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y coordinate the player rests on
    #[inline]
    pub fn ground_level(&self) -> f32 {
        self.height - GROUND_OFFSET
    }

    /// Enemy patrol bounds `(min, max)` for this width
    ///
    /// Not ordered when the width is negative; callers evaluate both bounds
    /// independently.
    #[inline]
    pub fn patrol_bounds(&self) -> (f32, f32) {
        (
            self.width * PATROL_MIN_FRACTION,
            self.width * PATROL_MAX_FRACTION,
        )
    }
}

/// Source of the current viewport
pub trait ViewportProvider {
    fn viewport(&self) -> Viewport;
}

/// A fixed viewport, mainly for tests and headless runs
impl ViewportProvider for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

/// Shared, resizable viewport handle
///
/// Clones observe the same size. The resize handler keeps one clone and the
/// session keeps another.
#[derive(Debug, Clone)]
pub struct SharedViewport(Rc<Cell<Viewport>>);

impl SharedViewport {
    pub fn new(viewport: Viewport) -> Self {
        Self(Rc::new(Cell::new(viewport)))
    }

    pub fn resize(&self, width: f32, height: f32) {
        log::debug!("Viewport resized to {}x{}", width, height);
        self.0.set(Viewport::new(width, height));
    }
}

impl ViewportProvider for SharedViewport {
    fn viewport(&self) -> Viewport {
        self.0.get()
    }
}
