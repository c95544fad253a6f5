//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A point in normalized board space: both axes run 0.0..=1.0.
/// Map data (waypoints, water zones, special features) is authored this way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

/// Board dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: f64,
    pub height: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Global tick counter (increments once per simulated step).
    pub tick: u64,
    /// Rendered frames produced, including paused ones.
    pub frame: u64,
}

impl NormPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale into pixel space for the given board.
    pub fn to_board(self, board: BoardSize) -> DVec2 {
        DVec2::new(self.x * board.width, self.y * board.height)
    }
}

impl BoardSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Normalize a pixel position back into 0..1 board space.
    pub fn normalize(&self, point: DVec2) -> NormPoint {
        NormPoint::new(point.x / self.width, point.y / self.height)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self {
            width: crate::constants::BOARD_WIDTH,
            height: crate::constants::BOARD_HEIGHT,
        }
    }
}

impl SimTime {
    /// Advance by one simulated step.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
