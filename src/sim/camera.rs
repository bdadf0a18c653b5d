//! Camera pacing
//!
//! The camera climbs with the tower at the oscillation speed and stops once
//! the top layer is comfortably in frame. It never moves down.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where the scene is viewed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraTracker {
    position: Vec3,
    /// Offset from the eye to the look-at point, fixed for the session
    look: Vec3,
}

impl CameraTracker {
    /// Camera at `start`, looking at the origin
    pub fn new(start: Vec3) -> Self {
        Self {
            position: start,
            look: -start,
        }
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Ceiling the camera may climb to for `round` placed layers
    pub fn ceiling(block_height: f32, round: u32, follow_margin: f32) -> f32 {
        block_height * round as f32 + follow_margin
    }

    /// Rise by `speed` if still below the ceiling. Returns true if it moved.
    pub fn update(&mut self, speed: f32, round: u32, block_height: f32, follow_margin: f32) -> bool {
        if self.position.y < Self::ceiling(block_height, round, follow_margin) {
            self.position.y += speed.max(0.0);
            true
        } else {
            false
        }
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            eye: self.position,
            target: self.position + self.look,
        }
    }
}
