//! Tower Stack - A swing-and-cut tower stacking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cut geometry, physics bridge, game loop)
//! - `renderer`: Instance records for GPU hosts
//! - `platform`: Input/navigation ports provided by the host
//! - `persistence`: Score persistence port
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use leaderboard::Leaderboard;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the physics step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Number of seed layers in a fresh tower (base + first active layer)
    pub const SEED_LAYERS: usize = 2;

    /// Hue wraps around the colour wheel
    pub const HUE_WRAP: f32 = 360.0;
}

/// Horizontal axis a block oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// The perpendicular horizontal axis
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Read the component of `v` along this axis
    #[inline]
    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }

    /// Overwrite the component of `v` along this axis
    #[inline]
    pub fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Z => v.z = value,
        }
    }

    /// Unit vector along this axis
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Hue (degrees) for the tower layer at `layer`
#[inline]
pub fn layer_hue(base: f32, step: f32, layer: usize) -> f32 {
    (base + layer as f32 * step).rem_euclid(consts::HUE_WRAP)
}

/// Convert HSL (hue in degrees, s/l in 0..1) to linear RGBA
pub fn hsl_to_rgba(hue: f32, saturation: f32, lightness: f32) -> [f32; 4] {
    let h = hue.rem_euclid(consts::HUE_WRAP) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}
