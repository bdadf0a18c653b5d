//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be retuned from a JSON file
//! without touching the simulation. Missing fields fall back to defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors raised while loading tuning data
#[derive(Debug)]
pub enum TuningError {
    /// Tuning file could not be read
    Io(std::io::Error),
    /// Tuning file is not valid JSON for [`Tuning`]
    Json(serde_json::Error),
    /// Values parsed but are not playable
    Invalid(String),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "IO error: {e}"),
            TuningError::Json(e) => write!(f, "JSON error: {e}"),
            TuningError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Blocks ===
    /// Footprint (width and depth) of the base layer
    pub block_size: f32,
    /// Vertical size of every layer
    pub block_height: f32,
    /// Start offset of a fresh active block on its oscillation axis
    pub spawn_offset: f32,

    // === Oscillation ===
    /// Peak displacement of the active block from the tower axis
    pub amplitude: f32,
    /// Angle advance per tick at round 0
    pub base_speed: f32,
    /// Extra angle advance per tick for each completed round
    pub speed_per_round: f32,

    // === Camera ===
    /// Camera position when a session starts
    pub camera_start: Vec3,
    /// How far above the tower top the camera is allowed to climb
    pub follow_margin: f32,

    // === Clouds ===
    /// Camera climb between two clouds
    pub cloud_interval: f32,
    /// Height of a new cloud above the camera
    pub cloud_rise: f32,
    /// Half-width of the horizontal spawn band on X
    pub cloud_x_range: f32,
    /// Z spawn band (min, max)
    pub cloud_z_range: (f32, f32),

    // === Physics ===
    /// Vertical gravity (must be negative)
    pub gravity: f32,
    /// Mass of a dropped block
    pub dropped_mass: f32,
    /// Friction coefficient for resting contacts
    pub friction: f32,
    /// Scale from per-tick oscillation delta to toss velocity
    pub toss_scale: f32,
    /// A dropped block below this height ends the run
    pub game_over_floor: f32,
    /// Height of the ground slab top surface
    pub ground_y: f32,

    // === Look ===
    /// Hue (degrees) of the base layer
    pub hue_base: f32,
    /// Hue advance per layer
    pub hue_step: f32,

    /// Seed for cosmetic randomness (clouds)
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            block_size: 2.0,
            block_height: 2.0,
            spawn_offset: -10.0,

            amplitude: 1.5,
            base_speed: 0.035,
            speed_per_round: 0.0015,

            camera_start: Vec3::new(2.0, 2.0, 8.0),
            follow_margin: 4.0,

            cloud_interval: 5.0,
            cloud_rise: 10.0,
            cloud_x_range: 10.0,
            cloud_z_range: (-10.0, 0.0),

            gravity: -10.0,
            dropped_mass: 2.0,
            friction: 0.4,
            toss_scale: 30.0,
            game_over_floor: -1.0,
            ground_y: -10.0,

            hue_base: 30.0,
            hue_step: 4.0,

            seed: 0x5EED_70E5,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON string and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("block_size", self.block_size),
            ("block_height", self.block_height),
            ("cloud_interval", self.cloud_interval),
            ("dropped_mass", self.dropped_mass),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        if !(self.gravity < 0.0) {
            return Err(TuningError::Invalid(format!(
                "gravity must point down, got {}",
                self.gravity
            )));
        }
        if self.base_speed < 0.0 || self.speed_per_round < 0.0 {
            return Err(TuningError::Invalid("oscillation speed must not be negative".into()));
        }
        if self.cloud_z_range.0 > self.cloud_z_range.1 {
            return Err(TuningError::Invalid("cloud_z_range is inverted".into()));
        }
        Ok(())
    }

    /// Oscillation angle advance per tick at `round`
    #[inline]
    pub fn speed_for_round(&self, round: u32) -> f32 {
        self.base_speed + round as f32 * self.speed_per_round
    }

    /// Y of the centre of tower layer `layer` (base is layer 0)
    #[inline]
    pub fn layer_y(&self, layer: usize) -> f32 {
        layer as f32 * self.block_height
    }
}
