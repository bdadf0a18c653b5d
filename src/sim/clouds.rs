//! Cosmetic cloud placement
//!
//! One cloud per `cloud_interval` of camera climb, placed above the camera at
//! a random horizontal offset. Clouds are never removed during a session.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Cloud billboard sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudVariant {
    Wisp,
    Puff,
    Bank,
    Scrap,
}

impl CloudVariant {
    pub const ALL: [CloudVariant; 4] = [
        CloudVariant::Wisp,
        CloudVariant::Puff,
        CloudVariant::Bank,
        CloudVariant::Scrap,
    ];

    /// Billboard (width, height)
    pub fn size(self) -> (f32, f32) {
        match self {
            CloudVariant::Wisp => (10.0, 5.0),
            CloudVariant::Puff => (12.0, 6.0),
            CloudVariant::Bank => (15.0, 7.5),
            CloudVariant::Scrap => (8.0, 4.0),
        }
    }
}

/// Where and what to spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudPlacement {
    pub position: Vec3,
    pub variant: CloudVariant,
}

#[derive(Debug, Clone)]
pub struct CloudSpawner {
    last_spawn_height: f32,
    interval: f32,
    rise: f32,
    x_range: f32,
    z_range: (f32, f32),
    rng: Pcg32,
}

impl CloudSpawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            last_spawn_height: 0.0,
            interval: tuning.cloud_interval,
            rise: tuning.cloud_rise,
            x_range: tuning.cloud_x_range.abs(),
            z_range: tuning.cloud_z_range,
            rng: Pcg32::seed_from_u64(tuning.seed),
        }
    }

    pub fn last_spawn_height(&self) -> f32 {
        self.last_spawn_height
    }

    /// Spawn a cloud if the camera climbed past the next interval
    pub fn update(&mut self, camera_y: f32) -> Option<CloudPlacement> {
        if camera_y <= self.last_spawn_height + self.interval {
            return None;
        }
        self.last_spawn_height = camera_y;

        let x = self.rng.random_range(-self.x_range..=self.x_range);
        let z = self.rng.random_range(self.z_range.0..=self.z_range.1);
        let variant = CloudVariant::ALL[self.rng.random_range(0..CloudVariant::ALL.len())];
        Some(CloudPlacement {
            position: Vec3::new(x, camera_y + self.rise, z),
            variant,
        })
    }
}
