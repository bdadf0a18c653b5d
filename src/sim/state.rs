//! Game state and core simulation types
//!
//! Entities are plain records (geometry + ids); their physics bodies and scene
//! nodes are owned by the [`PhysicsBridge`] and looked up by entity id.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::bridge::PhysicsBridge;
use super::camera::CameraTracker;
use super::clouds::{CloudSpawner, CloudVariant};
use crate::platform::Subscription;
use crate::tuning::Tuning;
use crate::{Axis, layer_hue};

/// Stable id shared by an entity, its body and its node
pub type EntityId = u32;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session yet; the next interaction starts one
    #[default]
    Idle,
    /// Active block is swinging, interactions cut
    Playing,
    /// Run ended; physics keeps rendering, no cuts
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// The active block did not overlap the layer below
    Missed,
    /// A dropped block fell below the floor
    Fell,
}

/// Idle / Playing / GameOver transitions
#[derive(Debug, Clone, Default)]
pub struct GameStateMachine {
    phase: GamePhase,
    cause: Option<GameOverCause>,
}

impl GameStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn cause(&self) -> Option<GameOverCause> {
        self.cause
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Cuts and oscillation only happen while playing
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Idle -> Playing. Returns false from any other phase.
    pub fn begin(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.cause = None;
        true
    }

    /// Playing -> GameOver. Returns true only on the transition itself.
    pub fn finish(&mut self, cause: GameOverCause) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.cause = Some(cause);
        true
    }

    /// Any phase -> Idle
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.cause = None;
    }
}

/// A placed or currently-active tower layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: EntityId,
    /// Layer index (base is 0)
    pub layer: usize,
    /// Centre of the block
    pub position: Vec3,
    /// Extent along X
    pub width: f32,
    /// Extent along Z
    pub depth: f32,
    pub height: f32,
    /// Axis the block swings along while active
    pub axis: Axis,
    /// Colour ramp hue in degrees
    pub hue: f32,
}

impl Block {
    /// Extent along `axis`
    #[inline]
    pub fn dimension(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Z => self.depth,
        }
    }

    #[inline]
    pub fn set_dimension(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.width = value,
            Axis::Z => self.depth = value,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Horizontal area
    #[inline]
    pub fn footprint(&self) -> f32 {
        self.width * self.depth
    }
}

/// Overhang or missed block, falling under physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedBlock {
    pub id: EntityId,
    /// Latest simulated centre
    pub position: Vec3,
    /// Latest simulated orientation
    pub orientation: Quat,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub hue: f32,
    /// Velocity handed to the physics body at creation
    pub initial_velocity: Vec3,
}

impl DroppedBlock {
    #[inline]
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Cosmetic cloud billboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudInstance {
    pub id: EntityId,
    pub position: Vec3,
    pub variant: CloudVariant,
}

/// One live game: tower, falling debris, pacing and the entity bridge
#[derive(Debug)]
pub struct Session {
    /// Completed cuts (also the score)
    pub round: u32,
    /// Oscillation angle (radians, only increases)
    pub angle: f32,
    /// Oscillation offset at the previous tick
    pub last_offset: f32,
    /// Offset change over the last tick (backward difference)
    pub swing_velocity: f32,
    /// Placed static layers, base first
    pub tower: Vec<Block>,
    /// Swinging layer, `None` once the run is over
    pub active: Option<Block>,
    /// Falling overhangs and missed blocks
    pub dropped: Vec<DroppedBlock>,
    pub clouds: Vec<CloudInstance>,
    pub camera: CameraTracker,
    pub cloud_spawner: CloudSpawner,
    /// Body/node pairs for every entity in this session
    pub bridge: PhysicsBridge,
    /// Ground slab entity
    pub ground: Option<EntityId>,
    /// Input subscription held for the session's lifetime
    pub input: Option<Subscription>,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl Session {
    /// Fresh session data: base layer plus the first active layer.
    ///
    /// Bodies and nodes are created by the game loop through the bridge.
    pub fn new(tuning: &Tuning) -> Self {
        let mut session = Self {
            round: 0,
            angle: 0.0,
            last_offset: 0.0,
            swing_velocity: 0.0,
            tower: Vec::new(),
            active: None,
            dropped: Vec::new(),
            clouds: Vec::new(),
            camera: CameraTracker::new(tuning.camera_start),
            cloud_spawner: CloudSpawner::new(tuning),
            bridge: PhysicsBridge::new(),
            ground: None,
            input: None,
            time_ticks: 0,
            next_id: 1,
        };

        // Base doesn't swing; giving it Z keeps axes alternating from layer 1 on X
        let base = Block {
            id: session.next_entity_id(),
            layer: 0,
            position: Vec3::new(0.0, tuning.layer_y(0), 0.0),
            width: tuning.block_size,
            depth: tuning.block_size,
            height: tuning.block_height,
            axis: Axis::Z,
            hue: layer_hue(tuning.hue_base, tuning.hue_step, 0),
        };
        let first = session.new_layer(&base, Axis::X, tuning);
        session.tower.push(base);
        session.active = Some(first);
        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reference layer for the next cut
    pub fn top(&self) -> Option<&Block> {
        self.tower.last()
    }

    /// Height of the top surface of the placed tower
    pub fn tower_height(&self) -> f32 {
        self.top()
            .map(|b| b.position.y + b.height / 2.0)
            .unwrap_or(0.0)
    }

    /// Build the layer that sits on `below` and swings along `axis`
    pub fn new_layer(&mut self, below: &Block, axis: Axis, tuning: &Tuning) -> Block {
        let layer = below.layer + 1;
        let mut position = below.position;
        position.y = tuning.layer_y(layer);
        axis.set(&mut position, tuning.spawn_offset);
        Block {
            id: self.next_entity_id(),
            layer,
            position,
            width: below.width,
            depth: below.depth,
            height: below.height,
            axis,
            hue: layer_hue(tuning.hue_base, tuning.hue_step, layer),
        }
    }
}
