//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Physics and presentation only through the capability traits

pub mod bridge;
pub mod camera;
pub mod clouds;
pub mod cut;
pub mod physics;
pub mod scene;
pub mod state;
pub mod tick;

pub use bridge::{PhysicsBridge, Released};
pub use camera::{CameraTracker, CameraView};
pub use clouds::{CloudPlacement, CloudSpawner, CloudVariant};
pub use cut::{Cut, CutReport, Slab, compute_cut, perform_cut};
pub use physics::{BodyHandle, BodyKind, BodySpec, BodyTransform, RapierWorld, RigidBodyWorld};
pub use scene::{NodeGeometry, NodeHandle, NodeSpec, RecordingScene, SceneGraph, SceneNode};
pub use state::{
    Block, CloudInstance, DroppedBlock, EntityId, GameOverCause, GamePhase, GameStateMachine,
    Session,
};
pub use tick::{GameLoop, GameView, Interaction, LoopState, Ports, autopilot_should_cut};
