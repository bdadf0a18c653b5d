//! Scene-presentation capability and a headless scene graph
//!
//! The loop only positions, scales and orients nodes, then asks for a frame.
//! [`RecordingScene`] keeps the node table in memory so hosts can pull
//! instance data for their own renderer (and tests can inspect it).

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::camera::CameraView;
use crate::assets::VisualTemplate;
use crate::renderer::NodeInstance;

/// Opaque node reference handed out by a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeHandle(pub u32);

/// What a node draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeGeometry {
    /// Loaded block model, scaled to the block size
    Model(VisualTemplate),
    /// Primitive unit box (fallback when no model is available)
    Box,
    /// Camera-facing cloud quad
    Billboard { width: f32, height: f32 },
    /// Flat ground plane
    Plane { size: f32 },
}

/// Initial state of a new node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub geometry: NodeGeometry,
    pub position: Vec3,
    pub scale: Vec3,
    pub color: [f32; 4],
}

/// Visual scene owned by a session
pub trait SceneGraph {
    fn add_node(&mut self, spec: NodeSpec) -> NodeHandle;
    /// Remove a node. Returns false if it was already gone.
    fn remove_node(&mut self, handle: NodeHandle) -> bool;
    fn set_position(&mut self, handle: NodeHandle, position: Vec3);
    fn set_scale(&mut self, handle: NodeHandle, scale: Vec3);
    fn set_orientation(&mut self, handle: NodeHandle, orientation: Quat);
    /// Present one frame from `camera`
    fn render(&mut self, camera: &CameraView);
    fn node_count(&self) -> usize;
}

/// A node as stored by [`RecordingScene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub geometry: NodeGeometry,
    pub position: Vec3,
    pub scale: Vec3,
    pub orientation: Quat,
    pub color: [f32; 4],
}

/// In-memory scene graph; rendering records the camera and counts frames
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    nodes: BTreeMap<NodeHandle, SceneNode>,
    next_id: u32,
    frames: u64,
    last_camera: Option<CameraView>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn last_camera(&self) -> Option<&CameraView> {
        self.last_camera.as_ref()
    }

    /// Per-node instance records in handle order
    pub fn instances(&self) -> Vec<NodeInstance> {
        self.nodes
            .values()
            .map(|n| NodeInstance::new(n.position, n.orientation, n.scale, n.color))
            .collect()
    }
}

impl SceneGraph for RecordingScene {
    fn add_node(&mut self, spec: NodeSpec) -> NodeHandle {
        self.next_id += 1;
        let handle = NodeHandle(self.next_id);
        self.nodes.insert(
            handle,
            SceneNode {
                geometry: spec.geometry,
                position: spec.position,
                scale: spec.scale,
                orientation: Quat::IDENTITY,
                color: spec.color,
            },
        );
        handle
    }

    fn remove_node(&mut self, handle: NodeHandle) -> bool {
        self.nodes.remove(&handle).is_some()
    }

    fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.position = position;
        }
    }

    fn set_scale(&mut self, handle: NodeHandle, scale: Vec3) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.scale = scale;
        }
    }

    fn set_orientation(&mut self, handle: NodeHandle, orientation: Quat) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.orientation = orientation;
        }
    }

    fn render(&mut self, camera: &CameraView) {
        self.frames += 1;
        self.last_camera = Some(*camera);
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
