//! Physics-to-visual synchronization
//!
//! Every entity owns at most one body and exactly one node. The bridge keeps
//! that pairing, steps the world at a fixed rate and copies simulated poses of
//! dynamic bodies onto their nodes. Static bodies are never re-synced.

use std::collections::BTreeMap;

use glam::Vec3;

use super::physics::{BodyHandle, BodySpec, BodyTransform, RigidBodyWorld};
use super::scene::{NodeHandle, NodeSpec, SceneGraph};
use super::state::EntityId;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pairing {
    body: Option<BodyHandle>,
    node: NodeHandle,
    /// Copy the body pose onto the node after each step
    synced: bool,
}

/// What a teardown released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Released {
    pub bodies: usize,
    pub nodes: usize,
}

#[derive(Debug, Default)]
pub struct PhysicsBridge {
    pairs: BTreeMap<EntityId, Pairing>,
}

impl PhysicsBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn body(&self, entity: EntityId) -> Option<BodyHandle> {
        self.pairs.get(&entity).and_then(|p| p.body)
    }

    pub fn node(&self, entity: EntityId) -> Option<NodeHandle> {
        self.pairs.get(&entity).map(|p| p.node)
    }

    /// Create a node-only entity (active block, cloud)
    pub fn spawn_visual(&mut self, scene: &mut dyn SceneGraph, entity: EntityId, node: NodeSpec) {
        if let Some(old) = self.pairs.remove(&entity) {
            log::warn!("spawn_visual: entity {} already had a node, replacing", entity);
            scene.remove_node(old.node);
        }
        let node = scene.add_node(node);
        self.pairs.insert(
            entity,
            Pairing {
                body: None,
                node,
                synced: false,
            },
        );
    }

    /// Create an entity with both a body and a node
    pub fn spawn(
        &mut self,
        world: &mut dyn RigidBodyWorld,
        scene: &mut dyn SceneGraph,
        entity: EntityId,
        body: BodySpec,
        node: NodeSpec,
    ) {
        self.spawn_visual(scene, entity, node);
        self.attach_body(world, entity, body);
    }

    /// Give an existing entity a (new) body, replacing any previous one.
    /// Dynamic bodies get their pose synced every step from now on.
    pub fn attach_body(&mut self, world: &mut dyn RigidBodyWorld, entity: EntityId, spec: BodySpec) -> bool {
        let Some(pair) = self.pairs.get_mut(&entity) else {
            log::warn!("attach_body: entity {} has no node", entity);
            return false;
        };
        if let Some(old) = pair.body.take() {
            world.remove_body(old);
        }
        pair.body = Some(world.add_body(spec));
        pair.synced = spec.is_dynamic();
        true
    }

    /// Move/resize a node directly (entities not driven by physics)
    pub fn place(&self, scene: &mut dyn SceneGraph, entity: EntityId, position: Vec3, scale: Option<Vec3>) {
        if let Some(pair) = self.pairs.get(&entity) {
            scene.set_position(pair.node, position);
            if let Some(scale) = scale {
                scene.set_scale(pair.node, scale);
            }
        }
    }

    /// Advance the world by one fixed step, then sync dynamic entities
    pub fn step(&self, world: &mut dyn RigidBodyWorld, scene: &mut dyn SceneGraph, dt: f32) {
        world.step(dt);
        for pair in self.pairs.values().filter(|p| p.synced) {
            let Some(body) = pair.body else { continue };
            if let Some(BodyTransform {
                position,
                orientation,
            }) = world.transform(body)
            {
                scene.set_position(pair.node, position);
                scene.set_orientation(pair.node, orientation);
            }
        }
    }

    /// Simulated pose of an entity's body
    pub fn transform(&self, world: &dyn RigidBodyWorld, entity: EntityId) -> Option<BodyTransform> {
        self.body(entity).and_then(|b| world.transform(b))
    }

    /// Remove every body, then every node. Missing entries are skipped.
    pub fn teardown(&mut self, world: &mut dyn RigidBodyWorld, scene: &mut dyn SceneGraph) -> Released {
        let mut released = Released::default();
        for pair in self.pairs.values() {
            if let Some(body) = pair.body {
                if world.remove_body(body) {
                    released.bodies += 1;
                }
            }
        }
        for pair in self.pairs.values() {
            if scene.remove_node(pair.node) {
                released.nodes += 1;
            }
        }
        self.pairs.clear();
        released
    }
}
