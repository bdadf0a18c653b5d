//! Rigid-body world capability and its rapier3d backend
//!
//! The game only needs boxes that either never move (tower layers, ground) or
//! fall under gravity (overhangs, missed blocks). [`RigidBodyWorld`] is the
//! narrow interface the loop uses; [`RapierWorld`] implements it on rapier3d.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use rapier3d::math::Vector;
use rapier3d::na as nalgebra;
use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, vector,
};
use serde::{Deserialize, Serialize};

/// Opaque body reference handed out by a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Static vs dynamic body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Zero mass, never moves
    Static,
    /// Affected by gravity and contacts
    Dynamic { mass: f32 },
}

/// Everything needed to create a box body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub kind: BodyKind,
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Initial linear velocity (dynamic bodies only)
    pub velocity: Vec3,
}

impl BodySpec {
    /// A zero-mass box
    pub fn fixed(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            half_extents,
            velocity: Vec3::ZERO,
        }
    }

    /// A falling box with an initial velocity
    pub fn dynamic(position: Vec3, half_extents: Vec3, mass: f32, velocity: Vec3) -> Self {
        Self {
            kind: BodyKind::Dynamic { mass },
            position,
            half_extents,
            velocity,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, BodyKind::Dynamic { .. })
    }
}

/// Simulated pose of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyTransform {
    pub position: Vec3,
    pub orientation: Quat,
}

/// Fixed-step rigid-body simulation
pub trait RigidBodyWorld {
    fn add_body(&mut self, spec: BodySpec) -> BodyHandle;
    /// Remove a body. Returns false if it was already gone.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;
    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);
    fn transform(&self, handle: BodyHandle) -> Option<BodyTransform>;
    fn velocity(&self, handle: BodyHandle) -> Option<Vec3>;
    fn body_count(&self) -> usize;
}

#[inline]
fn to_vector(v: Vec3) -> Vector<f32> {
    vector![v.x, v.y, v.z]
}

/// rapier3d-backed world: cuboid colliders, fixed or dynamic bodies,
/// zero restitution and a shared friction coefficient.
pub struct RapierWorld {
    gravity: Vector<f32>,
    friction: f32,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    /// Our handles in creation order
    handles: BTreeMap<BodyHandle, RigidBodyHandle>,
    next_id: u32,
}

impl RapierWorld {
    pub fn new(gravity: f32, friction: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity, 0.0],
            friction,
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            handles: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl RigidBodyWorld for RapierWorld {
    fn add_body(&mut self, spec: BodySpec) -> BodyHandle {
        let half = spec.half_extents;
        let (body, collider) = match spec.kind {
            BodyKind::Static => (
                RigidBodyBuilder::fixed(),
                ColliderBuilder::cuboid(half.x, half.y, half.z),
            ),
            BodyKind::Dynamic { mass } => (
                RigidBodyBuilder::dynamic().linvel(to_vector(spec.velocity)),
                ColliderBuilder::cuboid(half.x, half.y, half.z).mass(mass),
            ),
        };
        let body = body.translation(to_vector(spec.position)).build();
        let collider = collider.friction(self.friction).restitution(0.0).build();

        let rapier_handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, rapier_handle, &mut self.bodies);

        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.handles.insert(handle, rapier_handle);
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(rapier_handle) = self.handles.remove(&handle) else {
            return false;
        };
        self.bodies
            .remove(
                rapier_handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    fn transform(&self, handle: BodyHandle) -> Option<BodyTransform> {
        let body = self.bodies.get(*self.handles.get(&handle)?)?;
        let t = body.translation();
        let r = body.rotation();
        Some(BodyTransform {
            position: Vec3::new(t.x, t.y, t.z),
            orientation: Quat::from_xyzw(r.i, r.j, r.k, r.w),
        })
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        let body = self.bodies.get(*self.handles.get(&handle)?)?;
        let v = body.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    fn body_count(&self) -> usize {
        self.handles.len()
    }
}
