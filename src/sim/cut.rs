//! Overlap cut: the heart of the stacker
//!
//! When the player acts, the swinging block is compared with the layer below
//! along its swing axis. The overlapping part stays as a new static layer,
//! the overhang drops, and a narrower block starts swinging one layer up on
//! the other axis. No overlap at all ends the run.

use glam::Vec3;

use super::physics::{BodySpec, RigidBodyWorld};
use super::scene::{NodeGeometry, NodeSpec, SceneGraph};
use super::state::{Block, DroppedBlock, EntityId, Session};
use crate::assets::block_scale;
use crate::renderer::colors::{BLOCK_LIGHTNESS, BLOCK_SATURATION};
use crate::tuning::Tuning;
use crate::{Axis, hsl_to_rgba};

/// A box-shaped piece of a block (centre + full size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slab {
    pub position: Vec3,
    pub size: Vec3,
}

/// Pure geometric result of cutting `active` against `reference`
#[derive(Debug, Clone, PartialEq)]
pub enum Cut {
    /// Some overlap: `placed` is the trimmed block, `overhang` the remainder
    Placed {
        delta: f32,
        overlap: f32,
        placed: Block,
        overhang: Option<Slab>,
    },
    /// No overlap: the whole block drops
    Missed { delta: f32, overlap: f32 },
}

/// Compute the cut without touching any world state
pub fn compute_cut(active: &Block, reference: &Block) -> Cut {
    let axis = active.axis;
    let delta = axis.get(active.position) - axis.get(reference.position);
    let size = reference.dimension(axis);
    let overlap = size - delta.abs();

    if overlap <= 0.0 {
        return Cut::Missed { delta, overlap };
    }

    let mut placed = active.clone();
    placed.set_dimension(axis, overlap);
    axis.set(&mut placed.position, axis.get(active.position) - delta / 2.0);

    let overhang = (delta != 0.0).then(|| {
        let overhang_size = delta.abs();
        let shift = delta.signum() * (overlap / 2.0 + overhang_size / 2.0);
        let mut size = placed.size();
        axis.set(&mut size, overhang_size);
        Slab {
            position: placed.position + axis.unit() * shift,
            size,
        }
    });

    Cut::Placed {
        delta,
        overlap,
        placed,
        overhang,
    }
}

/// What `perform_cut` did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutReport {
    /// A new layer was placed and a new block is swinging
    Placed {
        overlap: f32,
        delta: f32,
        /// Dropped overhang entity (none on a perfect cut)
        overhang: Option<EntityId>,
    },
    /// The active block missed and is now falling
    Missed { dropped: EntityId },
}

/// Node for a block-shaped entity
pub fn block_node(geometry: &NodeGeometry, position: Vec3, size: Vec3, hue: f32) -> NodeSpec {
    NodeSpec {
        geometry: geometry.clone(),
        position,
        scale: block_scale(geometry, size),
        color: hsl_to_rgba(hue, BLOCK_SATURATION, BLOCK_LIGHTNESS),
    }
}

/// Cut the active block against the top of the tower and apply the result.
///
/// Returns `None` when there is nothing to cut (no active block or empty
/// tower). Must run at most once per interaction.
pub fn perform_cut(
    session: &mut Session,
    world: &mut dyn RigidBodyWorld,
    scene: &mut dyn SceneGraph,
    tuning: &Tuning,
    geometry: &NodeGeometry,
    toss: f32,
) -> Option<CutReport> {
    let reference = session.top()?.clone();
    let active = session.active.take()?;
    let toss_velocity = active.axis.unit() * toss;

    match compute_cut(&active, &reference) {
        Cut::Missed { delta, overlap } => {
            log::debug!(
                "Missed layer {}: delta={:.3} overlap={:.3}",
                active.layer,
                delta,
                overlap
            );
            // The swinging node becomes a falling body in place
            let body = BodySpec::dynamic(
                active.position,
                active.half_extents(),
                tuning.dropped_mass,
                toss_velocity,
            );
            session.bridge.attach_body(world, active.id, body);
            session.dropped.push(DroppedBlock {
                id: active.id,
                position: active.position,
                orientation: glam::Quat::IDENTITY,
                width: active.width,
                depth: active.depth,
                height: active.height,
                hue: active.hue,
                initial_velocity: toss_velocity,
            });
            Some(CutReport::Missed { dropped: active.id })
        }
        Cut::Placed {
            delta,
            overlap,
            placed,
            overhang,
        } => {
            log::debug!(
                "Placed layer {}: delta={:.3} overlap={:.3}",
                placed.layer,
                delta,
                overlap
            );
            debug_assert!(layer_within(&reference, &placed));

            // Trimmed block becomes a permanent static layer
            session.bridge.place(
                scene,
                placed.id,
                placed.position,
                Some(block_scale(geometry, placed.size())),
            );
            session.bridge.attach_body(
                world,
                placed.id,
                BodySpec::fixed(placed.position, placed.half_extents()),
            );

            let overhang = if let Some(slab) = overhang {
                let id = session.next_entity_id();
                session.bridge.spawn(
                    world,
                    scene,
                    id,
                    BodySpec::dynamic(slab.position, slab.size * 0.5, tuning.dropped_mass, toss_velocity),
                    block_node(geometry, slab.position, slab.size, placed.hue),
                );
                session.dropped.push(DroppedBlock {
                    id,
                    position: slab.position,
                    orientation: glam::Quat::IDENTITY,
                    width: slab.size.x,
                    depth: slab.size.z,
                    height: slab.size.y,
                    hue: placed.hue,
                    initial_velocity: toss_velocity,
                });
                Some(id)
            } else {
                None
            };

            // Next layer swings on the other axis with the trimmed footprint
            let next = session.new_layer(&placed, placed.axis.other(), tuning);
            session.bridge.spawn_visual(
                scene,
                next.id,
                block_node(geometry, next.position, next.size(), next.hue),
            );

            session.tower.push(placed);
            session.active = Some(next);
            session.round += 1;

            Some(CutReport::Placed {
                overlap,
                delta,
                overhang,
            })
        }
    }
}

/// Placed layer fits inside the layer below
pub fn layer_within(reference: &Block, placed: &Block) -> bool {
    placed.width <= reference.width + 1e-5 && placed.depth <= reference.depth + 1e-5
}
