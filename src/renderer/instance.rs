//! Instance records for GPU hosts

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// One drawable node: model matrix (column-major) and colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl NodeInstance {
    pub fn new(position: Vec3, orientation: Quat, scale: Vec3, color: [f32; 4]) -> Self {
        Self {
            model: Mat4::from_scale_rotation_translation(scale, orientation, position)
                .to_cols_array_2d(),
            color,
        }
    }

    /// Translation column of the model matrix
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }

    /// Raw bytes for a vertex/instance buffer upload
    pub fn as_bytes(instances: &[NodeInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }
}

/// Colors for game elements
pub mod colors {
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const GROUND: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
    /// Saturation / lightness of the block hue ramp
    pub const BLOCK_SATURATION: f32 = 1.0;
    pub const BLOCK_LIGHTNESS: f32 = 0.5;
}
