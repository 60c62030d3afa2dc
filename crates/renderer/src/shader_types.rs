//! CPU mirrors of the shader-side structs.

use asset::mesh::MeshVertex;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Storage-buffer vertex. WGSL rounds the struct up to its 16-byte
/// alignment, so the stride is 48 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub texcoord: [f32; 2],
    _pad: [f32; 2],
}

impl From<&MeshVertex> for GpuVertex {
    fn from(value: &MeshVertex) -> Self {
        Self {
            position: value.position,
            color: value.color,
            texcoord: value.texcoord,
            ..Default::default()
        }
    }
}

/// Transform UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TransformUniform {
    pub mvp: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(mvp: Mat4) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
        }
    }
}

/// Size of the transform buffer: the uniform, padded up to the device's
/// uniform offset alignment.
pub fn transform_block_size(min_uniform_offset_alignment: u32) -> u64 {
    let size = std::mem::size_of::<TransformUniform>() as u64;
    size.max(min_uniform_offset_alignment as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_layout_sizes() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 48);
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
    }

    #[test]
    fn vertex_conversion_keeps_fields() {
        let v = MeshVertex::new([1.0, 2.0, 3.0], [0.25, 0.75]);
        let g = GpuVertex::from(&v);
        assert_eq!(g.position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(g.color, [1.0; 4]);
        assert_eq!(g.texcoord, [0.25, 0.75]);
    }

    #[test]
    fn transform_block_respects_alignment() {
        assert_eq!(transform_block_size(256), 256);
        assert_eq!(transform_block_size(32), 64);
        assert_eq!(transform_block_size(0), 64);
    }

    #[test]
    fn transform_uniform_is_column_major() {
        let m = Mat4::from_translation(glam::vec3(1.0, 2.0, 3.0));
        let u = TransformUniform::new(m);
        assert_eq!(u.mvp[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
