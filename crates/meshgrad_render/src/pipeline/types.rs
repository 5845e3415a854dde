//! GPU-compatible data types for the gradient pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use meshgrad_core::PlaneVertex;

/// A plane vertex as uploaded to the vertex buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GradientVertex {
    /// Undisplaced position (x, y, z)
    pub position: [f32; 3],
    /// Texture coordinate driving the noise lookup
    pub uv: [f32; 2],
}

impl From<&PlaneVertex> for GradientVertex {
    fn from(v: &PlaneVertex) -> Self {
        Self {
            position: v.position,
            uv: v.uv,
        }
    }
}

/// Per-frame uniforms
/// Layout: 80 bytes total (must match gradient.wgsl Uniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GradientUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Accumulated animation time
    pub time: f32,
    /// Number of palette entries the shader reads
    pub color_count: u32,
    pub _padding: [f32; 2],
}

impl Default for GradientUniforms {
    fn default() -> Self {
        Self {
            view_proj: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            time: 0.0,
            color_count: 0,
            _padding: [0.0; 2],
        }
    }
}

/// Size of one palette entry in the storage buffer
pub const PALETTE_ENTRY_SIZE: u64 = std::mem::size_of::<[f32; 4]>() as u64;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_gradient_vertex_size() {
        // 3 floats position + 2 floats uv = 20 bytes
        assert_eq!(size_of::<GradientVertex>(), 20);
    }

    #[test]
    fn test_uniforms_size() {
        // 16 floats view_proj + time + count + 2 padding = 80 bytes
        assert_eq!(size_of::<GradientUniforms>(), 80);
        assert_eq!(size_of::<GradientUniforms>() % 16, 0);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<GradientVertex>(), 4);
        assert_eq!(std::mem::align_of::<GradientUniforms>(), 4);
    }

    #[test]
    fn test_from_plane_vertex() {
        let v = PlaneVertex {
            position: [0.5, -0.5, 0.0],
            uv: [1.0, 0.0],
        };
        let gpu = GradientVertex::from(&v);
        assert_eq!(gpu.position, v.position);
        assert_eq!(gpu.uv, v.uv);
    }
}
