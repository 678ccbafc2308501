//! Interleaved vertex format shared by every sketch pipeline.

use crate::data_structures::geometry::Geometry;

/// Types that describe their own vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SketchVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
    pub base_position: [f32; 3],
}

impl SketchVertex {
    /// Interleave a geometry's attributes. Missing colors default to white and
    /// a missing base position falls back to the vertex position.
    pub fn interleave(geometry: &Geometry) -> Vec<SketchVertex> {
        (0..geometry.positions.len())
            .map(|i| {
                let position = geometry.positions[i];
                SketchVertex {
                    position,
                    normal: geometry.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
                    uv: geometry.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                    color: geometry
                        .colors
                        .as_ref()
                        .and_then(|c| c.get(i).copied())
                        .unwrap_or([1.0; 3]),
                    base_position: geometry
                        .base_positions
                        .as_ref()
                        .and_then(|b| b.get(i).copied())
                        .unwrap_or(position),
                }
            })
            .collect()
    }
}

impl Vertex for SketchVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
            3 => Float32x3,
            4 => Float32x3
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SketchVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}
