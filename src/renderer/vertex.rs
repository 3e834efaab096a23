//! Vertex format and palette

use bytemuck::{Pod, Zeroable};

/// Clip-space vertex with a flat color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
            1.0,
        ]
    }

    pub const SKY: [f32; 4] = hex(0x87CEEB);
    pub const BIRD_BODY: [f32; 4] = hex(0xFFCC00);
    /// Scenery bird, so it never reads as the one being steered
    pub const DECORATIVE_BODY: [f32; 4] = hex(0x9AB8FF);
    pub const BEAK: [f32; 4] = hex(0xF58216);
    pub const WING: [f32; 4] = hex(0xF58216);
    pub const EYE: [f32; 4] = hex(0xFFFFFF);
    pub const PUPIL: [f32; 4] = hex(0x111111);
    pub const PIPE_BODY: [f32; 4] = hex(0xA0FFA0);
    pub const PIPE_CAP: [f32; 4] = hex(0x20BB20);
    pub const PIPE_OPENING: [f32; 4] = hex(0x111111);
}
