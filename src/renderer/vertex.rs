//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Color;

/// Canvas-space vertex (pixels) with an RGBA color
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

    /// Buffer layout matching `VertexInput` in the shader
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const RED: [f32; 4] = [0.9, 0.15, 0.15, 1.0];
    pub const GREEN: [f32; 4] = [0.15, 0.7, 0.25, 1.0];
    pub const BLUE: [f32; 4] = [0.2, 0.35, 0.95, 1.0];
    pub const PURPLE: [f32; 4] = [0.55, 0.2, 0.75, 1.0];
    /// Multiplied into platform colors
    pub const PLATFORM_TINT: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// RGBA for a simulation color
pub fn rgba(color: Color) -> [f32; 4] {
    match color {
        Color::Red => colors::RED,
        Color::Green => colors::GREEN,
        Color::Blue => colors::BLUE,
        Color::Purple => colors::PURPLE,
    }
}
