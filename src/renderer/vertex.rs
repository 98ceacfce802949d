//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const GROUND: [f32; 4] = [0.08, 0.12, 0.08, 1.0];
    pub const CITY: [f32; 4] = [0.30, 0.79, 0.94, 1.0]; // Cyan
    pub const LAUNCHER: [f32; 4] = [0.0, 1.0, 0.25, 1.0]; // Phosphor green
    pub const AMMO_PIP: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const RUBBLE: [f32; 4] = [0.25, 0.22, 0.2, 1.0];
    pub const ENEMY: [f32; 4] = [1.0, 0.27, 0.27, 1.0];
    pub const INTERCEPTOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CROSSHAIR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const INTERCEPT_BLAST: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const IMPACT_BLAST: [f32; 4] = [1.0, 0.27, 0.27, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.02, 1.0];
}

/// Same color with alpha scaled
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}
