//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (pixels) and color
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
    /// Linear RGBA, 0..1
    pub type Rgba = [f32; 4];

    const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    pub const BACKGROUND: Rgba = rgb(0, 0, 0);
    pub const PADDLE: Rgba = rgb(0, 82, 172);
    pub const BALL: Rgba = rgb(255, 255, 255);
    pub const VELOCITY_LINE: Rgba = rgb(230, 41, 55);
    pub const OVERLAY_TEXT: Rgba = rgb(255, 255, 255);

    /// Brick colors, top row first
    pub const BRICK_ROWS: [Rgba; 8] = [
        rgb(230, 41, 55),   // red
        rgb(255, 161, 0),   // orange
        rgb(253, 249, 0),   // yellow
        rgb(0, 228, 48),    // green
        rgb(0, 121, 241),   // blue
        rgb(200, 122, 255), // purple
        rgb(255, 109, 194), // pink
        rgb(190, 33, 55),   // maroon
    ];

    /// Color for a brick row (wraps for grids taller than the palette)
    pub fn brick_row(row: usize) -> Rgba {
        BRICK_ROWS[row % BRICK_ROWS.len()]
    }
}
