//! Rendering output
//!
//! The core never draws. Each frame it captures a `Scene` of filled rectangles
//! and circles in pixel space, and hands it to a `Canvas` (the host's
//! renderer) or tessellates it into vertices for a GPU host.

pub mod shapes;
pub mod vertex;

pub use vertex::{Vertex, colors};

use glam::Vec2;

use crate::consts::DEBUG_LINE_LENGTH;
use crate::error::DrawError;
use crate::sim::GameState;
use colors::Rgba;

/// One filled primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Rect { top_left: Vec2, size: Vec2, color: Rgba },
    Circle { center: Vec2, radius: f32, color: Rgba },
}

/// Debug readout drawn over the scene
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    /// Ball centre to ball centre plus scaled velocity
    pub velocity_line: (Vec2, Vec2),
    /// Text lines, top-left first
    pub lines: Vec<String>,
    pub text_color: Rgba,
    pub fps: Option<u32>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub clear: Rgba,
    pub commands: Vec<DrawCommand>,
    pub overlay: Option<DebugOverlay>,
}

impl Scene {
    /// Capture the current transforms: bricks, then paddle, then ball
    pub fn capture(state: &GameState, fps: Option<u32>) -> Self {
        let mut commands = Vec::with_capacity(state.bricks.len() + 2);

        let size = state.layout.cell_size();
        for (index, brick) in state.bricks.iter().enumerate() {
            if brick.active {
                let (row, _) = state.layout.cell(index);
                commands.push(DrawCommand::Rect {
                    top_left: brick.position,
                    size,
                    color: colors::brick_row(row),
                });
            }
        }

        if let Some(t) = state.world.transform(state.paddle.body) {
            let size = Vec2::new(state.paddle.width, state.paddle.height);
            commands.push(DrawCommand::Rect {
                top_left: crate::vec_to_pixels(t.position) - size / 2.0,
                size,
                color: state.paddle.color,
            });
        }

        let ball_pos = state.ball_position_px();
        if let Some(center) = ball_pos {
            commands.push(DrawCommand::Circle {
                center,
                radius: state.ball.radius,
                color: state.ball.color,
            });
        }

        let overlay = if state.debug_overlay {
            ball_pos.zip(state.ball_velocity()).map(|(pos, vel)| DebugOverlay {
                velocity_line: (pos, pos + vel * DEBUG_LINE_LENGTH),
                lines: vec![
                    format!("Ball Vel: ({:.2}, {:.2})", vel.x, vel.y),
                    format!("Ball Pos: ({:.1}, {:.1})", pos.x, pos.y),
                ],
                text_color: colors::OVERLAY_TEXT,
                fps,
            })
        } else {
            None
        };

        Self {
            clear: colors::BACKGROUND,
            commands,
            overlay,
        }
    }
}

/// The host's renderer
pub trait Canvas {
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, top_left: Vec2, size: Vec2, color: Rgba) -> Result<(), DrawError>;
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) -> Result<(), DrawError>;
    /// Debug overlay; hosts without text support can ignore it
    fn overlay(&mut self, _overlay: &DebugOverlay) -> Result<(), DrawError> {
        Ok(())
    }
}

/// Draw a scene, skipping any primitive the canvas fails on.
/// Returns the number of primitives skipped.
pub fn draw_scene(canvas: &mut impl Canvas, scene: &Scene) -> usize {
    canvas.clear(scene.clear);

    let mut skipped = 0;
    for command in &scene.commands {
        let result = match *command {
            DrawCommand::Rect {
                top_left,
                size,
                color,
            } => canvas.fill_rect(top_left, size, color),
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => canvas.fill_circle(center, radius, color),
        };
        if let Err(e) = result {
            log::warn!("skipping {command:?}: {e}");
            skipped += 1;
        }
    }

    if let Some(overlay) = &scene.overlay {
        if let Err(e) = canvas.overlay(overlay) {
            log::warn!("skipping debug overlay: {e}");
            skipped += 1;
        }
    }
    skipped
}
