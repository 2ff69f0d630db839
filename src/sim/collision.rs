//! Ball vs brick destruction
//!
//! The engine handles the actual bouncing off walls and the paddle. Bricks are
//! resolved here instead: the first active brick (in grid scan order) whose
//! render-space rectangle touches the ball is destroyed and the ball's vertical
//! velocity is flipped. At most one brick goes per frame.
//!
//! The Y flip is a deliberate simplification and not a contact-normal
//! reflection; side hits bounce vertically too.

use glam::Vec2;

use super::grid::GridLayout;
use super::state::{Ball, Brick};
use super::world::PhysicsWorld;
use crate::consts::BALL_HIT_TOLERANCE;

/// A brick destroyed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickHit {
    pub index: usize,
    pub row: usize,
    pub column: usize,
}

/// Whether a circle overlaps an axis-aligned rectangle (edges count as touching)
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, top_left: Vec2, size: Vec2) -> bool {
    let closest = center.clamp(top_left, top_left + size);
    center.distance_squared(closest) <= radius * radius
}

/// First active brick touched by a circle, in scan order
pub fn first_overlapping_brick(
    bricks: &[Brick],
    layout: &GridLayout,
    center: Vec2,
    radius: f32,
) -> Option<usize> {
    let size = layout.cell_size();
    layout.scan_order().find(|&index| {
        bricks
            .get(index)
            .is_some_and(|b| b.active && circle_rect_overlap(center, radius, b.position, size))
    })
}

/// Destroy at most one brick touched by the ball and flip the ball's Y velocity
pub fn resolve_brick_collision(
    world: &mut PhysicsWorld,
    bricks: &mut [Brick],
    layout: &GridLayout,
    ball: &Ball,
) -> Option<BrickHit> {
    let center = crate::vec_to_pixels(world.transform(ball.body)?.position);
    let index = first_overlapping_brick(bricks, layout, center, ball.radius + BALL_HIT_TOLERANCE)?;

    let brick = &mut bricks[index];
    if !world.destroy_body(&mut brick.body) {
        log::warn!("brick {index} was active without a live body");
    }
    brick.active = false;

    if let Some(v) = world.linear_velocity(ball.body) {
        world.set_linear_velocity(ball.body, Vec2::new(v.x, -v.y));
    }

    let (row, column) = layout.cell(index);
    Some(BrickHit { index, row, column })
}
