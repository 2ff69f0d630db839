//! Gameplay simulation
//!
//! Everything that decides what happens in a frame lives here:
//! - Fixed substeps only (the scheduler owns frame splitting)
//! - Stable brick scan order (column by column)
//! - No rendering or platform dependencies beyond entity colors

pub mod collision;
pub mod governor;
pub mod grid;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{BrickHit, circle_rect_overlap, resolve_brick_collision};
pub use governor::SpeedGovernor;
pub use grid::GridLayout;
pub use scheduler::{FixedStepScheduler, StepPlan};
pub use state::{
    Ball, Brick, GameEvent, GameState, Paddle, ResetReason, RespawnState, clamp_paddle_x,
};
pub use tick::{FrameReport, TickInput, tick};
pub use world::{BodyDef, BodyHandle, BodyKind, Material, PhysicsWorld, Shape, Transform};
