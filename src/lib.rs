//! Brickfall - a paddle-and-ball brick breaker
//!
//! Core modules:
//! - `sim`: Fixed-step gameplay on top of a rigid-body world (scheduler, governor, bricks, respawn)
//! - `renderer`: Draw commands, vertex tessellation and the render collaborator seam
//! - `platform`: Input and frame-pacing boundary
//! - `settings`: Startup configuration with fail-soft loading
//! - `session`: Frame driver that ties the above together

pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, DrawError, SetupError};
pub use session::{RunSummary, Session};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Distances are in render-space pixels unless the name says otherwise.
pub mod consts {
    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;

    /// Render space to simulation space scale
    pub const PIXELS_PER_METER: f32 = 50.0;
    pub const METERS_PER_PIXEL: f32 = 1.0 / PIXELS_PER_METER;

    /// Largest physics step the scheduler will take (120 Hz)
    pub const SUBSTEP_RATE_HZ: f32 = 120.0;
    /// Solver iterations handed to each world step
    pub const SOLVER_ITERATIONS: usize = 8;
    /// Upper bound on world steps for one frame (10 s at 120 Hz)
    pub const MAX_STEPS_PER_FRAME: u32 = 1200;
    /// Frame durations above this are clamped by the session driver
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Walls sit just outside the playfield (half-thickness)
    pub const WALL_HALF_THICKNESS: f32 = 10.0;

    /// Brick grid
    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_COLUMNS: u16 = 8;
    pub const BRICK_PADDING: f32 = 15.0;
    pub const BRICK_MARGIN: f32 = 10.0;
    pub const BRICK_AREA_HEIGHT: f32 = 300.0;
    /// Brick collider half-extent as a fraction of the visual cell size
    pub const BRICK_COLLIDER_FRACTION: f32 = 1.0 / 3.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 400.0;
    pub const PADDLE_RESTITUTION: f32 = 1.2;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_MAX_SPEED: f32 = 400.0;
    pub const BALL_MIN_SPEED_MULTIPLIER: f32 = 0.8;
    pub const BALL_INITIAL_VELOCITY: (f32, f32) = (150.0, 300.0);
    /// Extra reach of the brick overlap test, for grazing hits
    pub const BALL_HIT_TOLERANCE: f32 = 1.0;

    /// Speed governor (simulation units, m/s)
    pub const SPEED_EPSILON: f32 = 0.1;
    pub const SPEED_BOOST_THRESHOLD: f32 = 0.5;

    /// Debug overlay velocity line length per m/s
    pub const DEBUG_LINE_LENGTH: f32 = 50.0;
}

/// Convert a render-space length to simulation space
#[inline]
pub fn to_world(pixels: f32) -> f32 {
    pixels * consts::METERS_PER_PIXEL
}

/// Convert a simulation-space length to render space
#[inline]
pub fn to_pixels(meters: f32) -> f32 {
    meters * consts::PIXELS_PER_METER
}

/// Convert a render-space vector to simulation space
#[inline]
pub fn vec_to_world(pixels: Vec2) -> Vec2 {
    pixels * consts::METERS_PER_PIXEL
}

/// Convert a simulation-space vector to render space
#[inline]
pub fn vec_to_pixels(meters: Vec2) -> Vec2 {
    meters * consts::PIXELS_PER_METER
}
