//! Game state and entity types
//!
//! `GameState` is the single owner of the physics world and of every entity
//! referring into it. Entities hold `BodyHandle`s only; the world owns the
//! bodies. Sizes, colors and brick positions are render space; positions and
//! velocities read from the world are simulation space.

use glam::Vec2;

use super::governor::SpeedGovernor;
use super::grid::GridLayout;
use super::scheduler::FixedStepScheduler;
use super::world::{BodyDef, BodyHandle, BodyKind, Material, PhysicsWorld, Shape, Transform};
use crate::consts::*;
use crate::error::SetupError;
use crate::renderer::colors::{self, Rgba};
use crate::settings::Settings;
use crate::{to_world, vec_to_world};

/// Why the ball went back to its spawn point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// Fell past the bottom of the playfield
    OutOfBounds,
    /// Debug reset key
    Manual,
}

/// Something that happened during a frame, in order of occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BrickDestroyed { index: usize, row: usize, column: usize },
    /// The last active brick was destroyed
    GridCleared,
    BallReset { reason: ResetReason },
    QuitRequested,
}

/// Ball lifecycle. `Resetting` never survives past the frame it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RespawnState {
    #[default]
    InPlay,
    Resetting(ResetReason),
}

/// The player's paddle (kinematic body)
#[derive(Debug, Clone)]
pub struct Paddle {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed in pixels per second
    pub movement_speed: f32,
    pub color: Rgba,
    pub body: BodyHandle,
}

impl Paddle {
    /// Half width in simulation units
    pub fn half_width_world(&self) -> f32 {
        to_world(self.width / 2.0)
    }

    /// Velocity for the held direction keys. Right wins when both are held.
    pub fn target_velocity(&self, left: bool, right: bool) -> Vec2 {
        let speed = to_world(self.movement_speed);
        let mut vx = 0.0;
        if left {
            vx = -speed;
        }
        if right {
            vx = speed;
        }
        Vec2::new(vx, 0.0)
    }
}

/// Snap a paddle centre back inside `[0, playfield_width]`.
///
/// Returns `None` when the paddle already fits. A paddle at least as wide as
/// the playfield is held at the centre.
pub fn clamp_paddle_x(x: f32, half_width: f32, playfield_width: f32) -> Option<f32> {
    if half_width * 2.0 >= playfield_width {
        let centre = playfield_width / 2.0;
        return (x != centre).then_some(centre);
    }
    if x - half_width < 0.0 {
        Some(half_width)
    } else if x + half_width > playfield_width {
        Some(playfield_width - half_width)
    } else {
        None
    }
}

/// The ball (dynamic body)
#[derive(Debug, Clone)]
pub struct Ball {
    /// Radius in pixels
    pub radius: f32,
    pub color: Rgba,
    /// Speed cap in m/s
    pub max_speed: f32,
    pub min_speed_multiplier: f32,
    /// Canonical launch velocity in m/s
    pub initial_velocity: Vec2,
    /// Spawn point in simulation units
    pub spawn: Vec2,
    pub body: BodyHandle,
}

impl Ball {
    pub fn governor(&self) -> SpeedGovernor {
        SpeedGovernor::new(self.max_speed, self.min_speed_multiplier)
    }

    pub fn spawn_transform(&self) -> Transform {
        Transform::at(self.spawn)
    }
}

/// A destructible brick. `active` is false exactly when `body` is null.
#[derive(Debug, Clone)]
pub struct Brick {
    /// Top-left corner in pixels
    pub position: Vec2,
    pub active: bool,
    pub body: BodyHandle,
}

/// Complete game state
pub struct GameState {
    /// Playfield size in pixels
    pub playfield: Vec2,
    pub layout: GridLayout,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Row-major, indexed by `GridLayout::index`; never shrinks during a level
    pub bricks: Vec<Brick>,
    /// Left, right, top
    pub walls: [BodyHandle; 3],
    pub respawn: RespawnState,
    pub scheduler: FixedStepScheduler,
    pub debug_overlay: bool,
    /// Frames simulated so far
    pub frame: u64,
    pub balls_lost: u32,
    pub world: PhysicsWorld,
    torn_down: bool,
}

impl GameState {
    /// Build the world and every entity in it
    pub fn new(settings: &Settings) -> Result<Self, SetupError> {
        let playfield = Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        let layout = GridLayout::new(settings.brick_columns, playfield.x, BRICK_AREA_HEIGHT)?;

        if !(settings.paddle_width > 0.0
            && settings.paddle_width < playfield.x
            && settings.paddle_height > 0.0)
        {
            return Err(SetupError::InvalidEntity {
                entity: "paddle",
                width: settings.paddle_width,
                height: settings.paddle_height,
            });
        }
        if !(settings.ball_radius > 0.0) {
            return Err(SetupError::InvalidEntity {
                entity: "ball",
                width: settings.ball_radius * 2.0,
                height: settings.ball_radius * 2.0,
            });
        }

        let world = PhysicsWorld::new(Vec2::ZERO);
        let (vx, vy) = BALL_INITIAL_VELOCITY;

        let mut state = Self {
            playfield,
            layout,
            paddle: Paddle {
                width: settings.paddle_width,
                height: settings.paddle_height,
                movement_speed: settings.paddle_speed,
                color: colors::PADDLE,
                body: BodyHandle::NULL,
            },
            ball: Ball {
                radius: settings.ball_radius,
                color: colors::BALL,
                max_speed: to_world(BALL_MAX_SPEED),
                min_speed_multiplier: settings.ball_min_speed_multiplier,
                initial_velocity: vec_to_world(Vec2::new(vx, vy)),
                spawn: vec_to_world(Vec2::new(playfield.x / 2.0, playfield.y / 2.0)),
                body: BodyHandle::NULL,
            },
            bricks: Vec::with_capacity(layout.len()),
            walls: [BodyHandle::NULL; 3],
            respawn: RespawnState::InPlay,
            scheduler: FixedStepScheduler::default(),
            debug_overlay: settings.debug_overlay,
            frame: 0,
            balls_lost: 0,
            world,
            torn_down: false,
        };

        state.create_paddle()?;
        state.create_ball()?;
        state.create_walls()?;
        state.create_bricks()?;

        state
            .world
            .set_linear_velocity(state.ball.body, state.ball.initial_velocity);

        log::info!(
            "Level ready: {}x{} bricks ({:.3}x{:.3} px), {} bodies",
            layout.columns,
            layout.rows,
            layout.cell_width,
            layout.cell_height,
            state.world.body_count()
        );
        Ok(state)
    }

    fn create_paddle(&mut self) -> Result<(), SetupError> {
        let spawn = Vec2::new(
            self.playfield.x / 2.0,
            self.playfield.y - self.playfield.y / 5.0,
        );
        let body = self
            .world
            .create_body(&BodyDef::new(BodyKind::Kinematic, vec_to_world(spawn)));
        let shape = Shape::Box {
            half_extents: vec_to_world(Vec2::new(self.paddle.width, self.paddle.height) / 2.0),
        };
        let material = Material {
            friction: 0.0,
            restitution: PADDLE_RESTITUTION,
        };
        if !self.world.attach_shape(body, shape, material) {
            return Err(SetupError::BodyCreation("paddle"));
        }
        self.paddle.body = body;
        Ok(())
    }

    fn create_ball(&mut self) -> Result<(), SetupError> {
        let mut def = BodyDef::new(BodyKind::Dynamic, self.ball.spawn);
        def.ccd = true;
        let body = self.world.create_body(&def);
        let shape = Shape::Circle {
            radius: to_world(self.ball.radius),
        };
        if !self.world.attach_shape(body, shape, Material::BOUNCY) {
            return Err(SetupError::BodyCreation("ball"));
        }
        self.ball.body = body;
        Ok(())
    }

    fn create_walls(&mut self) -> Result<(), SetupError> {
        let (w, h, t) = (self.playfield.x, self.playfield.y, WALL_HALF_THICKNESS);
        // (centre, half extents) in pixels
        let walls = [
            (Vec2::new(-t, h / 2.0), Vec2::new(t, h / 2.0)),
            (Vec2::new(w + t, h / 2.0), Vec2::new(t, h / 2.0)),
            (Vec2::new(w / 2.0, -t), Vec2::new(w / 2.0, t)),
        ];
        for (slot, (centre, half)) in self.walls.iter_mut().zip(walls) {
            let body = self
                .world
                .create_body(&BodyDef::new(BodyKind::Static, vec_to_world(centre)));
            let shape = Shape::Box {
                half_extents: vec_to_world(half),
            };
            if !self.world.attach_shape(body, shape, Material::BOUNCY) {
                return Err(SetupError::BodyCreation("wall"));
            }
            *slot = body;
        }
        Ok(())
    }

    fn create_bricks(&mut self) -> Result<(), SetupError> {
        let layout = self.layout;
        let size = layout.cell_size();
        let half_extents = vec_to_world(size * BRICK_COLLIDER_FRACTION);

        self.bricks.clear();
        for index in 0..layout.len() {
            let (row, column) = layout.cell(index);
            let position = layout.cell_origin(row, column);
            let centre = vec_to_world(position + size / 2.0);

            let body = self
                .world
                .create_body(&BodyDef::new(BodyKind::Static, centre));
            if !self
                .world
                .attach_shape(body, Shape::Box { half_extents }, Material::BOUNCY)
            {
                return Err(SetupError::BodyCreation("brick"));
            }
            self.bricks.push(Brick {
                position,
                active: true,
                body,
            });
        }
        Ok(())
    }

    /// Number of bricks still standing
    pub fn active_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    /// Ball centre in pixels
    pub fn ball_position_px(&self) -> Option<Vec2> {
        self.world
            .transform(self.ball.body)
            .map(|t| crate::vec_to_pixels(t.position))
    }

    /// Ball velocity in m/s
    pub fn ball_velocity(&self) -> Option<Vec2> {
        self.world.linear_velocity(self.ball.body)
    }

    /// Put the ball back at spawn with the canonical velocity, in one write
    pub fn reset_ball(&mut self, reason: ResetReason) {
        self.respawn = RespawnState::Resetting(reason);
        self.world.place_body(
            self.ball.body,
            self.ball.spawn_transform(),
            self.ball.initial_velocity,
        );
        if reason == ResetReason::OutOfBounds {
            self.balls_lost += 1;
        }
        self.respawn = RespawnState::InPlay;
        log::debug!("Ball reset ({reason:?})");
    }

    /// Reset the ball if it has dropped past the bottom edge
    pub fn check_out_of_bounds(&mut self) -> Option<ResetReason> {
        let t = self.world.transform(self.ball.body)?;
        if t.position.y >= to_world(self.playfield.y) {
            self.reset_ball(ResetReason::OutOfBounds);
            Some(ResetReason::OutOfBounds)
        } else {
            None
        }
    }

    /// Keep the paddle inside the playfield, forcing its transform if needed
    pub fn clamp_paddle(&mut self) {
        let Some(t) = self.world.transform(self.paddle.body) else {
            return;
        };
        if let Some(x) = clamp_paddle_x(
            t.position.x,
            self.paddle.half_width_world(),
            to_world(self.playfield.x),
        ) {
            self.world
                .set_transform(self.paddle.body, Transform::at(Vec2::new(x, t.position.y)));
        }
    }

    /// Release every body, then the world. Safe to call more than once.
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let mut destroyed = 0;
        for brick in &mut self.bricks {
            if self.world.destroy_body(&mut brick.body) {
                destroyed += 1;
            }
            brick.active = false;
        }
        destroyed += usize::from(self.world.destroy_body(&mut self.paddle.body));
        destroyed += usize::from(self.world.destroy_body(&mut self.ball.body));
        for wall in &mut self.walls {
            destroyed += usize::from(self.world.destroy_body(wall));
        }
        self.world.destroy();
        self.bricks.clear();
        self.torn_down = true;
        log::debug!("Teardown released {destroyed} bodies");
    }

    /// End the session, tearing down the world
    pub fn shutdown(mut self) {
        self.teardown();
        log::info!(
            "Shutdown after {} frames ({} balls lost)",
            self.frame,
            self.balls_lost
        );
    }
}

impl Drop for GameState {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_state_builds_level() {
        let state = GameState::new(&Settings::default()).unwrap();
        assert_eq!(state.bricks.len(), 64);
        assert_eq!(state.active_bricks(), 64);
        // paddle + ball + 3 walls + bricks
        assert_eq!(state.world.body_count(), 5 + 64);
        assert!(state.bricks.iter().all(|b| b.active && !b.body.is_null()));

        let vel = state.ball_velocity().unwrap();
        assert_eq!(vel, Vec2::new(3.0, 6.0));
        let pos = state.ball_position_px().unwrap();
        assert!((pos - Vec2::new(640.0, 360.0)).length() < 1e-3);
    }

    #[test]
    fn test_column_override_changes_layout() {
        let settings = Settings {
            brick_columns: 10,
            ..Default::default()
        };
        let state = GameState::new(&settings).unwrap();
        assert_eq!(state.bricks.len(), 80);
        assert!((state.layout.cell_width - (1260.0 - 135.0) / 10.0).abs() < 1e-4);
        assert_eq!(state.bricks[1].position, state.layout.cell_origin(0, 1));
    }

    #[test]
    fn test_invalid_settings_are_setup_errors() {
        let settings = Settings {
            brick_columns: 0,
            ..Default::default()
        };
        assert!(matches!(GameState::new(&settings), Err(SetupError::NoColumns)));

        let settings = Settings {
            paddle_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(&settings),
            Err(SetupError::InvalidEntity { entity: "paddle", .. })
        ));

        let settings = Settings {
            paddle_width: PLAYFIELD_WIDTH,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(&settings),
            Err(SetupError::InvalidEntity { entity: "paddle", .. })
        ));
    }

    #[test]
    fn test_oversized_paddle_is_centred() {
        let width = 25.6;
        assert_eq!(clamp_paddle_x(0.0, 20.0, width), Some(12.8));
        assert_eq!(clamp_paddle_x(12.8, 20.0, width), None);
        assert_eq!(clamp_paddle_x(25.0, 12.8, width), Some(12.8));
    }

    #[test]
    fn test_target_velocity_right_wins() {
        let state = GameState::new(&Settings::default()).unwrap();
        let paddle = &state.paddle;
        assert_eq!(paddle.target_velocity(false, false), Vec2::ZERO);
        assert_eq!(paddle.target_velocity(true, false), Vec2::new(-8.0, 0.0));
        assert_eq!(paddle.target_velocity(false, true), Vec2::new(8.0, 0.0));
        assert_eq!(paddle.target_velocity(true, true), Vec2::new(8.0, 0.0));
    }

    #[test]
    fn test_out_of_bounds_resets_position_and_velocity() {
        let mut state = GameState::new(&Settings::default()).unwrap();
        let below = Transform::at(Vec2::new(3.0, to_world(720.0) + 0.5));
        state
            .world
            .place_body(state.ball.body, below, Vec2::new(-1.0, 5.0));

        assert_eq!(state.check_out_of_bounds(), Some(ResetReason::OutOfBounds));
        assert_eq!(state.respawn, RespawnState::InPlay);
        assert_eq!(state.balls_lost, 1);

        let t = state.world.transform(state.ball.body).unwrap();
        assert_eq!(t.position, state.ball.spawn);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(state.ball_velocity().unwrap(), state.ball.initial_velocity);

        // Back in play: no second trigger
        assert_eq!(state.check_out_of_bounds(), None);
    }

    #[test]
    fn test_exactly_on_bottom_edge_triggers() {
        let mut state = GameState::new(&Settings::default()).unwrap();
        let edge = Transform::at(Vec2::new(3.0, to_world(720.0)));
        state.world.place_body(state.ball.body, edge, Vec2::ZERO);
        assert!(state.check_out_of_bounds().is_some());
    }

    #[test]
    fn test_manual_reset_does_not_count_as_lost() {
        let mut state = GameState::new(&Settings::default()).unwrap();
        state.reset_ball(ResetReason::Manual);
        assert_eq!(state.balls_lost, 0);
        assert_eq!(state.ball_velocity().unwrap(), state.ball.initial_velocity);
    }

    #[test]
    fn test_clamp_paddle_snaps_to_edges() {
        let mut state = GameState::new(&Settings::default()).unwrap();
        let y = state.world.transform(state.paddle.body).unwrap().position.y;

        state
            .world
            .set_transform(state.paddle.body, Transform::at(Vec2::new(-5.0, y)));
        state.clamp_paddle();
        let x = state.world.transform(state.paddle.body).unwrap().position.x;
        assert!((x - 1.0).abs() < 1e-5);

        state
            .world
            .set_transform(state.paddle.body, Transform::at(Vec2::new(40.0, y)));
        state.clamp_paddle();
        let x = state.world.transform(state.paddle.body).unwrap().position.x;
        assert!((x - (25.6 - 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut state = GameState::new(&Settings::default()).unwrap();
        state.teardown();
        assert_eq!(state.world.body_count(), 0);
        assert!(state.paddle.body.is_null());
        assert!(state.ball.body.is_null());
        assert!(state.walls.iter().all(BodyHandle::is_null));

        // Second pass is a no-op
        state.teardown();
        state.shutdown();
    }

    proptest! {
        #[test]
        fn prop_clamp_is_idempotent(x in -50.0f32..80.0, half in 0.1f32..30.0) {
            let width = 25.6;
            let once = clamp_paddle_x(x, half, width).unwrap_or(x);
            let twice = clamp_paddle_x(once, half, width).unwrap_or(once);
            prop_assert_eq!(once, twice);
        }
    }
}
