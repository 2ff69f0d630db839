//! Per-frame update
//!
//! Order within a frame:
//! 1. input sets the paddle velocity (and may trigger a debug reset)
//! 2. the scheduler steps the world in equal substeps
//! 3. the paddle is clamped to the playfield
//! 4. at most one brick is destroyed
//! 5. the speed governor normalizes the ball
//! 6. an out-of-bounds ball is respawned

use super::collision::resolve_brick_collision;
use super::scheduler::StepPlan;
use super::state::{GameEvent, GameState, ResetReason};

/// Input for one frame (logical actions, already resolved from keys)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held
    pub move_left: bool,
    /// Held. Wins over `move_left` when both are set.
    pub move_right: bool,
    /// Pressed this frame; ignored unless the debug overlay is enabled
    pub debug_reset: bool,
    /// Pressed this frame
    pub quit: bool,
}

/// What a frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// `None` when the frame was cut short by a quit request
    pub plan: Option<StepPlan>,
    pub events: Vec<GameEvent>,
}

impl FrameReport {
    pub fn quit_requested(&self) -> bool {
        self.events.contains(&GameEvent::QuitRequested)
    }
}

/// Advance the game by one rendered frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> FrameReport {
    let mut report = FrameReport::default();

    if input.quit {
        report.events.push(GameEvent::QuitRequested);
        return report;
    }

    let velocity = state
        .paddle
        .target_velocity(input.move_left, input.move_right);
    state.world.set_linear_velocity(state.paddle.body, velocity);

    if input.debug_reset && state.debug_overlay {
        state.reset_ball(ResetReason::Manual);
        report.events.push(GameEvent::BallReset {
            reason: ResetReason::Manual,
        });
    }

    report.plan = Some(state.scheduler.advance(&mut state.world, dt));
    state.clamp_paddle();

    let had_bricks = state.active_bricks() > 0;
    if let Some(hit) = resolve_brick_collision(
        &mut state.world,
        &mut state.bricks,
        &state.layout,
        &state.ball,
    ) {
        log::debug!("brick ({}, {}) destroyed", hit.row, hit.column);
        report.events.push(GameEvent::BrickDestroyed {
            index: hit.index,
            row: hit.row,
            column: hit.column,
        });
        if had_bricks && state.active_bricks() == 0 {
            report.events.push(GameEvent::GridCleared);
        }
    }

    if let Some(v) = state.ball_velocity() {
        if let Some(governed) = state.ball.governor().govern(v) {
            state.world.set_linear_velocity(state.ball.body, governed);
        }
    }

    if let Some(reason) = state.check_out_of_bounds() {
        report.events.push(GameEvent::BallReset { reason });
    }

    state.frame += 1;
    report
}
