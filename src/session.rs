//! Frame driver
//!
//! One frame: poll input, tick, capture, draw. The session owns the game
//! state and guarantees it is torn down however the loop ends.

use crate::consts::MAX_FRAME_TIME;
use crate::error::SetupError;
use crate::platform::Platform;
use crate::renderer::{Canvas, Scene, draw_scene};
use crate::settings::Settings;
use crate::sim::{FrameReport, GameEvent, GameState, tick};

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Rolling frame rate over the last `FPS_WINDOW` frame times
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f32; FPS_WINDOW],
    frame_index: usize,
    filled: usize,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            filled: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, dt: f32) {
        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.filled = (self.filled + 1).min(FPS_WINDOW);
    }

    /// None until at least one positive frame time is recorded
    pub fn fps(&self) -> Option<u32> {
        let elapsed: f32 = self.frame_times[..self.filled].iter().sum();
        if elapsed > 0.0 {
            Some((self.filled as f32 / elapsed).round() as u32)
        } else {
            None
        }
    }
}

/// What a finished run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub bricks_destroyed: u32,
    pub bricks_remaining: usize,
    pub balls_lost: u32,
    pub grid_cleared: bool,
    pub quit_requested: bool,
    /// Primitives the canvas failed to draw
    pub draw_failures: u64,
}

/// A running game
pub struct Session {
    state: GameState,
    fps: FpsCounter,
    summary: RunSummary,
}

impl Session {
    pub fn new(settings: &Settings) -> Result<Self, SetupError> {
        let state = GameState::new(settings)?;
        log::info!(
            "session ready: {} bricks in {}x{} grid",
            state.bricks.len(),
            state.layout.rows,
            state.layout.columns
        );
        Ok(Self {
            state,
            fps: FpsCounter::default(),
            summary: RunSummary::default(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Run one frame against the host
    pub fn frame(&mut self, platform: &mut impl Platform, canvas: &mut impl Canvas) -> FrameReport {
        let input = platform.poll_input(&self.state);

        let raw_dt = platform.frame_time();
        let dt = if raw_dt > MAX_FRAME_TIME {
            log::debug!("frame time {raw_dt:.3}s clamped to {MAX_FRAME_TIME}s");
            MAX_FRAME_TIME
        } else {
            raw_dt
        };

        let report = tick(&mut self.state, &input, dt);
        self.fps.record(dt);
        self.record(&report);

        let scene = Scene::capture(&self.state, self.fps.fps());
        self.summary.draw_failures += draw_scene(canvas, &scene) as u64;

        report
    }

    fn record(&mut self, report: &FrameReport) {
        self.summary.frames += 1;
        for event in &report.events {
            match *event {
                GameEvent::BrickDestroyed { index, row, column } => {
                    self.summary.bricks_destroyed += 1;
                    log::debug!("brick {index} destroyed (row {row}, column {column})");
                }
                GameEvent::GridCleared => {
                    self.summary.grid_cleared = true;
                    log::info!("all bricks cleared after {} frames", self.summary.frames);
                }
                GameEvent::BallReset { reason } => {
                    log::info!("ball reset: {reason:?}");
                }
                GameEvent::QuitRequested => {
                    self.summary.quit_requested = true;
                    log::info!("quit requested");
                }
            }
        }
    }

    /// Drive frames until the platform closes or the player quits,
    /// then tear the world down
    pub fn run(mut self, platform: &mut impl Platform, canvas: &mut impl Canvas) -> RunSummary {
        while !platform.should_close() {
            let report = self.frame(platform, canvas);
            if report.quit_requested() {
                break;
            }
        }

        let mut summary = self.summary;
        summary.bricks_remaining = self.state.active_bricks();
        summary.balls_lost = self.state.balls_lost;
        self.state.shutdown();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrawError;
    use crate::platform::{HeadlessPlatform, Key};
    use crate::renderer::colors::Rgba;
    use glam::Vec2;

    #[derive(Default)]
    struct CountingCanvas {
        clears: usize,
    }

    impl Canvas for CountingCanvas {
        fn clear(&mut self, _: Rgba) {
            self.clears += 1;
        }

        fn fill_rect(&mut self, _: Vec2, _: Vec2, _: Rgba) -> Result<(), DrawError> {
            Ok(())
        }

        fn fill_circle(&mut self, _: Vec2, _: f32, _: Rgba) -> Result<(), DrawError> {
            Err(DrawError::TargetLost)
        }
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        assert_eq!(fps.fps(), None);
        for _ in 0..120 {
            fps.record(1.0 / 60.0);
        }
        assert_eq!(fps.fps(), Some(60));
        fps.record(0.0);
        assert!(fps.fps().is_some());
    }

    #[test]
    fn test_run_until_frame_budget() {
        let session = Session::new(&Settings::default()).unwrap();
        let mut platform = HeadlessPlatform::new(1.0 / 60.0, 30);
        let mut canvas = CountingCanvas::default();

        let summary = session.run(&mut platform, &mut canvas);
        assert_eq!(summary.frames, 30);
        assert_eq!(canvas.clears, 30);
        // The ball circle fails every frame
        assert_eq!(summary.draw_failures, 30);
        assert!(!summary.quit_requested);
    }

    #[test]
    fn test_escape_ends_run() {
        let session = Session::new(&Settings::default()).unwrap();
        let mut platform = HeadlessPlatform::new(1.0 / 60.0, 1000);
        platform.keyboard.key_down(Key::Escape);
        let mut canvas = CountingCanvas::default();

        let summary = session.run(&mut platform, &mut canvas);
        assert!(summary.quit_requested);
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.bricks_remaining, 64);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut session = Session::new(&Settings::default()).unwrap();
        let mut platform = HeadlessPlatform::new(5.0, 10);
        let mut canvas = CountingCanvas::default();

        let report = session.frame(&mut platform, &mut canvas);
        let plan = report.plan.unwrap();
        // 0.25 s at 120 Hz
        assert_eq!(plan.steps, 31);
    }

    #[test]
    fn test_autopilot_run_keeps_playing() {
        let session = Session::new(&Settings::default()).unwrap();
        let mut platform = HeadlessPlatform::new(1.0 / 60.0, 600).with_autopilot();
        let mut canvas = CountingCanvas::default();

        let summary = session.run(&mut platform, &mut canvas);
        assert_eq!(summary.frames, 600);
        assert_eq!(
            summary.bricks_remaining + summary.bricks_destroyed as usize,
            64
        );
    }
}
