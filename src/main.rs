//! Brickfall entry point
//!
//! Runs the game headless with the autopilot at the paddle.
//! Usage: `brickfall [config.json] [frames]`

use brickfall::platform::HeadlessPlatform;
use brickfall::renderer::{Canvas, colors::Rgba};
use brickfall::{DrawError, Session, Settings};
use glam::Vec2;

/// Frames simulated when no count is given (one minute at 60 Hz)
const DEFAULT_FRAMES: u64 = 3600;
const FRAME_TIME: f32 = 1.0 / 60.0;

/// Canvas that only counts what it is asked to draw
#[derive(Default)]
struct TallyCanvas {
    rects: u64,
    circles: u64,
}

impl Canvas for TallyCanvas {
    fn clear(&mut self, _color: Rgba) {}

    fn fill_rect(&mut self, _: Vec2, _: Vec2, _: Rgba) -> Result<(), DrawError> {
        self.rects += 1;
        Ok(())
    }

    fn fill_circle(&mut self, _: Vec2, _: f32, _: Rgba) -> Result<(), DrawError> {
        self.circles += 1;
        Ok(())
    }
}

fn main() {
    env_logger::init();
    log::info!("Brickfall (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::warn!("Invalid frame count, using {DEFAULT_FRAMES}: {e}");
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };

    let session = match Session::new(&settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Setup failed: {e}");
            std::process::exit(1);
        }
    };

    let mut platform = HeadlessPlatform::new(FRAME_TIME, frames).with_autopilot();
    let mut canvas = TallyCanvas::default();
    let summary = session.run(&mut platform, &mut canvas);

    log::info!(
        "{} frames: {} bricks destroyed, {} remaining, {} balls lost",
        summary.frames,
        summary.bricks_destroyed,
        summary.bricks_remaining,
        summary.balls_lost
    );
    log::debug!("drew {} rects, {} circles", canvas.rects, canvas.circles);
}
