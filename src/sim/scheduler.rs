//! Fixed-step scheduler
//!
//! Splits one variable-length frame into equal substeps no longer than the
//! target, so physics stays stable however slow or spiky the frame rate is.

use super::world::PhysicsWorld;
use crate::consts::{MAX_STEPS_PER_FRAME, SOLVER_ITERATIONS, SUBSTEP_RATE_HZ};

/// How one frame is split up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Number of world steps (always at least 1)
    pub steps: u32,
    /// Duration of each step in seconds
    pub substep: f32,
}

/// Converts wall-clock frame time into world steps
#[derive(Debug, Clone, Copy)]
pub struct FixedStepScheduler {
    /// Substeps per second at the target duration
    rate_hz: f32,
    /// Solver iterations per world step
    iterations: usize,
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self::new(SUBSTEP_RATE_HZ, SOLVER_ITERATIONS)
    }
}

impl FixedStepScheduler {
    pub fn new(rate_hz: f32, iterations: usize) -> Self {
        Self {
            rate_hz: rate_hz.max(1.0),
            iterations,
        }
    }

    /// Longest substep this scheduler will produce
    pub fn target(&self) -> f32 {
        1.0 / self.rate_hz
    }

    /// `steps = floor(dt / target) + 1`, `substep = dt / steps`
    ///
    /// Multiplying by the rate instead of dividing by the target keeps exact
    /// multiples (1/30 s at 120 Hz) from landing one step short in f32.
    ///
    /// Steps are capped at `MAX_STEPS_PER_FRAME`; past that the substep grows
    /// beyond the target instead of the frame running unbounded work.
    pub fn plan(&self, dt: f32) -> StepPlan {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let wanted = (dt * self.rate_hz).floor();
        let steps = if wanted >= MAX_STEPS_PER_FRAME as f32 {
            log::warn!("frame of {dt}s capped at {MAX_STEPS_PER_FRAME} steps");
            MAX_STEPS_PER_FRAME
        } else {
            wanted as u32 + 1
        };
        StepPlan {
            steps,
            substep: dt / steps as f32,
        }
    }

    /// Step the world through one frame of `dt` seconds
    pub fn advance(&self, world: &mut PhysicsWorld, dt: f32) -> StepPlan {
        let plan = self.plan(dt);
        for _ in 0..plan.steps {
            world.step(plan.substep, self.iterations);
        }
        log::trace!("frame {dt:.5}s -> {} x {:.5}s", plan.steps, plan.substep);
        plan
    }
}
