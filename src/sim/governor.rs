//! Ball speed governor
//!
//! Applied once per frame after the physics step. Three bands:
//! - faster than max: scaled down to exactly max
//! - between epsilon and `boost_threshold * max`: scaled up to `min_multiplier * max`
//! - anything else (including a near-stationary ball): left alone
//!
//! The band between the boost threshold and max is untouched so the governor
//! does not fight the engine's contact response every frame.

use glam::Vec2;

use crate::consts::{SPEED_BOOST_THRESHOLD, SPEED_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedGovernor {
    /// Upper speed bound (m/s)
    pub max_speed: f32,
    /// Fraction of max a slow ball is boosted to
    pub min_multiplier: f32,
    /// Fraction of max below which boosting kicks in
    pub boost_threshold: f32,
    /// Speeds at or below this are never rescaled
    pub epsilon: f32,
}

impl SpeedGovernor {
    pub fn new(max_speed: f32, min_multiplier: f32) -> Self {
        Self {
            max_speed,
            min_multiplier,
            boost_threshold: SPEED_BOOST_THRESHOLD,
            epsilon: SPEED_EPSILON,
        }
    }

    /// Governed velocity, or `None` when `velocity` is already acceptable
    pub fn govern(&self, velocity: Vec2) -> Option<Vec2> {
        let speed = velocity.length();

        if speed > self.max_speed {
            Some(velocity * (self.max_speed / speed))
        } else if speed > self.epsilon && speed < self.max_speed * self.boost_threshold {
            let target = self.max_speed * self.min_multiplier;
            Some(velocity * (target / speed))
        } else {
            None
        }
    }

    /// `govern`, falling back to the input velocity
    pub fn apply(&self, velocity: Vec2) -> Vec2 {
        self.govern(velocity).unwrap_or(velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn governor() -> SpeedGovernor {
        SpeedGovernor::new(8.0, 0.8)
    }

    #[test]
    fn test_double_speed_clamped_to_max() {
        let v = Vec2::new(3.0, 4.0).normalize() * 16.0;
        let out = governor().apply(v);
        assert!((out.length() - 8.0).abs() < 1e-5);
        assert!((out.normalize() - v.normalize()).length() < 1e-6);
    }

    #[test]
    fn test_slow_ball_boosted() {
        let v = Vec2::new(0.0, -2.0);
        let out = governor().apply(v);
        assert!((out.length() - 6.4).abs() < 1e-5);
        assert!(out.y < 0.0 && out.x == 0.0);
    }

    #[test]
    fn test_mid_band_untouched() {
        let g = governor();
        assert_eq!(g.govern(Vec2::new(5.0, 0.0)), None);
        assert_eq!(g.govern(Vec2::new(0.0, 8.0)), None);
        assert_eq!(g.govern(Vec2::new(4.0, 0.0)), None);
    }

    #[test]
    fn test_near_zero_dead_zone() {
        let g = governor();
        assert_eq!(g.govern(Vec2::ZERO), None);
        assert_eq!(g.govern(Vec2::new(0.05, 0.05)), None);
    }

    proptest! {
        #[test]
        fn prop_governed_speed_in_band(x in -40.0f32..40.0, y in -40.0f32..40.0) {
            let g = governor();
            let v = Vec2::new(x, y);
            let s = v.length();
            let out = g.apply(v).length();

            prop_assert!(out <= g.max_speed + 1e-4);
            if s <= g.epsilon {
                prop_assert_eq!(out, s);
            } else {
                // Boosted to the floor, or left in the untouched band
                let floor = g.max_speed * g.min_multiplier.min(g.boost_threshold);
                prop_assert!(out >= floor - 1e-4, "speed {} -> {}", s, out);
            }
        }

        #[test]
        fn prop_direction_preserved(x in -40.0f32..40.0, y in -40.0f32..40.0) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > 0.2);
            let out = governor().apply(v);
            prop_assert!((out.normalize() - v.normalize()).length() < 1e-4);
        }
    }
}
