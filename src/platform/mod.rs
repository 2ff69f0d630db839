//! Platform abstraction layer
//!
//! Handles the host side of a frame:
//! - Frame time and close requests
//! - Keyboard state mapped to logical actions
//! - A demo autopilot that plays by itself

use std::collections::HashSet;

use crate::sim::{GameState, TickInput};
use crate::to_world;

/// Logical input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    DebugReset,
    Quit,
}

/// Physical keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    D,
    J,
    K,
    Left,
    Right,
    Space,
    Escape,
}

/// Key to action mapping
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(Key, Action)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (Key::A, Action::MoveLeft),
                (Key::J, Action::MoveLeft),
                (Key::Left, Action::MoveLeft),
                (Key::D, Action::MoveRight),
                (Key::K, Action::MoveRight),
                (Key::Right, Action::MoveRight),
                (Key::Space, Action::DebugReset),
                (Key::Escape, Action::Quit),
            ],
        }
    }
}

impl KeyBindings {
    pub fn bind(&mut self, key: Key, action: Action) {
        self.bindings.push((key, action));
    }

    /// Keys mapped to an action
    pub fn keys(&self, action: Action) -> impl Iterator<Item = Key> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, a)| *a == action)
            .map(|(k, _)| *k)
    }
}

/// Per-frame key queries, in terms of actions
pub trait InputSource {
    /// Held right now
    fn is_down(&self, action: Action) -> bool;
    /// Went down this frame
    fn is_pressed(&self, action: Action) -> bool;
}

/// Resolve actions into a frame's input. Right wins when both directions are held.
pub fn read_input(source: &impl InputSource) -> TickInput {
    TickInput {
        move_left: source.is_down(Action::MoveLeft),
        move_right: source.is_down(Action::MoveRight),
        debug_reset: source.is_pressed(Action::DebugReset),
        quit: source.is_pressed(Action::Quit) || source.is_down(Action::Quit),
    }
}

/// Keyboard state fed by host key events
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    bindings: KeyBindings,
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl Keyboard {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pressed: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Forget this frame's fresh presses
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for Keyboard {
    fn is_down(&self, action: Action) -> bool {
        self.bindings.keys(action).any(|k| self.held.contains(&k))
    }

    fn is_pressed(&self, action: Action) -> bool {
        self.bindings.keys(action).any(|k| self.pressed.contains(&k))
    }
}

/// Demo mode: keeps the paddle under the ball
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// No movement while the ball is this close to the paddle centre (pixels)
    pub dead_zone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { dead_zone: 10.0 }
    }
}

impl Autopilot {
    pub fn input(&self, state: &GameState) -> TickInput {
        let paddle = state.world.transform(state.paddle.body);
        let ball = state.world.transform(state.ball.body);
        let (Some(paddle), Some(ball)) = (paddle, ball) else {
            return TickInput::default();
        };

        let dx = ball.position.x - paddle.position.x;
        let dead_zone = to_world(self.dead_zone);
        TickInput {
            move_left: dx < -dead_zone,
            move_right: dx > dead_zone,
            ..Default::default()
        }
    }
}

/// The host driving the frame loop
pub trait Platform {
    /// Seconds since the previous frame
    fn frame_time(&mut self) -> f32;
    fn should_close(&self) -> bool;
    /// Input for the coming frame
    fn poll_input(&mut self, state: &GameState) -> TickInput;
}

/// Windowless platform with a fixed frame time and a frame budget
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    frame_time: f32,
    frames_left: u64,
    pub keyboard: Keyboard,
    pub autopilot: Option<Autopilot>,
}

impl HeadlessPlatform {
    pub fn new(frame_time: f32, frames: u64) -> Self {
        Self {
            frame_time,
            frames_left: frames,
            keyboard: Keyboard::default(),
            autopilot: None,
        }
    }

    pub fn with_autopilot(mut self) -> Self {
        self.autopilot = Some(Autopilot::default());
        self
    }
}

impl Platform for HeadlessPlatform {
    fn frame_time(&mut self) -> f32 {
        self.frames_left = self.frames_left.saturating_sub(1);
        self.frame_time
    }

    fn should_close(&self) -> bool {
        self.frames_left == 0
    }

    fn poll_input(&mut self, state: &GameState) -> TickInput {
        let mut input = read_input(&self.keyboard);
        if let Some(autopilot) = &self.autopilot {
            let steer = autopilot.input(state);
            input.move_left = steer.move_left;
            input.move_right = steer.move_right;
        }
        self.keyboard.end_frame();
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::Transform;
    use glam::Vec2;

    #[test]
    fn test_default_bindings() {
        let mut kb = Keyboard::default();
        kb.key_down(Key::J);
        assert!(kb.is_down(Action::MoveLeft));
        assert!(!kb.is_down(Action::MoveRight));

        kb.key_down(Key::D);
        let input = read_input(&kb);
        assert!(input.move_left && input.move_right);
    }

    #[test]
    fn test_pressed_only_for_one_frame() {
        let mut kb = Keyboard::default();
        kb.key_down(Key::Space);
        assert!(kb.is_pressed(Action::DebugReset));
        assert!(read_input(&kb).debug_reset);

        kb.end_frame();
        assert!(kb.is_down(Action::DebugReset));
        assert!(!read_input(&kb).debug_reset);

        // Holding the key does not re-trigger
        kb.key_down(Key::Space);
        assert!(!kb.is_pressed(Action::DebugReset));

        kb.key_up(Key::Space);
        kb.key_down(Key::Space);
        assert!(kb.is_pressed(Action::DebugReset));
    }

    #[test]
    fn test_arrow_keys_move() {
        let mut kb = Keyboard::default();
        kb.key_down(Key::Left);
        assert!(read_input(&kb).move_left);
        kb.key_up(Key::Left);
        kb.key_down(Key::Right);
        let input = read_input(&kb);
        assert!(input.move_right && !input.move_left);
    }

    #[test]
    fn test_custom_binding() {
        let mut bindings = KeyBindings::default();
        bindings.bind(Key::Space, Action::Quit);
        let mut kb = Keyboard::new(bindings);
        kb.key_down(Key::Space);
        let input = read_input(&kb);
        assert!(input.quit && input.debug_reset);
    }

    #[test]
    fn test_escape_quits() {
        let mut kb = Keyboard::default();
        kb.key_down(Key::Escape);
        assert!(read_input(&kb).quit);
    }

    #[test]
    fn test_autopilot_steers_toward_ball() {
        let mut state = GameState::new(&Settings::default()).unwrap();
        let paddle = state.world.transform(state.paddle.body).unwrap().position;

        let right_of = Transform::at(paddle + Vec2::new(3.0, -4.0));
        state.world.place_body(state.ball.body, right_of, Vec2::ZERO);
        let input = Autopilot::default().input(&state);
        assert!(input.move_right && !input.move_left);

        let above = Transform::at(paddle + Vec2::new(0.05, -4.0));
        state.world.place_body(state.ball.body, above, Vec2::ZERO);
        assert_eq!(Autopilot::default().input(&state), TickInput::default());
    }

    #[test]
    fn test_headless_frame_budget() {
        let mut platform = HeadlessPlatform::new(1.0 / 60.0, 2);
        assert!(!platform.should_close());
        platform.frame_time();
        assert!(!platform.should_close());
        platform.frame_time();
        assert!(platform.should_close());
    }
}
