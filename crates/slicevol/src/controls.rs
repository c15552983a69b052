//! Polled input.
//!
//! Window and device events only update [`InputState`]. Once per frame the
//! render loop takes an [`InputSnapshot`], which resets the accumulated
//! deltas, and applies it to the camera.

use std::collections::HashSet;

use glam::Vec2;
use slicevol_render::CameraMovement;
use winit::keyboard::KeyCode;

/// Movement keys and the direction each one drives.
const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 4] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
];

/// Input accumulated between frames.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    mouse_delta: Vec2,
    scroll: f32,
    exit_requested: bool,
}

/// What the frame should react to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Movement directions whose keys are held, in a fixed order.
    pub movement: Vec<CameraMovement>,
    /// Raw mouse motion since the last snapshot, in pixels (y down).
    pub mouse_delta: Vec2,
    /// Scroll lines since the last snapshot.
    pub scroll: f32,
    /// Escape was pressed.
    pub exit_requested: bool,
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_pressed(&mut self, code: KeyCode) {
        if code == KeyCode::Escape {
            self.exit_requested = true;
        }
        self.held.insert(code);
    }

    pub fn key_released(&mut self, code: KeyCode) {
        self.held.remove(&code);
    }

    pub fn mouse_moved(&mut self, dx: f32, dy: f32) {
        self.mouse_delta += Vec2::new(dx, dy);
    }

    pub fn scrolled(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// Drops held keys, e.g. when the window loses focus and releases go missing.
    pub fn clear_held(&mut self) {
        self.held.clear();
    }

    #[must_use]
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Takes this frame's input. Deltas reset; held keys persist.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let movement = MOVEMENT_KEYS
            .iter()
            .filter(|(code, _)| self.held.contains(code))
            .map(|&(_, movement)| movement)
            .collect();

        InputSnapshot {
            movement,
            mouse_delta: std::mem::take(&mut self.mouse_delta),
            scroll: std::mem::take(&mut self.scroll),
            exit_requested: self.exit_requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_snapshot_resets_deltas() {
        let mut input = InputState::new();
        input.mouse_moved(3.0, -2.0);
        input.mouse_moved(1.0, 1.0);
        input.scrolled(1.5);

        let first = input.snapshot();
        assert_eq!(first.mouse_delta, Vec2::new(4.0, -1.0));
        assert!((first.scroll - 1.5).abs() < f32::EPSILON);

        let second = input.snapshot();
        assert_eq!(second.mouse_delta, Vec2::ZERO);
        assert_eq!(second.scroll, 0.0);
    }

    #[test]
    fn test_held_keys_persist_across_snapshots() {
        let mut input = InputState::new();
        input.key_pressed(KeyCode::KeyD);
        input.key_pressed(KeyCode::KeyW);
        input.key_pressed(KeyCode::KeyQ);

        let expected = vec![CameraMovement::Forward, CameraMovement::Right];
        assert_eq!(input.snapshot().movement, expected);
        assert_eq!(input.snapshot().movement, expected);

        input.key_released(KeyCode::KeyW);
        assert_eq!(input.snapshot().movement, vec![CameraMovement::Right]);

        input.clear_held();
        assert!(input.snapshot().movement.is_empty());
    }

    #[test]
    fn test_escape_requests_exit() {
        let mut input = InputState::new();
        assert!(!input.snapshot().exit_requested);
        input.key_pressed(KeyCode::Escape);
        assert!(input.snapshot().exit_requested);
    }

    proptest! {
        #[test]
        fn prop_motion_accumulates_until_snapshot(
            moves in proptest::collection::vec((-500i16..500, -500i16..500), 0..64)
        ) {
            let mut input = InputState::new();
            let mut expected = Vec2::ZERO;
            for &(dx, dy) in &moves {
                input.mouse_moved(f32::from(dx), f32::from(dy));
                expected += Vec2::new(f32::from(dx), f32::from(dy));
            }
            prop_assert_eq!(input.snapshot().mouse_delta, expected);
            prop_assert_eq!(input.snapshot().mouse_delta, Vec2::ZERO);
        }
    }
}
