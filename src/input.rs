//! Keyboard tracking for the simulation controls.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::vehicle::Controls;

/// Held keys plus the keys that went down since the last [`take_controls`].
///
/// [`take_controls`]: KeyboardState::take_controls
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key(code, event.state, event.repeat);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                if !repeat && self.held.insert(code) {
                    self.pressed.insert(code);
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Controls for this frame. Clears the pending presses.
    pub fn take_controls(&mut self) -> Controls {
        let pressed = std::mem::take(&mut self.pressed);
        let hit = |code| pressed.contains(&code);
        Controls {
            throttle: self.is_held(KeyCode::Space),
            mode_previous: hit(KeyCode::KeyQ),
            mode_next: hit(KeyCode::KeyE),
            ignition: hit(KeyCode::KeyI),
            air_conditioning: hit(KeyCode::KeyA),
            lights: hit(KeyCode::KeyL),
            left_signal: hit(KeyCode::ArrowLeft),
            right_signal: hit(KeyCode::ArrowRight),
            hazards: hit(KeyCode::KeyH),
            parking_brake: hit(KeyCode::KeyP),
            seatbelt: hit(KeyCode::KeyB),
        }
    }
}

/// Key bindings, printed at start-up.
pub const CONTROLS_HELP: &[(&str, &str)] = &[
    ("SPACE", "Throttle"),
    ("Q/E", "Switch display modes"),
    ("I", "Engine start/stop"),
    ("A", "AC toggle"),
    ("L", "Lights toggle"),
    ("LEFT/RIGHT", "Turn signals"),
    ("H", "Hazard lights"),
    ("P", "Parking brake"),
    ("B", "Seatbelt"),
    ("ESC", "Exit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_follows_held_key() {
        let mut keys = KeyboardState::new();
        keys.handle_key(KeyCode::Space, ElementState::Pressed, false);
        assert!(keys.take_controls().throttle);
        assert!(keys.take_controls().throttle);
        keys.handle_key(KeyCode::Space, ElementState::Released, false);
        assert!(!keys.take_controls().throttle);
    }

    #[test]
    fn test_toggle_fires_once_per_press() {
        let mut keys = KeyboardState::new();
        keys.handle_key(KeyCode::KeyI, ElementState::Pressed, false);
        assert!(keys.take_controls().ignition);
        // Still held: no new edge.
        assert!(!keys.take_controls().ignition);
        keys.handle_key(KeyCode::KeyI, ElementState::Released, false);
        keys.handle_key(KeyCode::KeyI, ElementState::Pressed, false);
        assert!(keys.take_controls().ignition);
    }

    #[test]
    fn test_repeats_ignored() {
        let mut keys = KeyboardState::new();
        keys.handle_key(KeyCode::KeyL, ElementState::Pressed, false);
        let _ = keys.take_controls();
        keys.handle_key(KeyCode::KeyL, ElementState::Pressed, true);
        assert!(!keys.take_controls().lights);
    }

    #[test]
    fn test_press_and_release_within_a_frame_still_counts() {
        let mut keys = KeyboardState::new();
        keys.handle_key(KeyCode::KeyH, ElementState::Pressed, false);
        keys.handle_key(KeyCode::KeyH, ElementState::Released, false);
        let controls = keys.take_controls();
        assert!(controls.hazards);
        assert!(!controls.throttle);
    }
}
