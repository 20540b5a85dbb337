use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::{Direction, FlyCamera};

/// Keys the flight controls respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    LeftShift,
    /// Held for fast movement.
    T,
}

const KEY_BINDINGS: [(Key, Direction); 6] = [
    (Key::W, Direction::Front),
    (Key::A, Direction::Left),
    (Key::S, Direction::Back),
    (Key::D, Direction::Right),
    (Key::Space, Direction::Up),
    (Key::LeftShift, Direction::Down),
];

/// Movement speeds in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveSpeeds {
    pub normal: f32,
    pub fast: f32,
}

impl Default for MoveSpeeds {
    fn default() -> Self {
        Self {
            normal: 400.0,
            fast: 1000.0,
        }
    }
}

/// Input snapshot for one frame, owned by the caller and passed explicitly.
#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<Key>,
    /// Absolute cursor position in pixels.
    pub mouse_pos: Vec2,
    pub cursor_locked: bool,
    /// Set while the next locked mouse sample must only seed `last_mouse`.
    pub first_mouse: bool,
    pub last_mouse: Vec2,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            mouse_pos: Vec2::ZERO,
            cursor_locked: true,
            first_mouse: true,
            last_mouse: Vec2::ZERO,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn move_mouse_by(&mut self, delta: Vec2) {
        self.mouse_pos += delta;
    }

    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }
}

/// Turn cursor motion into camera rotation. While the cursor is unlocked the
/// latch is re-armed so re-locking never produces a jump.
pub fn process_mouse(input: &mut InputState, camera: &mut FlyCamera, sensitivity: f32) {
    if !input.cursor_locked {
        input.first_mouse = true;
        return;
    }

    if input.first_mouse {
        input.last_mouse = input.mouse_pos;
        input.first_mouse = false;
    }

    let offset = input.mouse_pos - input.last_mouse;
    input.last_mouse = input.mouse_pos;

    // Screen y grows downward
    camera.rotate(offset.x * sensitivity, -offset.y * sensitivity);
}

/// Move the camera along every held direction for `dt` seconds.
pub fn process_keyboard(input: &InputState, camera: &mut FlyCamera, dt: f32, speeds: &MoveSpeeds) {
    let speed = if input.is_down(Key::T) {
        speeds.fast
    } else {
        speeds.normal
    };
    let distance = speed * dt;

    for (key, direction) in KEY_BINDINGS {
        if input.is_down(key) {
            camera.move_dir(direction, distance);
        }
    }
}
