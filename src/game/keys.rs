//! Keyboard and mouse input handling for the locomotion core.
//!
//! This module defines the [`GameKey`] enum for abstracting actions from physical keys,
//! [`KeyState`] for tracking pressed keys between frames, and [`PlayerInput`], the
//! per-tick sample the controller consumes. It also maps winit key events to actions.

use std::collections::HashSet;

use winit::keyboard;

use crate::config::LookConfig;

/// Enum representing every action the locomotion sandbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move forward (W or Up Arrow).
    MoveForward,
    /// Move backward (S or Down Arrow).
    MoveBackward,
    /// Strafe left (A or Left Arrow).
    MoveLeft,
    /// Strafe right (D or Right Arrow).
    MoveRight,
    /// Sprint (Shift).
    Sprint,
    /// Crouch (Ctrl or C).
    Crouch,
    /// Toggle infinite stamina (F1).
    ToggleCheat,
    /// Quit (Escape or `).
    Quit,
}

/// One tick worth of locomotion input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Strafe axis in `[-1, 1]`, positive is right.
    pub horizontal: f32,
    /// Forward axis in `[-1, 1]`, positive is forward.
    pub vertical: f32,
    pub sprint_held: bool,
    pub crouch_held: bool,
    /// True only on the tick crouch went from held to released.
    pub crouch_released: bool,
    /// Pins stamina at max while sprinting.
    pub cheat: bool,
    /// Yaw change since the previous tick, in degrees.
    pub look_yaw_delta: f32,
    /// Absolute look pitch in degrees, positive looks up.
    pub look_pitch: f32,
}

impl PlayerInput {
    /// Input moving along the given axes and nothing else.
    pub fn moving(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Self::default()
        }
    }

    pub fn sprinting(mut self) -> Self {
        self.sprint_held = true;
        self
    }

    pub fn crouching(mut self) -> Self {
        self.crouch_held = true;
        self
    }
}

/// Tracks pressed keys and accumulated mouse look between ticks.
#[derive(Debug)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
    crouch_was_held: bool,
    cheat: bool,
    pending_yaw: f32,
    pitch: f32,
    sensitivity: f32,
    pitch_limit: f32,
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new(&LookConfig::default())
    }
}

impl KeyState {
    /// Creates a new, empty [`KeyState`].
    pub fn new(look: &LookConfig) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            crouch_was_held: false,
            cheat: false,
            pending_yaw: 0.0,
            pitch: 0.0,
            sensitivity: look.sensitivity,
            pitch_limit: look.pitch_limit,
        }
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn toggle_cheat(&mut self) -> bool {
        self.cheat = !self.cheat;
        self.cheat
    }

    /// Accumulates raw mouse motion.
    ///
    /// Positive `delta_x` turns right, positive `delta_y` looks down. Pitch is
    /// clamped to the configured limit as it accumulates.
    pub fn mouse_movement(&mut self, delta_x: f64, delta_y: f64) {
        self.pending_yaw += delta_x as f32 * self.sensitivity;
        self.pitch = (self.pitch - delta_y as f32 * self.sensitivity)
            .clamp(-self.pitch_limit, self.pitch_limit);
    }

    /// Produces this tick's [`PlayerInput`] and consumes pending mouse yaw.
    pub fn sample(&mut self) -> PlayerInput {
        let axis = |positive: GameKey, negative: GameKey| {
            let mut value = 0.0;
            if self.is_pressed(positive) {
                value += 1.0;
            }
            if self.is_pressed(negative) {
                value -= 1.0;
            }
            value
        };
        let horizontal = axis(GameKey::MoveRight, GameKey::MoveLeft);
        let vertical = axis(GameKey::MoveForward, GameKey::MoveBackward);

        let crouch_held = self.is_pressed(GameKey::Crouch);
        let crouch_released = self.crouch_was_held && !crouch_held;
        self.crouch_was_held = crouch_held;

        PlayerInput {
            horizontal,
            vertical,
            sprint_held: self.is_pressed(GameKey::Sprint),
            crouch_held,
            crouch_released,
            cheat: self.cheat,
            look_yaw_delta: std::mem::take(&mut self.pending_yaw),
            look_pitch: self.pitch,
        }
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped action.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::MoveLeft,
            ArrowRight => GameKey::MoveRight,
            Shift => GameKey::Sprint,
            Control => GameKey::Crouch,
            F1 => GameKey::ToggleCheat,
            Escape => GameKey::Quit,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
            "c" => GameKey::Crouch,
            "`" => GameKey::Quit,
        }),

        _ => None,
    }
}
