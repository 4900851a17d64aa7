//! Gamepad emulation driven by head motion.
//!
//! Two flavours share the same output: an absolute virtual joystick that
//! integrates motion, and a relative pad that turns discrete head shakes into
//! directional taps. Either way the result is a [`GamepadSector`] per frame,
//! turned into press/release edges by [`Gamepad`].

/// Absolute mode: virtual joystick inside the unit disk
pub mod absolute;

/// Relative mode: shake gestures
pub mod relative;

pub use absolute::AbsoluteGamepadProjector;
pub use relative::RelativeGamepadProjector;

use crate::config::{gamepad_abs_speed_factor, shake_threshold, GamepadConfig};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction reported by the gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamepadSector {
    /// Center or no gesture
    #[default]
    None,
    /// Code 0
    Down,
    /// Code 1
    DownLeft,
    /// Code 2
    Left,
    /// Code 3
    UpLeft,
    /// Code 4
    Up,
    /// Code 5
    UpRight,
    /// Code 6
    Right,
    /// Code 7
    DownRight,
}

impl GamepadSector {
    /// Sectors in index order, starting at "down" and going clockwise on screen
    pub const DIRECTIONS: [Self; 8] = [
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
    ];

    /// Sector for an index in `0..8`; anything else is `None`
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::DIRECTIONS.get(index).copied().unwrap_or(Self::None)
    }

    /// Button code used by listeners: `-1` for `None`, `0..=7` otherwise
    #[must_use]
    pub fn code(self) -> i32 {
        Self::DIRECTIONS
            .iter()
            .position(|&s| s == self)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    /// Whether this is an actual direction
    #[must_use]
    pub fn is_pressed(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for GamepadSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which projector feeds the gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamepadMode {
    /// Virtual joystick
    #[default]
    Absolute,
    /// Shake gestures
    Relative,
}

/// Button edge produced when the sector changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadEvent {
    /// The sector became active
    Pressed(GamepadSector),
    /// The sector is no longer active
    Released(GamepadSector),
}

impl GamepadEvent {
    /// Sector carried by the event
    #[must_use]
    pub const fn sector(self) -> GamepadSector {
        match self {
            Self::Pressed(s) | Self::Released(s) => s,
        }
    }
}

/// Gamepad processor: both projectors plus the pressed button
#[derive(Debug, Clone)]
pub struct Gamepad {
    mode: GamepadMode,
    absolute: AbsoluteGamepadProjector,
    relative: RelativeGamepadProjector,
    last_pressed: GamepadSector,
}

impl Gamepad {
    /// Create a gamepad from its settings
    #[must_use]
    pub fn new(config: &GamepadConfig) -> Self {
        Self {
            mode: config.mode,
            absolute: AbsoluteGamepadProjector::new(gamepad_abs_speed_factor(config.abs_speed)),
            relative: RelativeGamepadProjector::new(shake_threshold(config.rel_sensitivity)),
            last_pressed: GamepadSector::None,
        }
    }

    /// Re-read speed and sensitivity. The mode is left alone.
    pub fn update_settings(&mut self, config: &GamepadConfig) {
        self.absolute.set_speed(gamepad_abs_speed_factor(config.abs_speed));
        self.relative.set_threshold(shake_threshold(config.rel_sensitivity));
    }

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> GamepadMode {
        self.mode
    }

    /// Switch projector. Returns the release for a button still held down.
    pub fn set_mode(&mut self, mode: GamepadMode) -> Vec<GamepadEvent> {
        if mode == self.mode {
            return Vec::new();
        }
        debug!("Gamepad mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.reset()
    }

    /// Reset both projectors and release any held button
    pub fn reset(&mut self) -> Vec<GamepadEvent> {
        self.absolute.reset();
        self.relative.reset();
        self.transition(GamepadSector::None)
    }

    /// Button currently held down
    #[must_use]
    pub const fn pressed(&self) -> GamepadSector {
        self.last_pressed
    }

    /// Absolute projector, for the joystick position
    #[must_use]
    pub const fn absolute(&self) -> &AbsoluteGamepadProjector {
        &self.absolute
    }

    /// Relative projector, for the highlight
    #[must_use]
    pub const fn relative(&self) -> &RelativeGamepadProjector {
        &self.relative
    }

    /// Sector to highlight on screen at `now_ms`
    #[must_use]
    pub fn highlighted_sector(&self, now_ms: i64) -> GamepadSector {
        match self.mode {
            GamepadMode::Absolute => self.last_pressed,
            GamepadMode::Relative => self.relative.highlighted_sector(now_ms),
        }
    }

    /// Feed one conditioned motion vector
    pub fn process(&mut self, dx: f32, dy: f32, now_ms: i64) -> (GamepadSector, Vec<GamepadEvent>) {
        let sector = match self.mode {
            GamepadMode::Absolute => self.absolute.update_motion(dx, dy),
            GamepadMode::Relative => self.relative.update_motion(dx, dy, now_ms),
        };
        (sector, self.transition(sector))
    }

    fn transition(&mut self, sector: GamepadSector) -> Vec<GamepadEvent> {
        if sector == self.last_pressed {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if self.last_pressed.is_pressed() {
            events.push(GamepadEvent::Released(self.last_pressed));
        }
        if sector.is_pressed() {
            events.push(GamepadEvent::Pressed(sector));
        }
        self.last_pressed = sector;
        events
    }
}
