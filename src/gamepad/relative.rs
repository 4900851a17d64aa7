//! Relative gamepad: head shakes become directional taps.

use super::GamepadSector;
use crate::{constants::GAMEPAD_HIGHLIGHT_TIMEOUT_MS, shake_detector::ShakeDetector};

/// Maps shakes on each axis to a sector. Vertical shakes win over horizontal
/// ones detected on the same sample.
#[derive(Debug, Clone)]
pub struct RelativeGamepadProjector {
    shake_x: ShakeDetector,
    shake_y: ShakeDetector,
    last_sector: GamepadSector,
    last_change_ms: Option<i64>,
}

impl RelativeGamepadProjector {
    /// Create a projector with the given shake threshold
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            shake_x: ShakeDetector::new(threshold),
            shake_y: ShakeDetector::new(threshold),
            last_sector: GamepadSector::None,
            last_change_ms: None,
        }
    }

    /// Change the shake threshold on both axes
    pub fn set_threshold(&mut self, threshold: f32) {
        self.shake_x.set_threshold(threshold);
        self.shake_y.set_threshold(threshold);
    }

    /// Shake threshold
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.shake_x.threshold()
    }

    /// Forget shake state and highlight
    pub fn reset(&mut self) {
        self.shake_x.reset();
        self.shake_y.reset();
        self.last_sector = GamepadSector::None;
        self.last_change_ms = None;
    }

    /// Feed one motion sample and return the sector for this sample.
    ///
    /// The horizontal detector only sees samples on which no vertical shake
    /// fired.
    pub fn update_motion(&mut self, dx: f32, dy: f32, now_ms: i64) -> GamepadSector {
        let sector = match self.shake_y.update(dy) {
            y if y > 0 => GamepadSector::Down,
            y if y < 0 => GamepadSector::Up,
            _ => match self.shake_x.update(dx) {
                x if x > 0 => GamepadSector::Right,
                x if x < 0 => GamepadSector::Left,
                _ => GamepadSector::None,
            },
        };

        if sector != GamepadSector::None {
            self.last_sector = sector;
            self.last_change_ms = Some(now_ms);
        }
        sector
    }

    /// Sector to highlight on screen. A detected direction stays visible
    /// for a short while after the sample that produced it.
    #[must_use]
    pub fn highlighted_sector(&self, now_ms: i64) -> GamepadSector {
        match self.last_change_ms {
            Some(changed) if now_ms - changed <= GAMEPAD_HIGHLIGHT_TIMEOUT_MS => self.last_sector,
            _ => GamepadSector::None,
        }
    }
}
