//! Absolute gamepad: a virtual joystick moved by head motion.
//!
//! The stick lives inside a disk of radius 1 centered at the origin. Motion
//! is integrated into its position and the position is classified into one
//! of eight 45 degree sectors, with a dead zone around the center.

use super::GamepadSector;
use crate::constants::GAMEPAD_INNER_RADIUS_RATIO;
use nalgebra::Vector2;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8, TAU};

/// Virtual joystick integrating motion inside the unit disk
#[derive(Debug, Clone)]
pub struct AbsoluteGamepadProjector {
    position: Vector2<f32>,
    speed: f32,
    inner_radius_ratio: f32,
}

impl AbsoluteGamepadProjector {
    /// Create a projector at the origin
    #[must_use]
    pub fn new(speed: f32) -> Self {
        Self {
            position: Vector2::zeros(),
            speed,
            inner_radius_ratio: GAMEPAD_INNER_RADIUS_RATIO,
        }
    }

    /// Use a different dead zone ratio
    #[must_use]
    pub fn with_inner_radius_ratio(mut self, ratio: f32) -> Self {
        self.inner_radius_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Change the speed multiplier
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Speed multiplier
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Back to the origin
    pub fn reset(&mut self) {
        self.position = Vector2::zeros();
    }

    /// Normalized stick position, always inside the unit disk
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.position.x, self.position.y)
    }

    /// Integrate motion and return the sector the stick is in
    pub fn update_motion(&mut self, dx: f32, dy: f32) -> GamepadSector {
        let step = Vector2::new(dx, dy) * self.speed;
        if step.iter().all(|v| v.is_finite()) {
            self.position += step;
        }

        let angle = self.position.y.atan2(self.position.x);
        let mut dist_sq = self.position.norm_squared();
        if dist_sq > 1.0 {
            // Saturate on the rim along the same angle
            self.position = Vector2::new(angle.cos(), angle.sin());
            dist_sq = 1.0;
        }

        if dist_sq <= self.inner_radius_ratio * self.inner_radius_ratio {
            return GamepadSector::None;
        }

        // Sector 0 is centered on "down" (positive y in screen space)
        let mut rotated = angle + FRAC_PI_8 - FRAC_PI_2;
        if rotated < 0.0 {
            rotated += TAU;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = ((rotated / FRAC_PI_4) as usize).min(7);
        GamepadSector::from_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_directions() {
        let cases = [
            ((0.0, 1.0), GamepadSector::Down),
            ((-1.0, 1.0), GamepadSector::DownLeft),
            ((-1.0, 0.0), GamepadSector::Left),
            ((-1.0, -1.0), GamepadSector::UpLeft),
            ((0.0, -1.0), GamepadSector::Up),
            ((1.0, -1.0), GamepadSector::UpRight),
            ((1.0, 0.0), GamepadSector::Right),
            ((1.0, 1.0), GamepadSector::DownRight),
        ];
        for ((dx, dy), expected) in cases {
            let mut projector = AbsoluteGamepadProjector::new(1.0);
            assert_eq!(projector.update_motion(dx, dy), expected, "motion ({dx}, {dy})");
        }
    }

    #[test]
    fn test_dead_zone() {
        let mut projector = AbsoluteGamepadProjector::new(1.0);
        assert_eq!(projector.update_motion(0.2, 0.2), GamepadSector::None);
        assert_eq!(projector.update_motion(0.05, 0.0), GamepadSector::None);
        // Leaving the dead zone
        assert_eq!(projector.update_motion(0.3, 0.0), GamepadSector::Right);
    }

    #[test]
    fn test_saturates_on_rim() {
        let mut projector = AbsoluteGamepadProjector::new(1.0);
        projector.update_motion(30.0, 40.0);
        let (x, y) = projector.position();
        assert!((x - 0.6).abs() < 1e-5);
        assert!((y - 0.8).abs() < 1e-5);

        // Motion back towards the center takes effect immediately
        projector.update_motion(-0.6, -0.8);
        let (x, y) = projector.position();
        assert!(x.abs() < 1e-5 && y.abs() < 1e-5);
    }

    #[test]
    fn test_speed_scales_motion() {
        let mut projector = AbsoluteGamepadProjector::new(0.05);
        assert_eq!(projector.update_motion(4.0, 0.0), GamepadSector::None);
        assert!((projector.position().0 - 0.2).abs() < 1e-6);
        assert_eq!(projector.update_motion(6.0, 0.0), GamepadSector::Right);
    }

    #[test]
    fn test_non_finite_motion_ignored() {
        let mut projector = AbsoluteGamepadProjector::new(1.0);
        projector.update_motion(0.5, 0.0);
        projector.update_motion(f32::NAN, 1.0);
        assert_eq!(projector.position(), (0.5, 0.0));
    }
}
