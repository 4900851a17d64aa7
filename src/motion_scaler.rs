//! Speed, smoothing and acceleration for pointer motion.
//!
//! The per-frame vector produced by the vision pipeline is small and noisy.
//! It goes through these stages, in order:
//!
//! 1. per-axis speed multipliers ([`scale`])
//! 2. a smoothing [`MotionFilter`]
//! 3. acceleration from a lookup table indexed by the vector length
//! 4. a stop margin that zeroes tiny components

use crate::{
    config::{axis_speed_factor, smoothing_weight, PointerConfig},
    constants::ACCEL_TABLE_SIZE,
    filters::{create_filter, MotionFilter},
    Result,
};
use log::debug;

/// Multiply each axis by its speed factor. Both factors must be positive.
#[must_use]
pub fn scale(dx: f32, dy: f32, h_speed: f32, v_speed: f32) -> (f32, f32) {
    (dx * h_speed, dy * v_speed)
}

/// Build the acceleration table.
///
/// Speeds below `delta0` are untouched, speeds in `[delta0, delta1)` are
/// multiplied by `factor0`, and faster ones by `factor0 * factor1` plus a
/// ramp of 0.1 per table step.
fn relative_acceleration(delta0: usize, factor0: f32, delta1: usize, factor1: f32) -> [f32; ACCEL_TABLE_SIZE] {
    let delta0 = delta0.min(ACCEL_TABLE_SIZE);
    let delta1 = delta1.clamp(delta0, ACCEL_TABLE_SIZE);
    let mut table = [1.0; ACCEL_TABLE_SIZE];
    let mut ramp = 0.0;
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = if i < delta0 {
            1.0
        } else if i < delta1 {
            factor0
        } else {
            let value = factor0.mul_add(factor1, ramp);
            ramp += 0.1;
            value
        };
    }
    table
}

/// Acceleration table for a preset (0 disables acceleration)
#[must_use]
pub fn acceleration_table(preset: i32) -> [f32; ACCEL_TABLE_SIZE] {
    match preset {
        1 => relative_acceleration(7, 1.5, ACCEL_TABLE_SIZE, 1.0),
        2 => relative_acceleration(7, 2.0, ACCEL_TABLE_SIZE, 1.0),
        3 => relative_acceleration(7, 1.5, 14, 2.0),
        4 => relative_acceleration(7, 2.0, 14, 1.5),
        5 => relative_acceleration(7, 2.0, 14, 2.0),
        _ => [1.0; ACCEL_TABLE_SIZE],
    }
}

/// Full pointer motion conditioning
pub struct MotionScaler {
    h_speed: f32,
    v_speed: f32,
    filter: Box<dyn MotionFilter>,
    accel: [f32; ACCEL_TABLE_SIZE],
    motion_threshold: f32,
}

impl MotionScaler {
    /// Create the scaler from pointer settings
    ///
    /// # Errors
    ///
    /// Returns an error if the filter type is unknown
    pub fn new(config: &PointerConfig) -> Result<Self> {
        let filter = create_filter(&config.filter, smoothing_weight(config.motion_smoothing))?;
        let mut scaler = Self {
            h_speed: 1.0,
            v_speed: 1.0,
            filter,
            accel: [1.0; ACCEL_TABLE_SIZE],
            motion_threshold: 0.0,
        };
        scaler.apply_settings(config);
        Ok(scaler)
    }

    fn apply_settings(&mut self, config: &PointerConfig) {
        self.h_speed = axis_speed_factor(config.horizontal_speed);
        self.v_speed = axis_speed_factor(config.vertical_speed);
        self.accel = acceleration_table(config.acceleration);
        #[allow(clippy::cast_precision_loss)]
        {
            self.motion_threshold = config.motion_threshold.max(0) as f32;
        }
    }

    /// Re-read settings. The smoothing filter is rebuilt, so its history is lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter type is unknown; the old settings stay in place
    pub fn update_settings(&mut self, config: &PointerConfig) -> Result<()> {
        self.filter = create_filter(&config.filter, smoothing_weight(config.motion_smoothing))?;
        self.apply_settings(config);
        debug!(
            "Pointer settings: speed ({:.2}, {:.2}), filter {}, threshold {}",
            self.h_speed,
            self.v_speed,
            self.filter.name(),
            self.motion_threshold
        );
        Ok(())
    }

    /// Horizontal and vertical multipliers
    #[must_use]
    pub const fn speeds(&self) -> (f32, f32) {
        (self.h_speed, self.v_speed)
    }

    /// Forget filter history
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// Condition one motion vector
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn process(&mut self, dx: f32, dy: f32) -> (f32, f32) {
        let (dx, dy) = scale(dx, dy, self.h_speed, self.v_speed);
        let (mut dx, mut dy) = self.filter.apply(dx, dy);

        let distance = dx.hypot(dy);
        let index = if distance.is_finite() {
            ((distance + 0.5) as usize).min(ACCEL_TABLE_SIZE - 1)
        } else {
            ACCEL_TABLE_SIZE - 1
        };
        dx *= self.accel[index];
        dy *= self.accel[index];

        if dx.abs() < self.motion_threshold {
            dx = 0.0;
        }
        if dy.abs() < self.motion_threshold {
            dy = 0.0;
        }

        (dx, dy)
    }
}
