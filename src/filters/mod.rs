//! Smoothing filters for the per-frame motion vector.
//!
//! The vision pipeline reports a noisy displacement for every frame. These
//! filters remove jitter before acceleration is applied, trading a little
//! latency for a steadier pointer.

/// Kalman filter with a constant velocity model
pub mod kalman;

/// First-order low-pass filter
pub mod low_pass;

use crate::Result;

/// Trait for all motion filters
pub trait MotionFilter: Send + Sync {
    /// Apply filter to a motion vector
    fn apply(&mut self, dx: f32, dy: f32) -> (f32, f32);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl MotionFilter for NoFilter {
    fn apply(&mut self, dx: f32, dy: f32) -> (f32, f32) {
        (dx, dy)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a motion filter by type name.
///
/// `smoothing_weight` is the share of the previous output kept by the
/// low-pass filter, in `[0, 1)`.
pub fn create_filter(filter_type: &str, smoothing_weight: f32) -> Result<Box<dyn MotionFilter>> {
    match filter_type.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "lowpass" | "low_pass" => Ok(Box::new(low_pass::LowPassFilter::from_smoothing_weight(
            smoothing_weight,
        )?)),
        "kalman" => Ok(Box::new(kalman::KalmanFilter::new())),
        _ => Err(crate::Error::InvalidInput(format!("Unknown filter type: {filter_type}"))),
    }
}
