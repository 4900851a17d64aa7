use super::MotionFilter;
use crate::{Error, Result};

/// First-order low-pass filter
///
/// `out = last + alpha * (input - last)`. The previous output starts at zero,
/// so the first sample after a reset is blended with a still head.
pub struct LowPassFilter {
    alpha: f32,
    last_dx: f32,
    last_dy: f32,
}

impl LowPassFilter {
    /// Create a new first-order low-pass filter
    ///
    /// # Errors
    ///
    /// Returns an error if alpha is not in the range (0, 1]
    pub fn new(alpha: f32) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::InvalidInput(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self {
            alpha,
            last_dx: 0.0,
            last_dy: 0.0,
        })
    }

    /// Create a filter from the weight given to the previous output
    ///
    /// # Errors
    ///
    /// Returns an error if the weight is not in the range [0, 1)
    pub fn from_smoothing_weight(weight: f32) -> Result<Self> {
        Self::new(1.0 - weight)
    }

    /// Smoothing coefficient
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl MotionFilter for LowPassFilter {
    fn apply(&mut self, dx: f32, dy: f32) -> (f32, f32) {
        self.last_dx = self.alpha.mul_add(dx - self.last_dx, self.last_dx);
        self.last_dy = self.alpha.mul_add(dy - self.last_dy, self.last_dy);
        (self.last_dx, self.last_dy)
    }

    fn reset(&mut self) {
        self.last_dx = 0.0;
        self.last_dy = 0.0;
    }

    fn name(&self) -> &str {
        "LowPassFilter"
    }
}
