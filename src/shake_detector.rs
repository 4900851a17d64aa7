//! Shake detection on a single motion axis.
//!
//! Follows the value until its magnitude crosses a threshold, reports the
//! direction once, then swallows the bounce as the head swings back through
//! zero so one physical shake yields one event.

use log::trace;

/// States of the detector. Transitions are strictly sequential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShakeState {
    /// Waiting for the value to cross the threshold
    #[default]
    NoShake,
    /// Above threshold, following until the direction reverses
    AboveThreshold,
    /// Waiting for the first zero crossing
    Bounce,
    /// Waiting for the second zero crossing
    Bounce2,
}

/// Edge-triggered shake detector
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    threshold: f32,
    last_value: f32,
    state: ShakeState,
}

impl ShakeDetector {
    /// Create a detector with the given magnitude threshold
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last_value: 0.0,
            state: ShakeState::NoShake,
        }
    }

    /// Change the threshold without touching the state machine
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Current threshold
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ShakeState {
        self.state
    }

    /// Back to `NoShake`
    pub fn reset(&mut self) {
        self.state = ShakeState::NoShake;
        self.last_value = 0.0;
    }

    fn crossed_zero(&self, v: f32) -> bool {
        self.last_value == 0.0 || self.last_value * v < 0.0
    }

    /// Feed a new value.
    ///
    /// Returns `1` or `-1` on the sample where a shake is detected (its
    /// direction), `0` otherwise.
    pub fn update(&mut self, v: f32) -> i8 {
        let mut result = 0;
        let previous = self.state;

        self.state = match self.state {
            ShakeState::NoShake => {
                if v != 0.0 && v.abs() >= self.threshold {
                    result = if v > 0.0 { 1 } else { -1 };
                    ShakeState::AboveThreshold
                } else {
                    ShakeState::NoShake
                }
            }
            ShakeState::AboveThreshold => {
                let reversed = if self.last_value > 0.0 {
                    self.last_value > v
                } else {
                    self.last_value < v
                };
                if reversed {
                    ShakeState::Bounce
                } else {
                    ShakeState::AboveThreshold
                }
            }
            ShakeState::Bounce => {
                if self.crossed_zero(v) {
                    ShakeState::Bounce2
                } else {
                    ShakeState::Bounce
                }
            }
            ShakeState::Bounce2 => {
                if self.crossed_zero(v) {
                    ShakeState::NoShake
                } else {
                    ShakeState::Bounce2
                }
            }
        };

        if previous != self.state {
            trace!("Shake detector {:?} -> {:?} at {}", previous, self.state, v);
        }

        self.last_value = v;
        result
    }
}
