//! Orientation correction for motion vectors.
//!
//! The camera reports motion in its own frame. Depending on how the camera
//! is mounted (some tablets have a rotating camera that mirrors the image)
//! and how the device is physically rotated, that vector has to be flipped
//! and rotated so that moving the head "up" always moves the pointer up on
//! the screen.

use serde::{Deserialize, Serialize};

/// Mirror applied by the camera mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipDirection {
    /// No mirroring
    #[default]
    None,
    /// Mirror around the vertical axis (negates x)
    Horizontal,
    /// Mirror around the horizontal axis (negates y)
    Vertical,
}

impl FlipDirection {
    /// Apply the flip to a vector. Flips are self-inverse.
    #[must_use]
    pub fn apply(self, dx: f32, dy: f32) -> (f32, f32) {
        match self {
            Self::None => (dx, dy),
            Self::Horizontal => (-dx, dy),
            Self::Vertical => (dx, -dy),
        }
    }
}

/// Physical rotation of the device, restricted to quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DeviceRotation {
    /// Natural orientation
    #[default]
    Deg0,
    /// Quarter turn
    Deg90,
    /// Upside down
    Deg180,
    /// Three quarter turn
    Deg270,
}

impl DeviceRotation {
    /// Rotation in degrees
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Rotation that undoes this one, i.e. `-r mod 360`
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg0,
            Self::Deg90 => Self::Deg270,
            Self::Deg180 => Self::Deg180,
            Self::Deg270 => Self::Deg90,
        }
    }
}

impl TryFrom<u32> for DeviceRotation {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(format!("rotation must be 0, 90, 180 or 270 degrees, got {other}")),
        }
    }
}

impl From<DeviceRotation> for u32 {
    fn from(rotation: DeviceRotation) -> Self {
        rotation.degrees()
    }
}

/// Map a camera-space motion vector to screen space.
///
/// The flip is applied first, then the vector is rotated by the device
/// rotation in screen coordinates (y pointing down), which compensates the
/// physical rotation clockwise. Quarter turns are computed exactly by
/// swapping components so no rounding noise leaks into the pointer.
#[must_use]
pub fn correct(dx: f32, dy: f32, flip: FlipDirection, rotation: DeviceRotation) -> (f32, f32) {
    let (x, y) = flip.apply(dx, dy);
    match rotation {
        DeviceRotation::Deg0 => (x, y),
        DeviceRotation::Deg90 => (-y, x),
        DeviceRotation::Deg180 => (-x, -y),
        DeviceRotation::Deg270 => (y, -x),
    }
}

/// Orientation settings for a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationCorrector {
    flip: FlipDirection,
    rotation: DeviceRotation,
}

impl OrientationCorrector {
    /// Create a corrector for a given mount flip and device rotation
    #[must_use]
    pub const fn new(flip: FlipDirection, rotation: DeviceRotation) -> Self {
        Self { flip, rotation }
    }

    /// Correct a motion vector
    #[must_use]
    pub fn correct(&self, dx: f32, dy: f32) -> (f32, f32) {
        correct(dx, dy, self.flip, self.rotation)
    }

    /// Update the device rotation, e.g. after an orientation sensor event
    pub fn set_rotation(&mut self, rotation: DeviceRotation) {
        self.rotation = rotation;
    }

    /// Current device rotation
    #[must_use]
    pub const fn rotation(&self) -> DeviceRotation {
        self.rotation
    }

    /// Camera mount flip
    #[must_use]
    pub const fn flip(&self) -> FlipDirection {
        self.flip
    }
}
