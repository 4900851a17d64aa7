//! Configuration management for the head motion engine.
//!
//! Settings are stored as small user-facing integers (the same values a
//! preferences screen would show) and mapped to the floating point
//! multipliers the processing stages consume. Range checks happen here, in
//! [`Config::validate`]; the engine itself assumes every value is legal.

use crate::{
    constants::{
        ACCELERATION_DEFAULT, ACCELERATION_MAX, ACCELERATION_MIN, AXIS_SPEED_CURVE_BASE, AXIS_SPEED_DEFAULT,
        AXIS_SPEED_MAX, AXIS_SPEED_MIN, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DWELL_AREA_DEFAULT, DWELL_AREA_MAX,
        DWELL_AREA_MIN, DWELL_TIME_DEFAULT, DWELL_TIME_MAX, DWELL_TIME_MIN, FACE_TIMEOUT_DEFAULT_SECS,
        FACE_TIMEOUT_MAX_SECS, GAMEPAD_ABS_SPEED_DEFAULT, GAMEPAD_ABS_SPEED_MAX, GAMEPAD_ABS_SPEED_MIN,
        GAMEPAD_REL_SENSITIVITY_DEFAULT, GAMEPAD_REL_SENSITIVITY_MAX, GAMEPAD_REL_SENSITIVITY_MIN,
        MOTION_SMOOTHING_DEFAULT, MOTION_SMOOTHING_MAX, MOTION_SMOOTHING_MIN, MOTION_THRESHOLD_DEFAULT,
        MOTION_THRESHOLD_MAX, MOTION_THRESHOLD_MIN, SHAKE_CURVE_A, SHAKE_THRESHOLD_MAX, SLEEP_SLICES, SLEEP_SLICE_MS,
    },
    gamepad::GamepadMode,
    orientation::{DeviceRotation, FlipDirection},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pointer motion configuration
    pub pointer: PointerConfig,

    /// Dwell click configuration
    pub dwell: DwellConfig,

    /// Gamepad configuration
    pub gamepad: GamepadConfig,

    /// Face-loss auto-pause configuration
    pub face_detection: FaceDetectionConfig,

    /// Camera mount and device orientation
    pub orientation: OrientationConfig,

    /// Screen geometry
    pub screen: ScreenConfig,

    /// Power saving sleep
    pub power: PowerConfig,
}

/// Pointer motion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Horizontal speed setting
    pub horizontal_speed: i32,

    /// Vertical speed setting
    pub vertical_speed: i32,

    /// Acceleration preset (0 disables acceleration)
    pub acceleration: i32,

    /// Motion smoothing setting (0 disables smoothing)
    pub motion_smoothing: i32,

    /// Stop margin in pixels per frame
    pub motion_threshold: i32,

    /// Smoothing filter type (none, low_pass, kalman)
    pub filter: String,
}

/// Dwell click settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwellConfig {
    /// Dwell time in tenths of a second
    pub dwell_time: i32,

    /// Radius in pixels the pointer may jitter while dwelling
    pub dwell_area: i32,

    /// Keep clicking while the pointer stays still
    pub consecutive_clicks: bool,
}

/// Gamepad settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    /// Absolute mode speed setting
    pub abs_speed: i32,

    /// Relative mode shake sensitivity setting
    pub rel_sensitivity: i32,

    /// Initial gamepad mode
    pub mode: GamepadMode,
}

/// Face detection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceDetectionConfig {
    /// Seconds without a detected face before auto-pause, 0 disables it
    pub timeout_secs: u32,
}

/// Orientation settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Camera mount flip
    pub camera_flip: FlipDirection,

    /// Physical device rotation in degrees
    pub device_rotation: DeviceRotation,
}

/// Screen geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

/// Power saving settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Length of one sleep slice in milliseconds
    pub sleep_slice_ms: u64,

    /// Maximum number of slices per sleep call
    pub sleep_slices: u32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            horizontal_speed: AXIS_SPEED_DEFAULT,
            vertical_speed: AXIS_SPEED_DEFAULT,
            acceleration: ACCELERATION_DEFAULT,
            motion_smoothing: MOTION_SMOOTHING_DEFAULT,
            motion_threshold: MOTION_THRESHOLD_DEFAULT,
            filter: "low_pass".to_string(),
        }
    }
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            dwell_time: DWELL_TIME_DEFAULT,
            dwell_area: DWELL_AREA_DEFAULT,
            consecutive_clicks: false,
        }
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            abs_speed: GAMEPAD_ABS_SPEED_DEFAULT,
            rel_sensitivity: GAMEPAD_REL_SENSITIVITY_DEFAULT,
            mode: GamepadMode::Absolute,
        }
    }
}

impl Default for FaceDetectionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: FACE_TIMEOUT_DEFAULT_SECS,
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sleep_slice_ms: SLEEP_SLICE_MS,
            sleep_slices: SLEEP_SLICES,
        }
    }
}

/// Map an axis speed setting to a multiplier, `6^(s/6)`. Strictly increasing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn axis_speed_factor(setting: i32) -> f32 {
    AXIS_SPEED_CURVE_BASE.powf(setting as f32 / AXIS_SPEED_CURVE_BASE)
}

/// Map the absolute gamepad speed setting to a multiplier
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gamepad_abs_speed_factor(setting: i32) -> f32 {
    setting as f32 / 100.0
}

/// Weight given to the previous output by the low-pass smoother, `log10(s + 1)`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn smoothing_weight(setting: i32) -> f32 {
    ((setting.max(0) + 1) as f32).log10()
}

/// Exponential curve `y = A * e^(x * B) - A + C` through two points.
///
/// The curve passes through `(0, min_y)` and `(max_x, max_y)`; `A` shapes
/// how fast it grows. It is strictly increasing for `max_y > min_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpCurve {
    a: f64,
    b: f64,
    c: f64,
}

impl ExpCurve {
    /// Fit the curve
    ///
    /// # Errors
    ///
    /// Returns an error if `a <= 0`, `max_x <= 0` or `max_y <= min_y`
    pub fn fit(a: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        if a <= 0.0 || max_x <= 0.0 || max_y <= min_y {
            return Err(Error::InvalidInput(format!(
                "Cannot fit exponential curve with A={a}, max_x={max_x}, y in [{min_y}, {max_y}]"
            )));
        }
        let b = ((a + max_y - min_y) / a).ln() / max_x;
        Ok(Self { a, b, c: min_y })
    }

    /// Evaluate the curve at `x`
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.a.mul_add((x * self.b).exp(), -self.a) + self.c
    }
}

/// Shake threshold for a relative gamepad sensitivity setting
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn shake_threshold(sensitivity: i32) -> f32 {
    let x = f64::from(sensitivity);
    let max_x = f64::from(GAMEPAD_REL_SENSITIVITY_MAX);
    // A straight line through the same end points if the curve cannot be fitted
    let threshold = ExpCurve::fit(SHAKE_CURVE_A, max_x, 0.0, SHAKE_THRESHOLD_MAX)
        .map_or(SHAKE_THRESHOLD_MAX * x / max_x, |curve| curve.eval(x));
    threshold as f32
}

fn check_range(name: &str, value: i32, min: i32, max: i32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be between {min} and {max}, got {value}")))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let p = &self.pointer;
        check_range("Horizontal speed", p.horizontal_speed, AXIS_SPEED_MIN, AXIS_SPEED_MAX)?;
        check_range("Vertical speed", p.vertical_speed, AXIS_SPEED_MIN, AXIS_SPEED_MAX)?;
        check_range("Acceleration", p.acceleration, ACCELERATION_MIN, ACCELERATION_MAX)?;
        check_range("Motion smoothing", p.motion_smoothing, MOTION_SMOOTHING_MIN, MOTION_SMOOTHING_MAX)?;
        check_range("Motion threshold", p.motion_threshold, MOTION_THRESHOLD_MIN, MOTION_THRESHOLD_MAX)?;
        crate::filters::create_filter(&p.filter, smoothing_weight(p.motion_smoothing))
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        check_range("Dwell time", self.dwell.dwell_time, DWELL_TIME_MIN, DWELL_TIME_MAX)?;
        check_range("Dwell area", self.dwell.dwell_area, DWELL_AREA_MIN, DWELL_AREA_MAX)?;

        check_range(
            "Gamepad absolute speed",
            self.gamepad.abs_speed,
            GAMEPAD_ABS_SPEED_MIN,
            GAMEPAD_ABS_SPEED_MAX,
        )?;
        check_range(
            "Gamepad relative sensitivity",
            self.gamepad.rel_sensitivity,
            GAMEPAD_REL_SENSITIVITY_MIN,
            GAMEPAD_REL_SENSITIVITY_MAX,
        )?;

        if self.face_detection.timeout_secs > FACE_TIMEOUT_MAX_SECS {
            return Err(Error::ConfigError(format!(
                "Face detection timeout must be at most {FACE_TIMEOUT_MAX_SECS} seconds"
            )));
        }

        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(Error::ConfigError("Screen size must be greater than 0".to_string()));
        }

        if self.power.sleep_slices > 0 && self.power.sleep_slice_ms == 0 {
            return Err(Error::ConfigError("Sleep slice must be greater than 0 ms".to_string()));
        }

        Ok(())
    }

    /// Face detection timeout in milliseconds, 0 when disabled
    #[must_use]
    pub fn face_timeout_ms(&self) -> i64 {
        i64::from(self.face_detection.timeout_secs) * 1000
    }

    /// Dwell time in milliseconds
    #[must_use]
    pub fn dwell_time_ms(&self) -> i64 {
        i64::from(self.dwell.dwell_time) * 100
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head motion engine configuration

# Pointer motion
pointer:
  horizontal_speed: 10
  vertical_speed: 10
  acceleration: 2
  motion_smoothing: 2
  motion_threshold: 0
  filter: "low_pass"

# Dwell click
dwell:
  dwell_time: 10        # tenths of a second
  dwell_area: 5         # pixels
  consecutive_clicks: false

# Gamepad emulation
gamepad:
  abs_speed: 5
  rel_sensitivity: 5
  mode: "absolute"

# Auto-pause when no face is seen (0 disables)
face_detection:
  timeout_secs: 20

# Camera mount and device rotation
orientation:
  camera_flip: "none"
  device_rotation: 0

# Screen geometry
screen:
  width: 1080
  height: 1920

# Power saving sleep while not running
power:
  sleep_slice_ms: 500
  sleep_slices: 10
"#;
