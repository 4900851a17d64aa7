//! Constants used throughout the engine

/// Axis speed setting bounds (user-facing integer)
pub const AXIS_SPEED_MIN: i32 = 0;
pub const AXIS_SPEED_MAX: i32 = 30;
pub const AXIS_SPEED_DEFAULT: i32 = 10;

/// Base of the exponential axis speed curve, `base^(setting / base)`
pub const AXIS_SPEED_CURVE_BASE: f32 = 6.0;

/// Acceleration preset bounds
pub const ACCELERATION_MIN: i32 = 0;
pub const ACCELERATION_MAX: i32 = 5;
pub const ACCELERATION_DEFAULT: i32 = 2;

/// Number of entries in the acceleration lookup table
pub const ACCEL_TABLE_SIZE: usize = 30;

/// Motion smoothing setting bounds (weight is `log10(setting + 1)`, must stay below 1)
pub const MOTION_SMOOTHING_MIN: i32 = 0;
pub const MOTION_SMOOTHING_MAX: i32 = 8;
pub const MOTION_SMOOTHING_DEFAULT: i32 = 2;

/// Stop margin bounds in pixels per frame
pub const MOTION_THRESHOLD_MIN: i32 = 0;
pub const MOTION_THRESHOLD_MAX: i32 = 10;
pub const MOTION_THRESHOLD_DEFAULT: i32 = 0;

/// Dwell time bounds in tenths of a second
pub const DWELL_TIME_MIN: i32 = 5;
pub const DWELL_TIME_MAX: i32 = 50;
pub const DWELL_TIME_DEFAULT: i32 = 10;

/// Dwell area bounds in pixels
pub const DWELL_AREA_MIN: i32 = 0;
pub const DWELL_AREA_MAX: i32 = 50;
pub const DWELL_AREA_DEFAULT: i32 = 5;

/// Absolute gamepad speed bounds (setting / 100 = multiplier)
pub const GAMEPAD_ABS_SPEED_MIN: i32 = 1;
pub const GAMEPAD_ABS_SPEED_MAX: i32 = 100;
pub const GAMEPAD_ABS_SPEED_DEFAULT: i32 = 5;

/// Relative gamepad sensitivity bounds
pub const GAMEPAD_REL_SENSITIVITY_MIN: i32 = 0;
pub const GAMEPAD_REL_SENSITIVITY_MAX: i32 = 10;
pub const GAMEPAD_REL_SENSITIVITY_DEFAULT: i32 = 5;

/// Shape constant of the shake threshold curve, chosen empirically
pub const SHAKE_CURVE_A: f64 = 0.08;

/// Threshold reached by the shake curve at maximum sensitivity
pub const SHAKE_THRESHOLD_MAX: f64 = 1.0;

/// Seconds without a detected face before auto-pause (0 disables)
pub const FACE_TIMEOUT_MAX_SECS: u32 = 600;
pub const FACE_TIMEOUT_DEFAULT_SECS: u32 = 20;

/// Dead zone of the virtual joystick relative to its radius
pub const GAMEPAD_INNER_RADIUS_RATIO: f32 = 0.4;

/// Time after which a relative gamepad highlight is switched off
pub const GAMEPAD_HIGHLIGHT_TIMEOUT_MS: i64 = 100;

/// Power saving sleep slices
pub const SLEEP_SLICE_MS: u64 = 500;
pub const SLEEP_SLICES: u32 = 10;

/// Default screen size in pixels
pub const DEFAULT_SCREEN_WIDTH: u32 = 1080;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1920;

/// Assumed capture rate used by the Kalman smoother
pub const DEFAULT_FPS: f64 = 30.0;
