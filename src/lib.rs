//! Head motion to pointer and gamepad engine.
//!
//! A vision collaborator reports, for every camera frame, how far the face
//! moved and whether a face was found at all. This library turns that stream
//! into pointer motion with dwell clicks, or into gamepad button edges:
//!
//! 1. The [`engine::EngineStateMachine`] gates frames on its lifecycle state
//!    and pauses itself when the face has been missing for too long
//! 2. [`orientation`] undoes the camera mount flip and the device rotation
//! 3. [`motion_scaler`] applies speed, smoothing, acceleration and a stop margin
//! 4. The active processor consumes the vector: [`dwell_click`] for the
//!    pointer, [`gamepad`] for the virtual joystick or the shake pad
//! 5. Results go out through the sinks in [`dispatch`]
//!
//! # Example
//!
//! ```no_run
//! use headmouse::{
//!     config::Config,
//!     engine::{EngineStateMachine, FrameOutcome, MotionSample, OperationMode},
//! };
//!
//! # fn main() -> headmouse::Result<()> {
//! let engine = EngineStateMachine::new(Config::default(), OperationMode::Mouse)?;
//! engine.start(); // Disabled -> Stopped
//! engine.start(); // Stopped -> CheckingDependency
//! engine.dependency_ready();
//!
//! let sample = MotionSample::new(2.0, -1.0, true, 0);
//! if let FrameOutcome::Pointer(event) = engine.on_frame(&sample) {
//!     println!("Pointer at ({:.0}, {:.0})", event.position.x, event.position.y);
//! }
//!
//! engine.stop();
//! # Ok(())
//! # }
//! ```

/// Replay application
pub mod app;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Time based countdowns
pub mod countdown;

/// Output sinks and listener registration
pub mod dispatch;

/// Pointer position and dwell clicking
pub mod dwell_click;

/// Engine state machine and ownership
pub mod engine;

/// Error types and result handling
pub mod error;

/// Smoothing filters for motion vectors
pub mod filters;

/// Gamepad emulation
pub mod gamepad;

/// Speed, smoothing and acceleration
pub mod motion_scaler;

/// Camera flip and device rotation correction
pub mod orientation;

/// Power saving sleep and screen state
pub mod power;

/// Shake gesture detection
pub mod shake_detector;

pub use error::{Error, Result};
