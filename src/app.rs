//! Trace replay application.
//!
//! Feeds a recorded sequence of motion samples through the engine exactly as
//! a capture thread would, logging pointer updates, clicks, gamepad edges and
//! state transitions, and summarising them at the end.

use crate::{
    config::Config,
    dispatch::{GamepadEventListener, MouseEventSink, StateObserver},
    dwell_click::{MouseEvent, PointerPosition},
    engine::{EngineManager, EngineState, EngineStateMachine, FrameOutcome, MotionSample, OperationMode},
    error::{Error, Result},
    gamepad::GamepadSector,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

/// A recorded sequence of frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Samples in capture order
    pub samples: Vec<MotionSample>,
}

impl Trace {
    /// Load a trace from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse a trace from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let trace: Self =
            serde_yaml::from_str(content).map_err(|e| Error::TraceError(format!("Failed to parse trace: {e}")))?;
        trace.validate()?;
        Ok(trace)
    }

    /// Save the trace to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::TraceError(format!("Failed to serialize trace: {e}")))?;
        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;
        Ok(())
    }

    /// Timestamps must not go backwards
    pub fn validate(&self) -> Result<()> {
        if let Some(pair) = self.samples.windows(2).find(|w| w[1].timestamp_ms < w[0].timestamp_ms) {
            return Err(Error::TraceError(format!(
                "Timestamps go backwards: {} ms after {} ms",
                pair[1].timestamp_ms, pair[0].timestamp_ms
            )));
        }
        Ok(())
    }
}

/// Replay settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Engine configuration
    pub config: Config,
    /// Pointer or gamepad output
    pub mode: OperationMode,
}

/// Counts of everything the engine produced during a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    /// Samples fed to the engine
    pub frames: usize,
    /// Samples dropped by the state gate
    pub dropped: usize,
    /// Samples received while waiting for a face
    pub no_face: usize,
    /// Dwell clicks
    pub clicks: usize,
    /// Gamepad presses per sector
    pub presses: Vec<GamepadSector>,
    /// Gamepad releases
    pub releases: usize,
    /// State transitions in order
    pub transitions: Vec<(EngineState, EngineState)>,
    /// Pointer location at the end, mouse mode only
    pub final_position: Option<PointerPosition>,
    /// Engine state after the last sample
    pub final_state: EngineState,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames:      {}", self.frames)?;
        writeln!(f, "Dropped:     {}", self.dropped)?;
        writeln!(f, "No face:     {}", self.no_face)?;
        writeln!(f, "Clicks:      {}", self.clicks)?;
        writeln!(f, "Presses:     {}", self.presses.len())?;
        writeln!(f, "Releases:    {}", self.releases)?;
        writeln!(f, "Transitions: {}", self.transitions.len())?;
        if let Some(p) = self.final_position {
            writeln!(f, "Pointer:     ({:.1}, {:.1})", p.x, p.y)?;
        }
        write!(f, "Final state: {}", self.final_state)
    }
}

#[derive(Default)]
struct Recorder {
    summary: Mutex<ReplaySummary>,
}

impl Recorder {
    fn with<R>(&self, f: impl FnOnce(&mut ReplaySummary) -> R) -> R {
        f(&mut self.summary.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl GamepadEventListener for Recorder {
    fn button_pressed(&self, sector: GamepadSector) -> Result<()> {
        info!("Button pressed: {sector} ({})", sector.code());
        self.with(|s| s.presses.push(sector));
        Ok(())
    }

    fn button_released(&self, sector: GamepadSector) -> Result<()> {
        info!("Button released: {sector} ({})", sector.code());
        self.with(|s| s.releases += 1);
        Ok(())
    }
}

impl MouseEventSink for Recorder {
    fn on_mouse_event(&self, event: &MouseEvent) -> Result<()> {
        if event.click {
            info!("Click at ({:.0}, {:.0})", event.position.x, event.position.y);
            self.with(|s| s.clicks += 1);
        } else {
            debug!(
                "Pointer ({:.1}, {:.1}) progress {}%",
                event.position.x, event.position.y, event.click_progress
            );
        }
        Ok(())
    }
}

impl StateObserver for Recorder {
    fn on_state_change(&self, from: EngineState, to: EngineState) {
        self.with(|s| s.transitions.push((from, to)));
    }
}

/// Replays traces through a freshly started engine
pub struct ReplayApp {
    manager: EngineManager,
}

impl ReplayApp {
    /// Build the engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate
    pub fn new(config: AppConfig) -> Result<Self> {
        let engine = EngineStateMachine::new(config.config, config.mode)?;
        Ok(Self {
            manager: EngineManager::new(engine),
        })
    }

    /// Run one trace from start to stop
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is already in use or a listener
    /// cannot be registered
    pub fn run(&self, trace: &Trace) -> Result<ReplaySummary> {
        let lease = self.manager.acquire()?;
        let recorder = Arc::new(Recorder::default());
        lease.add_observer(recorder.clone());
        lease.register_listener(recorder.clone())?;
        lease.set_mouse_sink(recorder.clone())?;

        info!("Replaying {} samples in {:?} mode", trace.samples.len(), lease.operation_mode());
        lease.start();
        lease.start();
        lease.dependency_ready();

        let mut dropped = 0;
        let mut no_face = 0;
        for sample in &trace.samples {
            match lease.on_frame(sample) {
                FrameOutcome::Dropped => dropped += 1,
                FrameOutcome::NoFace => no_face += 1,
                FrameOutcome::Pointer(_) | FrameOutcome::Gamepad { .. } => {}
            }
        }

        let final_state = lease.state();
        let final_position = lease.pointer_position();
        lease.stop();
        lease.cleanup();
        lease.unregister_listener();
        lease.clear_mouse_sink();
        lease.clear_observers();
        drop(lease);

        let mut summary = recorder.with(|s| s.clone());
        summary.frames = trace.samples.len();
        summary.dropped = dropped;
        summary.no_face = no_face;
        summary.final_state = final_state;
        summary.final_position = final_position;
        Ok(summary)
    }
}
