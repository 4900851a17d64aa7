//! Engine state machine.
//!
//! The engine gates every frame on its current state, runs the face-loss
//! auto-pause, conditions the motion vector and hands it to the active
//! processor (pointer or gamepad).
//!
//! Frames arrive on a capture thread while start/stop/pause/resume and mode
//! switches come from a control thread. One mutex guards the state, the
//! processors and the face countdown. Listener callbacks and the power saving
//! sleep always run with the mutex released.
//!
//! ```text
//! Disabled --start--> Stopped --start--> CheckingDependency --ready--> Running
//! Running --pause--> Paused --resume--> Running
//! Running --face lost--> NoFacePaused --face found--> Running
//! Running|Paused|NoFacePaused --stop--> Stopped --cleanup--> Disabled
//! ```

use crate::{
    config::Config,
    countdown::FaceDetectionCountdown,
    dispatch::{
        deliver_gamepad_events, deliver_mouse_event, GamepadEventListener, ListenerSlot, MouseEventSink,
        StateObserver,
    },
    dwell_click::{DwellClickController, MouseEvent, PointerPosition, Rect, RestModeFlag},
    gamepad::{Gamepad, GamepadEvent, GamepadMode, GamepadSector},
    motion_scaler::MotionScaler,
    orientation::{DeviceRotation, OrientationCorrector},
    power::PowerManagement,
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::Deref,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

/// Lifecycle state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// Not initialised
    #[default]
    Disabled,
    /// Initialised, not processing
    Stopped,
    /// Waiting for the vision dependency to become available
    CheckingDependency,
    /// Processing frames
    Running,
    /// Paused by the user
    Paused,
    /// Paused because no face has been seen for a while
    NoFacePaused,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One frame worth of vision output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Horizontal motion
    pub dx: f32,
    /// Vertical motion
    pub dy: f32,
    /// Whether a face was found in the frame
    #[serde(default)]
    pub face_detected: bool,
    /// Capture time in milliseconds
    pub timestamp_ms: i64,
}

impl MotionSample {
    /// Create a sample
    #[must_use]
    pub const fn new(dx: f32, dy: f32, face_detected: bool, timestamp_ms: i64) -> Self {
        Self {
            dx,
            dy,
            face_detected,
            timestamp_ms,
        }
    }
}

/// What the engine does with the conditioned motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    /// Pointer with dwell clicking
    #[default]
    Mouse,
    /// Virtual joystick
    GamepadAbsolute,
    /// Shake gestures
    GamepadRelative,
}

impl OperationMode {
    const fn gamepad_mode(self) -> Option<GamepadMode> {
        match self {
            Self::Mouse => None,
            Self::GamepadAbsolute => Some(GamepadMode::Absolute),
            Self::GamepadRelative => Some(GamepadMode::Relative),
        }
    }
}

/// The processor fed by the engine
pub enum MotionProcessor {
    /// Pointer with dwell clicking
    Mouse(DwellClickController),
    /// Absolute or relative gamepad
    Gamepad(Gamepad),
}

/// Result of feeding a frame to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Not processing in the current state
    Dropped,
    /// Waiting for the face to come back
    NoFace,
    /// Pointer update
    Pointer(MouseEvent),
    /// Gamepad sector and the edges it produced
    Gamepad {
        sector: GamepadSector,
        events: Vec<GamepadEvent>,
    },
}

type Transition = (EngineState, EngineState);

struct Inner {
    state: EngineState,
    pending_pause: bool,
    saved_state: Option<EngineState>,
    last_timestamp_ms: Option<i64>,
    config: Config,
    mode: OperationMode,
    orientation: OrientationCorrector,
    scaler: MotionScaler,
    face_countdown: FaceDetectionCountdown,
    processor: MotionProcessor,
    always_active: Vec<Rect>,
}

impl Inner {
    fn transition(&mut self, to: EngineState, changes: &mut Vec<Transition>) {
        let from = self.state;
        if from == to {
            return;
        }
        info!("Engine state {from} -> {to}");
        self.state = to;
        changes.push((from, to));
    }

    fn build_processor(&self, rest_mode: &RestModeFlag) -> MotionProcessor {
        match self.mode.gamepad_mode() {
            None => {
                let mut controller = DwellClickController::new(&self.config).with_rest_mode(rest_mode.clone());
                controller.set_always_active(Box::new(self.always_active.clone()));
                MotionProcessor::Mouse(controller)
            }
            Some(gamepad_mode) => {
                let mut settings = self.config.gamepad.clone();
                settings.mode = gamepad_mode;
                MotionProcessor::Gamepad(Gamepad::new(&settings))
            }
        }
    }

    /// Forget motion history. Releases a held gamepad button.
    fn reset_processing(&mut self) -> Vec<GamepadEvent> {
        self.scaler.reset();
        self.last_timestamp_ms = None;
        match &mut self.processor {
            MotionProcessor::Mouse(controller) => {
                controller.reset();
                Vec::new()
            }
            MotionProcessor::Gamepad(gamepad) => gamepad.reset(),
        }
    }

    fn release_buttons(&mut self) -> Vec<GamepadEvent> {
        match &mut self.processor {
            MotionProcessor::Gamepad(gamepad) if gamepad.pressed().is_pressed() => gamepad.reset(),
            _ => Vec::new(),
        }
    }

    fn dispatch(&mut self, dx: f32, dy: f32, now_ms: i64) -> FrameOutcome {
        let (dx, dy) = self.orientation.correct(dx, dy);
        let (dx, dy) = self.scaler.process(dx, dy);
        match &mut self.processor {
            MotionProcessor::Mouse(controller) => FrameOutcome::Pointer(controller.process(dx, dy, now_ms)),
            MotionProcessor::Gamepad(gamepad) => {
                let (sector, events) = gamepad.process(dx, dy, now_ms);
                FrameOutcome::Gamepad { sector, events }
            }
        }
    }
}

/// The engine. Shared between the capture and control threads behind an `Arc`.
pub struct EngineStateMachine {
    inner: Mutex<Inner>,
    power: PowerManagement,
    rest_mode: RestModeFlag,
    gamepad_listener: ListenerSlot<dyn GamepadEventListener>,
    mouse_sink: ListenerSlot<dyn MouseEventSink>,
    observers: Mutex<Vec<Arc<dyn StateObserver>>>,
}

impl EngineStateMachine {
    /// Create a disabled engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate
    pub fn new(config: Config, mode: OperationMode) -> Result<Self> {
        config.validate()?;
        let rest_mode = RestModeFlag::new();
        let scaler = MotionScaler::new(&config.pointer)?;
        let mut inner = Inner {
            state: EngineState::Disabled,
            pending_pause: false,
            saved_state: None,
            last_timestamp_ms: None,
            orientation: OrientationCorrector::new(
                config.orientation.camera_flip,
                config.orientation.device_rotation,
            ),
            scaler,
            face_countdown: FaceDetectionCountdown::new(config.face_timeout_ms()),
            processor: MotionProcessor::Mouse(DwellClickController::new(&config)),
            always_active: Vec::new(),
            mode,
            config,
        };
        inner.processor = inner.build_processor(&rest_mode);
        let power = PowerManagement::new(&inner.config.power);

        Ok(Self {
            inner: Mutex::new(inner),
            power,
            rest_mode,
            gamepad_listener: ListenerSlot::new(),
            mouse_sink: ListenerSlot::new(),
            observers: Mutex::new(Vec::new()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, changes: &[Transition]) {
        if changes.is_empty() {
            return;
        }
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner).clone();
        for &(from, to) in changes {
            for observer in &observers {
                observer.on_state_change(from, to);
            }
        }
    }

    fn deliver(&self, events: &[GamepadEvent]) {
        if events.is_empty() {
            return;
        }
        if let Some(listener) = self.gamepad_listener.get() {
            deliver_gamepad_events(listener.as_ref(), events);
        }
    }

    fn ignored(&self, operation: &str, state: EngineState) {
        debug!("Ignoring {operation} in state {state}");
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.lock().state
    }

    /// Whether the engine is stopped. Once this returns true after `stop()`,
    /// no frame is processed against live state.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self.state(), EngineState::Stopped | EngineState::Disabled)
    }

    /// Current operation mode
    #[must_use]
    pub fn operation_mode(&self) -> OperationMode {
        self.lock().mode
    }

    /// Copy of the active configuration
    #[must_use]
    pub fn config(&self) -> Config {
        self.lock().config.clone()
    }

    /// Power management shared with the capture thread
    #[must_use]
    pub const fn power(&self) -> &PowerManagement {
        &self.power
    }

    /// `Disabled` to `Stopped`, `Stopped` to `CheckingDependency`.
    /// From `Paused` or `NoFacePaused` this resumes.
    pub fn start(&self) {
        let mut changes = Vec::new();
        let events = {
            let mut inner = self.lock();
            match inner.state {
                EngineState::Disabled => {
                    inner.transition(EngineState::Stopped, &mut changes);
                    Vec::new()
                }
                EngineState::Stopped => {
                    self.power.set_sleep_enabled(true);
                    inner.pending_pause = false;
                    inner.transition(EngineState::CheckingDependency, &mut changes);
                    Vec::new()
                }
                EngineState::Paused | EngineState::NoFacePaused => self.resume_locked(&mut inner, &mut changes),
                state => {
                    self.ignored("start", state);
                    Vec::new()
                }
            }
        };
        self.deliver(&events);
        self.notify(&changes);
    }

    /// The vision dependency is available: `CheckingDependency` to `Running`,
    /// or to `Paused` if a pause was requested meanwhile
    pub fn dependency_ready(&self) {
        let mut changes = Vec::new();
        let events = {
            let mut inner = self.lock();
            if inner.state == EngineState::CheckingDependency {
                let events = inner.reset_processing();
                inner.face_countdown.arm();
                inner.transition(EngineState::Running, &mut changes);
                if std::mem::take(&mut inner.pending_pause) {
                    debug!("Applying pause requested during dependency check");
                    inner.transition(EngineState::Paused, &mut changes);
                }
                events
            } else {
                self.ignored("dependency_ready", inner.state);
                Vec::new()
            }
        };
        self.deliver(&events);
        self.notify(&changes);
    }

    /// The vision dependency could not be installed: back to `Stopped`
    pub fn dependency_failed(&self) {
        let mut changes = Vec::new();
        {
            let mut inner = self.lock();
            if inner.state == EngineState::CheckingDependency {
                warn!("Vision dependency unavailable, stopping engine");
                inner.pending_pause = false;
                self.power.set_sleep_enabled(false);
                inner.transition(EngineState::Stopped, &mut changes);
            } else {
                self.ignored("dependency_failed", inner.state);
            }
        }
        self.notify(&changes);
    }

    /// `Running` or `NoFacePaused` to `Paused`. Remembered while checking the dependency.
    pub fn pause(&self) {
        let mut changes = Vec::new();
        let events = {
            let mut inner = self.lock();
            match inner.state {
                EngineState::Running | EngineState::NoFacePaused => {
                    self.power.set_sleep_enabled(true);
                    let events = inner.release_buttons();
                    inner.transition(EngineState::Paused, &mut changes);
                    events
                }
                EngineState::CheckingDependency => {
                    debug!("Pause requested during dependency check");
                    inner.pending_pause = true;
                    Vec::new()
                }
                state => {
                    self.ignored("pause", state);
                    Vec::new()
                }
            }
        };
        self.deliver(&events);
        self.notify(&changes);
    }

    /// `Paused` or `NoFacePaused` to `Running`
    pub fn resume(&self) {
        let mut changes = Vec::new();
        let events = {
            let mut inner = self.lock();
            match inner.state {
                EngineState::Paused | EngineState::NoFacePaused => self.resume_locked(&mut inner, &mut changes),
                EngineState::CheckingDependency => {
                    inner.pending_pause = false;
                    Vec::new()
                }
                state => {
                    self.ignored("resume", state);
                    Vec::new()
                }
            }
        };
        self.deliver(&events);
        self.notify(&changes);
    }

    fn resume_locked(&self, inner: &mut Inner, changes: &mut Vec<Transition>) -> Vec<GamepadEvent> {
        let events = inner.reset_processing();
        inner.face_countdown.arm();
        inner.transition(EngineState::Running, changes);
        events
    }

    /// Stop processing. Cancels a pending power saving sleep.
    pub fn stop(&self) {
        let mut changes = Vec::new();
        let events = {
            let mut inner = self.lock();
            match inner.state {
                EngineState::Running
                | EngineState::Paused
                | EngineState::NoFacePaused
                | EngineState::CheckingDependency => {
                    self.power.set_sleep_enabled(false);
                    inner.pending_pause = false;
                    let events = inner.release_buttons();
                    inner.transition(EngineState::Stopped, &mut changes);
                    events
                }
                state => {
                    self.ignored("stop", state);
                    Vec::new()
                }
            }
        };
        self.deliver(&events);
        self.notify(&changes);
    }

    /// Back to `Disabled`, stopping first if needed
    pub fn cleanup(&self) {
        self.stop();
        let mut changes = Vec::new();
        {
            let mut inner = self.lock();
            if inner.state == EngineState::Stopped {
                inner.saved_state = None;
                inner.transition(EngineState::Disabled, &mut changes);
            } else {
                self.ignored("cleanup", inner.state);
            }
        }
        self.notify(&changes);
    }

    /// Process one frame. Called from the capture thread, in capture order.
    pub fn on_frame(&self, sample: &MotionSample) -> FrameOutcome {
        let mut changes = Vec::new();
        let mut sleep = false;

        let outcome = {
            let mut inner = self.lock();
            let now = sample.timestamp_ms;

            match inner.state {
                EngineState::Running | EngineState::NoFacePaused => {
                    if inner.last_timestamp_ms.is_some_and(|last| now < last) {
                        warn!("Dropping out of order frame at {now} ms");
                        return FrameOutcome::Dropped;
                    }
                    inner.last_timestamp_ms = Some(now);

                    if sample.face_detected || inner.face_countdown.is_armed() {
                        inner.face_countdown.reset(now);
                    }

                    if inner.state == EngineState::NoFacePaused {
                        if sample.face_detected {
                            info!("Face detected again, resuming");
                            inner.scaler.reset();
                            inner.transition(EngineState::Running, &mut changes);
                            inner.dispatch(sample.dx, sample.dy, now)
                        } else {
                            sleep = !self.power.screen_on();
                            FrameOutcome::NoFace
                        }
                    } else if !sample.face_detected && inner.face_countdown.has_finished(now) {
                        info!(
                            "No face for {} ms, pausing",
                            inner.face_countdown.elapsed_ms(now)
                        );
                        self.power.set_sleep_enabled(true);
                        let events = inner.release_buttons();
                        inner.transition(EngineState::NoFacePaused, &mut changes);
                        if events.is_empty() {
                            FrameOutcome::NoFace
                        } else {
                            FrameOutcome::Gamepad {
                                sector: GamepadSector::None,
                                events,
                            }
                        }
                    } else {
                        inner.dispatch(sample.dx, sample.dy, now)
                    }
                }
                _ => {
                    sleep = true;
                    FrameOutcome::Dropped
                }
            }
        };

        match &outcome {
            FrameOutcome::Pointer(event) => {
                if let Some(sink) = self.mouse_sink.get() {
                    deliver_mouse_event(sink.as_ref(), event);
                }
            }
            FrameOutcome::Gamepad { events, .. } => self.deliver(events),
            FrameOutcome::Dropped | FrameOutcome::NoFace => {}
        }
        self.notify(&changes);

        if sleep {
            self.power.sleep();
        }
        outcome
    }

    /// Switch between pointer and gamepad output
    pub fn set_operation_mode(&self, mode: OperationMode) {
        let events = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            if inner.mode == mode {
                return;
            }
            info!("Operation mode {:?} -> {:?}", inner.mode, mode);
            inner.mode = mode;
            match (&mut inner.processor, mode.gamepad_mode()) {
                (MotionProcessor::Gamepad(gamepad), Some(gamepad_mode)) => gamepad.set_mode(gamepad_mode),
                _ => {
                    let events = inner.release_buttons();
                    let processor = inner.build_processor(&self.rest_mode);
                    inner.processor = processor;
                    inner.scaler.reset();
                    events
                }
            }
        };
        self.deliver(&events);
    }

    /// Re-read every setting without touching positions or the state
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate; nothing is changed then
    pub fn apply_config(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let mut inner = self.lock();
        inner.scaler.update_settings(&config.pointer)?;
        inner.orientation = OrientationCorrector::new(
            config.orientation.camera_flip,
            config.orientation.device_rotation,
        );
        inner.face_countdown.set_timeout_ms(config.face_timeout_ms());
        match &mut inner.processor {
            MotionProcessor::Mouse(controller) => controller.update_settings(config),
            MotionProcessor::Gamepad(gamepad) => gamepad.update_settings(&config.gamepad),
        }
        self.power.update_settings(&config.power);
        inner.config = config.clone();
        debug!("Configuration applied");
        Ok(())
    }

    /// Update the device rotation reported by the orientation sensor
    pub fn set_device_rotation(&self, rotation: DeviceRotation) {
        let mut inner = self.lock();
        if inner.orientation.rotation() != rotation {
            debug!("Device rotation {}", rotation.degrees());
            inner.orientation.set_rotation(rotation);
            inner.config.orientation.device_rotation = rotation;
        }
    }

    /// Screen switched on or off.
    ///
    /// Going off stops the engine unless it is waiting for a face, in which
    /// case it keeps capturing and sleeps between frames. Coming back on
    /// restores the state saved when it went off.
    pub fn on_screen_state_change(&self, on: bool) {
        if !self.power.set_screen_on(on) {
            return;
        }
        if on {
            let saved = self.lock().saved_state.take();
            match saved {
                Some(EngineState::Running | EngineState::NoFacePaused) => self.start(),
                Some(EngineState::Paused) => {
                    self.start();
                    self.pause();
                }
                _ => {}
            }
        } else {
            let state = {
                let mut inner = self.lock();
                inner.saved_state = Some(inner.state);
                inner.state
            };
            if state != EngineState::NoFacePaused {
                self.stop();
            }
        }
    }

    /// Register the receiver of gamepad edges
    ///
    /// # Errors
    ///
    /// Returns `ListenerError` if a listener is already registered
    pub fn register_listener(&self, listener: Arc<dyn GamepadEventListener>) -> Result<()> {
        self.gamepad_listener.register(listener)?;
        info!("Gamepad listener registered");
        Ok(())
    }

    /// Remove the gamepad listener
    pub fn unregister_listener(&self) {
        if self.gamepad_listener.unregister().is_some() {
            info!("Gamepad listener unregistered");
        }
    }

    /// Register the receiver of pointer updates
    ///
    /// # Errors
    ///
    /// Returns `ListenerError` if a sink is already registered
    pub fn set_mouse_sink(&self, sink: Arc<dyn MouseEventSink>) -> Result<()> {
        self.mouse_sink.register(sink)
    }

    /// Remove the pointer sink
    pub fn clear_mouse_sink(&self) {
        self.mouse_sink.unregister();
    }

    /// Observe state transitions
    pub fn add_observer(&self, observer: Arc<dyn StateObserver>) {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner).push(observer);
    }

    /// Drop every state observer
    pub fn clear_observers(&self) {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Turn rest mode on or off
    pub fn set_rest_mode(&self, enabled: bool) {
        if self.rest_mode.get() != enabled {
            info!("Rest mode {}", if enabled { "enabled" } else { "disabled" });
        }
        self.rest_mode.set(enabled);
    }

    /// Whether rest mode is on
    #[must_use]
    pub fn rest_mode(&self) -> bool {
        self.rest_mode.get()
    }

    /// Handle to the rest mode flag, for the click dispatcher
    #[must_use]
    pub fn rest_mode_flag(&self) -> RestModeFlag {
        self.rest_mode.clone()
    }

    /// Regions that stay clickable in rest mode
    pub fn set_always_active(&self, regions: Vec<Rect>) {
        let mut inner = self.lock();
        if let MotionProcessor::Mouse(controller) = &mut inner.processor {
            controller.set_always_active(Box::new(regions.clone()));
        }
        inner.always_active = regions;
    }

    /// Whether a click at `point` may be performed
    #[must_use]
    pub fn is_actionable(&self, point: PointerPosition) -> bool {
        match &self.lock().processor {
            MotionProcessor::Mouse(controller) => controller.is_actionable(point),
            MotionProcessor::Gamepad(_) => !self.rest_mode.get(),
        }
    }

    /// Enable or disable dwell clicking
    pub fn set_click_enabled(&self, enabled: bool) {
        if let MotionProcessor::Mouse(controller) = &mut self.lock().processor {
            controller.set_click_enabled(enabled);
        }
    }

    /// Pointer location in mouse mode
    #[must_use]
    pub fn pointer_position(&self) -> Option<PointerPosition> {
        match &self.lock().processor {
            MotionProcessor::Mouse(controller) => Some(controller.position()),
            MotionProcessor::Gamepad(_) => None,
        }
    }

    /// Sector to highlight in gamepad mode
    #[must_use]
    pub fn highlighted_sector(&self, now_ms: i64) -> GamepadSector {
        match &self.lock().processor {
            MotionProcessor::Gamepad(gamepad) => gamepad.highlighted_sector(now_ms),
            MotionProcessor::Mouse(_) => GamepadSector::None,
        }
    }

    /// Copy of the face detection countdown, for status feedback
    #[must_use]
    pub fn face_detection_countdown(&self) -> FaceDetectionCountdown {
        self.lock().face_countdown.clone()
    }
}

/// Hands out exclusive use of one engine.
///
/// Only one host at a time may drive the engine; a second `acquire` fails
/// until the first lease is dropped.
pub struct EngineManager {
    engine: Arc<EngineStateMachine>,
    owned: Arc<AtomicBool>,
}

impl EngineManager {
    /// Manage `engine`
    #[must_use]
    pub fn new(engine: EngineStateMachine) -> Self {
        Self {
            engine: Arc::new(engine),
            owned: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Take ownership of the engine
    ///
    /// # Errors
    ///
    /// Returns `EngineBusy` if another lease is alive
    pub fn acquire(&self) -> Result<EngineLease> {
        if self.owned.swap(true, Ordering::SeqCst) {
            return Err(Error::EngineBusy);
        }
        debug!("Engine acquired");
        Ok(EngineLease {
            engine: Arc::clone(&self.engine),
            owned: Arc::clone(&self.owned),
        })
    }

    /// Whether a lease is alive
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owned.load(Ordering::SeqCst)
    }
}

/// Exclusive handle on the engine. Dropping it cleans the engine up.
pub struct EngineLease {
    engine: Arc<EngineStateMachine>,
    owned: Arc<AtomicBool>,
}

impl EngineLease {
    /// Shared handle for the capture thread
    #[must_use]
    pub fn engine(&self) -> Arc<EngineStateMachine> {
        Arc::clone(&self.engine)
    }
}

impl Deref for EngineLease {
    type Target = EngineStateMachine;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        self.engine.cleanup();
        self.owned.store(false, Ordering::SeqCst);
        debug!("Engine released");
    }
}
