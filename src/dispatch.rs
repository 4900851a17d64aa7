//! Event sinks for the outputs of the engine.
//!
//! Listeners live outside the engine (an IPC bridge, an accessibility action
//! executor, the replay harness). A failed delivery is logged and dropped;
//! it never reaches the state machine.

use crate::{
    dwell_click::MouseEvent,
    engine::EngineState,
    gamepad::{GamepadEvent, GamepadSector},
    Error, Result,
};
use log::{debug, warn};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives gamepad button edges
pub trait GamepadEventListener: Send + Sync {
    /// A direction became active
    fn button_pressed(&self, sector: GamepadSector) -> Result<()>;

    /// A direction is no longer active
    fn button_released(&self, sector: GamepadSector) -> Result<()>;
}

/// Receives pointer updates and clicks
pub trait MouseEventSink: Send + Sync {
    /// Called once per processed frame in mouse mode
    fn on_mouse_event(&self, event: &MouseEvent) -> Result<()>;
}

/// Receives engine state transitions
pub trait StateObserver: Send + Sync {
    /// Called after every transition
    fn on_state_change(&self, from: EngineState, to: EngineState);
}

/// Deliver gamepad edges in order. Returns how many were accepted.
pub fn deliver_gamepad_events(listener: &dyn GamepadEventListener, events: &[GamepadEvent]) -> usize {
    let mut delivered = 0;
    for event in events {
        let outcome = match *event {
            GamepadEvent::Pressed(sector) => listener.button_pressed(sector),
            GamepadEvent::Released(sector) => listener.button_released(sector),
        };
        match outcome {
            Ok(()) => delivered += 1,
            Err(e) => warn!("Failed to deliver {event:?}: {e}"),
        }
    }
    delivered
}

/// Deliver a pointer update, logging a failure
pub fn deliver_mouse_event(sink: &dyn MouseEventSink, event: &MouseEvent) -> bool {
    match sink.on_mouse_event(event) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to deliver mouse event: {e}");
            false
        }
    }
}

/// Holder for at most one registered listener
pub struct ListenerSlot<T: ?Sized> {
    inner: Mutex<Option<Arc<T>>>,
}

impl<T: ?Sized> Default for ListenerSlot<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }
}

impl<T: ?Sized> ListenerSlot<T> {
    /// Create an empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    ///
    /// # Errors
    ///
    /// Returns `ListenerError` if one is already registered
    pub fn register(&self, listener: Arc<T>) -> Result<()> {
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(Error::ListenerError("A listener is already registered".to_string()));
        }
        *slot = Some(listener);
        debug!("Listener registered");
        Ok(())
    }

    /// Remove the listener, if any
    pub fn unregister(&self) -> Option<Arc<T>> {
        let previous = self.inner.lock().unwrap_or_else(PoisonError::into_inner).take();
        if previous.is_some() {
            debug!("Listener unregistered");
        }
        previous
    }

    /// Current listener
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether a listener is registered
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}
