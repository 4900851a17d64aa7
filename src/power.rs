//! Power saving for the capture thread.
//!
//! While the engine is not processing frames the capture thread is put to
//! sleep for a bounded time after every frame. The sleep can be cut short
//! from the control thread so `stop()` never waits on it.

use crate::config::PowerConfig;
use log::{debug, info};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Condvar, Mutex, PoisonError,
    },
    time::Duration,
};

/// Cancellable sleep and screen state
#[derive(Debug)]
pub struct PowerManagement {
    sleep_enabled: Mutex<bool>,
    wake: Condvar,
    max_sleep: Mutex<Duration>,
    screen_on: AtomicBool,
}

impl PowerManagement {
    /// Create from settings. The screen starts on.
    #[must_use]
    pub fn new(config: &PowerConfig) -> Self {
        Self {
            sleep_enabled: Mutex::new(true),
            wake: Condvar::new(),
            max_sleep: Mutex::new(Self::duration(config)),
            screen_on: AtomicBool::new(true),
        }
    }

    fn duration(config: &PowerConfig) -> Duration {
        Duration::from_millis(config.sleep_slice_ms.saturating_mul(u64::from(config.sleep_slices)))
    }

    /// Change the sleep length
    pub fn update_settings(&self, config: &PowerConfig) {
        *self.max_sleep.lock().unwrap_or_else(PoisonError::into_inner) = Self::duration(config);
    }

    /// Longest time a single `sleep` call may take
    #[must_use]
    pub fn max_sleep(&self) -> Duration {
        *self.max_sleep.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allow or cancel sleeping. Disabling wakes any sleeping thread.
    pub fn set_sleep_enabled(&self, enabled: bool) {
        let mut guard = self.sleep_enabled.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = enabled;
        if !enabled {
            self.wake.notify_all();
        }
    }

    /// Whether sleeping is allowed
    #[must_use]
    pub fn is_sleep_enabled(&self) -> bool {
        *self.sleep_enabled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block the calling thread for up to [`max_sleep`](Self::max_sleep).
    /// Returns early once sleeping is disabled. Returns whether the full
    /// time was slept.
    pub fn sleep(&self) -> bool {
        let timeout = self.max_sleep();
        if timeout.is_zero() {
            return false;
        }
        let guard = self.sleep_enabled.lock().unwrap_or_else(PoisonError::into_inner);
        let (_guard, result) = self
            .wake
            .wait_timeout_while(guard, timeout, |enabled| *enabled)
            .unwrap_or_else(PoisonError::into_inner);
        if !result.timed_out() {
            debug!("Power saving sleep cancelled");
        }
        result.timed_out()
    }

    /// Record a screen on/off change. Returns whether the state changed.
    pub fn set_screen_on(&self, on: bool) -> bool {
        let changed = self.screen_on.swap(on, Ordering::SeqCst) != on;
        if changed {
            info!("Screen switched {}", if on { "on" } else { "off" });
        }
        changed
    }

    /// Whether the screen is on
    #[must_use]
    pub fn screen_on(&self) -> bool {
        self.screen_on.load(Ordering::SeqCst)
    }
}

impl Default for PowerManagement {
    fn default() -> Self {
        Self::new(&PowerConfig::default())
    }
}
