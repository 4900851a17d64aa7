//! Time based countdowns.
//!
//! Time is passed in explicitly as milliseconds taken from the capture
//! timestamps of the frames, so the countdowns advance in frame order and
//! never read a wall clock of their own.

/// Countdown with millisecond precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    last_reset_ms: Option<i64>,
    timeout_ms: i64,
}

impl Countdown {
    /// Create a countdown that has not been started yet
    #[must_use]
    pub fn new(timeout_ms: i64) -> Self {
        Self {
            last_reset_ms: None,
            timeout_ms: timeout_ms.max(0),
        }
    }

    /// Restart the countdown at `now_ms`
    pub fn start(&mut self, now_ms: i64) {
        self.last_reset_ms = Some(now_ms);
    }

    /// Forget the start time; the countdown is idle until started again
    pub fn clear(&mut self) {
        self.last_reset_ms = None;
    }

    /// Move the start time forward, freezing progress for `ms` milliseconds
    pub fn postpone(&mut self, ms: i64) {
        if let Some(start) = self.last_reset_ms.as_mut() {
            *start += ms.max(0);
        }
    }

    /// Whether the countdown has been started
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.last_reset_ms.is_some()
    }

    /// Change the duration without restarting
    pub fn set_timeout_ms(&mut self, timeout_ms: i64) {
        self.timeout_ms = timeout_ms.max(0);
    }

    /// Duration in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> i64 {
        self.timeout_ms
    }

    /// Milliseconds since the last start, 0 when idle
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        self.last_reset_ms.map_or(0, |start| (now_ms - start).max(0))
    }

    /// Remaining milliseconds, 0 once expired
    #[must_use]
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.timeout_ms - self.elapsed_ms(now_ms)).max(0)
    }

    /// Percent of the countdown completed, in `[0, 100]`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn elapsed_percent(&self, now_ms: i64) -> u8 {
        if self.timeout_ms == 0 {
            return 100;
        }
        let elapsed = self.elapsed_ms(now_ms);
        if elapsed > self.timeout_ms {
            return 100;
        }
        ((100 * elapsed) / self.timeout_ms) as u8
    }

    /// Whether the countdown has expired. An idle countdown never expires.
    #[must_use]
    pub fn has_finished(&self, now_ms: i64) -> bool {
        self.is_started() && self.elapsed_ms(now_ms) > self.timeout_ms
    }
}

/// Timeout value meaning "auto-pause disabled"
pub const FACE_DETECTION_DISABLED: i64 = 0;

/// Time elapsed since a face was last detected.
///
/// A timeout of [`FACE_DETECTION_DISABLED`] turns the auto-pause off; every
/// query honors that sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceDetectionCountdown {
    countdown: Countdown,
}

impl FaceDetectionCountdown {
    /// Create a countdown with the given timeout in milliseconds
    #[must_use]
    pub fn new(timeout_ms: i64) -> Self {
        Self {
            countdown: Countdown::new(timeout_ms),
        }
    }

    /// Record a positive face detection at `now_ms`
    pub fn reset(&mut self, now_ms: i64) {
        self.countdown.start(now_ms);
    }

    /// Wait for the next frame before counting again
    pub fn arm(&mut self) {
        self.countdown.clear();
    }

    /// Whether the countdown is waiting for its first timestamp
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        !self.countdown.is_started()
    }

    /// Change the timeout
    pub fn set_timeout_ms(&mut self, timeout_ms: i64) {
        self.countdown.set_timeout_ms(timeout_ms);
    }

    /// Timeout in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> i64 {
        self.countdown.timeout_ms()
    }

    /// True iff the auto-pause is turned off
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.countdown.timeout_ms() == FACE_DETECTION_DISABLED
    }

    /// Whether the face has been missing for longer than the timeout
    #[must_use]
    pub fn has_finished(&self, now_ms: i64) -> bool {
        !self.is_disabled() && self.countdown.has_finished(now_ms)
    }

    /// Milliseconds since the last detection
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        self.countdown.elapsed_ms(now_ms)
    }

    /// Percent of the timeout elapsed, 100 when disabled
    #[must_use]
    pub fn elapsed_percent(&self, now_ms: i64) -> u8 {
        if self.is_disabled() {
            return 100;
        }
        self.countdown.elapsed_percent(now_ms)
    }
}
