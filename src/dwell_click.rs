//! Mouse emulation: pointer position, rest mode and dwell clicking.
//!
//! The pointer integrates the conditioned motion vector and stays inside the
//! screen. A click is synthesized when the pointer stays within a small area
//! for the configured dwell time.

use crate::{config::Config, countdown::Countdown};
use log::{debug, info};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Pointer location in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl PointerPosition {
    /// Create a position
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another position
    #[must_use]
    pub fn distance_sq(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the point lies inside (right and bottom edges excluded)
    #[must_use]
    pub fn contains(&self, point: PointerPosition) -> bool {
        point.x >= self.x && point.x < self.x + self.width && point.y >= self.y && point.y < self.y + self.height
    }
}

/// Regions that stay actionable while rest mode is on, supplied by the
/// click dispatcher (e.g. the dock panel button that leaves rest mode)
pub trait ActionableRegions: Send + Sync {
    /// Whether `point` falls in an always-active region
    fn contains(&self, point: PointerPosition) -> bool;
}

impl ActionableRegions for Vec<Rect> {
    fn contains(&self, point: PointerPosition) -> bool {
        self.iter().any(|r| r.contains(point))
    }
}

/// Shared rest mode flag.
///
/// Written from the click dispatch thread and read from the capture thread;
/// the flag carries no invariant beyond its own value.
#[derive(Debug, Clone, Default)]
pub struct RestModeFlag(Arc<AtomicBool>);

impl RestModeFlag {
    /// Create a cleared flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn rest mode on or off
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }

    /// Whether rest mode is on
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DwellState {
    Reset,
    PointerMoving,
    CountdownStarted,
    ClickDone,
}

/// Dwell click state machine
#[derive(Debug, Clone)]
pub struct DwellClick {
    state: DwellState,
    countdown: Countdown,
    dwell_area_sq: f32,
    consecutive_clicks: bool,
    prev: PointerPosition,
    held_since: Option<i64>,
}

impl DwellClick {
    /// Create a dwell clicker
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(dwell_time_ms: i64, dwell_area: i32, consecutive_clicks: bool) -> Self {
        let area = dwell_area.max(0) as f32;
        Self {
            state: DwellState::Reset,
            countdown: Countdown::new(dwell_time_ms),
            dwell_area_sq: area * area,
            consecutive_clicks,
            prev: PointerPosition::default(),
            held_since: None,
        }
    }

    /// Re-read the dwell settings without resetting progress
    #[allow(clippy::cast_precision_loss)]
    pub fn update_settings(&mut self, dwell_time_ms: i64, dwell_area: i32, consecutive_clicks: bool) {
        let area = dwell_area.max(0) as f32;
        self.countdown.set_timeout_ms(dwell_time_ms);
        self.dwell_area_sq = area * area;
        self.consecutive_clicks = consecutive_clicks;
    }

    /// Forget the previous location; the next update starts over
    pub fn reset(&mut self) {
        self.state = DwellState::Reset;
        self.held_since = None;
    }

    /// Freeze progress starting at `now_ms`
    pub fn hold(&mut self, now_ms: i64) {
        if self.held_since.is_none() {
            self.held_since = Some(now_ms);
        }
    }

    /// Whether progress is currently frozen
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held_since.is_some()
    }

    fn release(&mut self, now_ms: i64) {
        if let Some(since) = self.held_since.take() {
            self.countdown.postpone(now_ms - since);
        }
    }

    fn moved(&self, location: PointerPosition) -> bool {
        self.prev.distance_sq(&location) > self.dwell_area_sq
    }

    /// Feed the current pointer location; returns true when a click fires
    pub fn update(&mut self, location: PointerPosition, now_ms: i64) -> bool {
        self.release(now_ms);
        let mut clicked = false;

        self.state = match self.state {
            DwellState::Reset => DwellState::PointerMoving,
            DwellState::PointerMoving => {
                if self.moved(location) {
                    DwellState::PointerMoving
                } else {
                    self.countdown.start(now_ms);
                    DwellState::CountdownStarted
                }
            }
            DwellState::CountdownStarted => {
                if self.moved(location) {
                    DwellState::PointerMoving
                } else if self.countdown.has_finished(now_ms) {
                    clicked = true;
                    if self.consecutive_clicks {
                        DwellState::PointerMoving
                    } else {
                        DwellState::ClickDone
                    }
                } else {
                    DwellState::CountdownStarted
                }
            }
            DwellState::ClickDone => {
                if self.moved(location) {
                    DwellState::PointerMoving
                } else {
                    DwellState::ClickDone
                }
            }
        };

        self.prev = location;
        clicked
    }

    /// Click progress in `[0, 100]`, 0 unless the countdown is running
    #[must_use]
    pub fn progress_percent(&self, now_ms: i64) -> u8 {
        if self.state != DwellState::CountdownStarted {
            return 0;
        }
        let now = self.held_since.unwrap_or(now_ms);
        self.countdown.elapsed_percent(now)
    }
}

/// Result of processing one frame on the mouse path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// New pointer location
    pub position: PointerPosition,
    /// Whether a click fired on this frame
    pub click: bool,
    /// Dwell progress for the pointer feedback
    pub click_progress: u8,
    /// Rest mode state, for the pointer appearance
    pub rest_mode: bool,
}

/// Pointer and dwell click logic for mouse emulation
pub struct DwellClickController {
    position: PointerPosition,
    screen_width: u32,
    screen_height: u32,
    dwell: DwellClick,
    click_enabled: bool,
    rest_mode: RestModeFlag,
    always_active: Box<dyn ActionableRegions>,
}

impl DwellClickController {
    /// Create a controller with the pointer at the center of the screen
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let mut controller = Self {
            position: PointerPosition::default(),
            screen_width: config.screen.width.max(1),
            screen_height: config.screen.height.max(1),
            dwell: DwellClick::new(
                config.dwell_time_ms(),
                config.dwell.dwell_area,
                config.dwell.consecutive_clicks,
            ),
            click_enabled: true,
            rest_mode: RestModeFlag::new(),
            always_active: Box::new(Vec::<Rect>::new()),
        };
        controller.reset();
        controller
    }

    /// Share a rest mode flag owned by another component
    #[must_use]
    pub fn with_rest_mode(mut self, flag: RestModeFlag) -> Self {
        self.rest_mode = flag;
        self
    }

    /// Set the regions that stay actionable in rest mode
    pub fn set_always_active(&mut self, regions: Box<dyn ActionableRegions>) {
        self.always_active = regions;
    }

    /// Re-read settings, keeping position and dwell progress
    pub fn update_settings(&mut self, config: &Config) {
        self.screen_width = config.screen.width.max(1);
        self.screen_height = config.screen.height.max(1);
        self.dwell.update_settings(
            config.dwell_time_ms(),
            config.dwell.dwell_area,
            config.dwell.consecutive_clicks,
        );
        self.position = self.clamp(self.position);
    }

    /// Center the pointer and restart dwell tracking
    #[allow(clippy::cast_precision_loss)]
    pub fn reset(&mut self) {
        self.position = PointerPosition::new(
            (self.screen_width / 2) as f32,
            (self.screen_height / 2) as f32,
        );
        self.dwell.reset();
    }

    #[allow(clippy::cast_precision_loss)]
    fn clamp(&self, p: PointerPosition) -> PointerPosition {
        let max_x = self.screen_width.saturating_sub(1) as f32;
        let max_y = self.screen_height.saturating_sub(1) as f32;
        PointerPosition::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y))
    }

    /// Current pointer location
    #[must_use]
    pub const fn position(&self) -> PointerPosition {
        self.position
    }

    /// Accumulate a delta onto the pointer, saturating at the screen edges.
    /// In rest mode the pointer stays where it is.
    pub fn update_position(&mut self, dx: f32, dy: f32) -> PointerPosition {
        if self.rest_mode.get() {
            return self.position;
        }
        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };
        self.position = self.clamp(PointerPosition::new(self.position.x + dx, self.position.y + dy));
        self.position
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

    /// Handle to the rest mode flag for other threads
    #[must_use]
    pub fn rest_mode_flag(&self) -> RestModeFlag {
        self.rest_mode.clone()
    }

    /// Enable or disable dwell clicking
    pub fn set_click_enabled(&mut self, enabled: bool) {
        if enabled && !self.click_enabled {
            self.dwell.reset();
        }
        self.click_enabled = enabled;
    }

    /// Whether a click at `point` may be performed.
    /// In rest mode only the always-active regions qualify.
    #[must_use]
    pub fn is_actionable(&self, point: PointerPosition) -> bool {
        !self.rest_mode.get() || self.always_active.contains(point)
    }

    /// Process one conditioned motion vector
    pub fn process(&mut self, dx: f32, dy: f32, now_ms: i64) -> MouseEvent {
        let rest_mode = self.rest_mode.get();
        let position = self.update_position(dx, dy);

        let click = if rest_mode {
            self.dwell.hold(now_ms);
            false
        } else if self.click_enabled && self.is_actionable(position) {
            self.dwell.update(position, now_ms)
        } else {
            self.dwell.reset();
            false
        };

        if click {
            debug!("Dwell click at ({:.0}, {:.0})", position.x, position.y);
        }

        MouseEvent {
            position,
            click,
            click_progress: if self.click_enabled {
                self.dwell.progress_percent(now_ms)
            } else {
                0
            },
            rest_mode,
        }
    }
}
