//! Placement Executor: the only code allowed to mutate a window.
//!
//! # Normal placement
//!
//! One `SetWindowPos` with the target rectangle, then the actual rectangle is
//! read back.  Windows may silently override the size (minimum track size,
//! DPI-triggered resize on the monitor change), so:
//!
//! - position off by more than `position_tolerance` → failure;
//! - position fine but size off by more than `size_tolerance` → exactly one
//!   corrective resize, still success.
//!
//! # Show-state transitions
//!
//! `restore` and `maximize` issue `ShowWindow` and then poll the placement
//! until the requested state is observed or `settle_timeout` elapses.
//!
//! Every API error is logged and turned into `false`.  Nothing in here
//! panics or returns an error to the hotkey worker.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use hopper_core::{ShowState, TargetRect, WindowHandle, WindowSnapshot};
use tracing::{debug, error, info, warn};

use super::desktop::{ShowCommand, WindowSystem};

/// Tolerances and settle timing for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementOptions {
    pub position_tolerance: i32,
    pub size_tolerance: i32,
    pub settle_timeout: Duration,
    pub settle_poll: Duration,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            position_tolerance: 10,
            size_tolerance: 50,
            settle_timeout: Duration::from_millis(300),
            settle_poll: Duration::from_millis(10),
        }
    }
}

pub struct PlacementExecutor {
    windows: Arc<dyn WindowSystem>,
    options: PlacementOptions,
}

impl PlacementExecutor {
    pub fn new(windows: Arc<dyn WindowSystem>, options: PlacementOptions) -> Self {
        Self { windows, options }
    }

    pub fn options(&self) -> PlacementOptions {
        self.options
    }

    /// Confirms the captured handle is still usable and returns the handle to
    /// act on.
    ///
    /// If focus moved to another live window since capture, that window is
    /// targeted instead.
    pub fn validate(&self, snapshot: &WindowSnapshot) -> Option<WindowHandle> {
        let captured = snapshot.handle;
        if captured.is_null() || !self.windows.is_window(captured) {
            error!("invalid window handle: {captured:?}");
            return None;
        }

        match self.windows.foreground_window() {
            Some(current) if current == captured => Some(captured),
            Some(current) => {
                warn!("window handle changed: expected {captured:?}, current {current:?}");
                if current.is_null() || !self.windows.is_window(current) {
                    error!("current foreground window is also invalid");
                    return None;
                }
                Some(current)
            }
            None => {
                // Focus went to nothing (e.g. the desktop); the captured
                // window is still alive, so keep it.
                debug!("no foreground window; keeping captured handle");
                Some(captured)
            }
        }
    }

    /// Validates `snapshot` and applies `target` to it.
    pub fn place(&self, snapshot: &WindowSnapshot, target: TargetRect) -> bool {
        match self.validate(snapshot) {
            Some(window) => self.place_window(window, target),
            None => false,
        }
    }

    /// Applies `target` to `window` and verifies the outcome.
    pub fn place_window(&self, window: WindowHandle, target: TargetRect) -> bool {
        debug!(?window, ?target, "moving window");
        if let Err(e) = self.windows.set_window_pos(window, target) {
            error!("failed to move window: {e}");
            return false;
        }

        let actual = match self.windows.window_rect(window) {
            Ok(rect) => rect,
            Err(e) => {
                debug!("could not verify window position: {e}");
                return false;
            }
        };

        let tolerance = self.options.position_tolerance;
        let position_ok = (actual.left - target.x).abs() <= tolerance
            && (actual.top - target.y).abs() <= tolerance;
        if !position_ok {
            debug!(
                "position incorrect. expected: ({}, {}), actual: ({}, {})",
                target.x, target.y, actual.left, actual.top
            );
            return false;
        }

        let size_tolerance = self.options.size_tolerance;
        if (actual.width() - target.width).abs() > size_tolerance
            || (actual.height() - target.height).abs() > size_tolerance
        {
            debug!(
                "size auto-adjusted by Windows: {}x{}, correcting to {}x{}",
                actual.width(),
                actual.height(),
                target.width,
                target.height
            );
            let corrected = TargetRect::new(actual.left, actual.top, target.width, target.height);
            if let Err(e) = self.windows.set_window_pos(window, corrected) {
                warn!("corrective resize failed: {e}");
            }
        }

        info!("window moved successfully");
        true
    }

    /// Restores a maximized window and waits for the normal state.
    pub fn restore(&self, window: WindowHandle) -> bool {
        self.transition(window, ShowCommand::Restore, ShowState::Normal)
    }

    /// Maximizes a window and waits for the maximized state.
    pub fn maximize(&self, window: WindowHandle) -> bool {
        self.transition(window, ShowCommand::Maximize, ShowState::Maximized)
    }

    fn transition(&self, window: WindowHandle, command: ShowCommand, want: ShowState) -> bool {
        if let Err(e) = self.windows.show_window(window, command) {
            error!("ShowWindow({command:?}) failed: {e}");
            return false;
        }
        self.settle(window, want)
    }

    /// Polls the placement until `want` is observed or the timeout elapses.
    fn settle(&self, window: WindowHandle, want: ShowState) -> bool {
        let started = Instant::now();
        loop {
            match self.windows.show_cmd(window) {
                Ok(cmd) if ShowState::from_show_cmd(cmd) == want => {
                    debug!(?want, elapsed = ?started.elapsed(), "window settled");
                    return true;
                }
                Ok(cmd) => debug!("waiting for {want:?}, currently {}", ShowState::show_cmd_name(cmd)),
                Err(e) => {
                    debug!("failed to read placement while settling: {e}");
                    return false;
                }
            }
            if started.elapsed() >= self.options.settle_timeout {
                warn!(?want, "window did not settle within {:?}", self.options.settle_timeout);
                return false;
            }
            thread::sleep(self.options.settle_poll);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
