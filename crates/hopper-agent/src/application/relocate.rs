//! The relocation pipeline: capture → exclude → monitors → map → place.
//!
//! # Maximized windows
//!
//! A maximized window's rectangle is the monitor, not the window, so it is
//! first restored, relocated as a normal window and then maximized again.
//! The driver walks an explicit phase sequence instead of re-entering the
//! pipeline:
//!
//! ```text
//! Maximized ──restore──► Restored ──map + place──► Relocated ──maximize──► Remaximized
//!     │                     │                         │
//!     └─────────────────────┴──────── failure ────────┴──► roll back, maximize on origin
//! ```
//!
//! The destination is chosen from the monitor the window was maximized on,
//! before the restore, so a restored rectangle that lies elsewhere (the user
//! dragged the window while maximized) still moves to the monitor after the
//! one the user saw it on.

use std::sync::Arc;

use hopper_core::{
    find_window_monitor, next_monitor, ExclusionPolicy, GeometryMapper, MonitorInfo, Rect,
    WindowHandle, WindowSnapshot,
};
use tracing::{debug, error, info, warn};

use super::desktop::WindowSystem;
use super::monitor_registry::MonitorRegistry;
use super::placement::PlacementExecutor;
use super::snapshot::{capture_foreground_window, capture_window};

/// Progress of a maximized-window move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaximizedPhase {
    Maximized,
    Restored,
    Relocated,
    Remaximized,
}

pub struct RelocateWindowUseCase {
    registry: Arc<MonitorRegistry>,
    windows: Arc<dyn WindowSystem>,
    executor: PlacementExecutor,
    mapper: GeometryMapper,
    policy: ExclusionPolicy,
}

impl RelocateWindowUseCase {
    pub fn new(
        registry: Arc<MonitorRegistry>,
        windows: Arc<dyn WindowSystem>,
        executor: PlacementExecutor,
        policy: ExclusionPolicy,
    ) -> Self {
        Self {
            registry,
            windows,
            executor,
            mapper: GeometryMapper::default(),
            policy,
        }
    }

    pub fn policy(&self) -> ExclusionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ExclusionPolicy) {
        self.policy = policy;
    }

    /// Moves the foreground window to the next monitor.
    ///
    /// Returns `false`, with a log line, whenever the window does not move.
    pub fn move_active_window_to_next_monitor(&self) -> bool {
        info!("hotkey pressed: starting window move");

        debug!("step 1: capturing the foreground window");
        let Some(window) = capture_foreground_window(self.windows.as_ref()) else {
            error!("no active window found to move");
            return false;
        };
        debug!("found window: {} ({})", window.title, window.class_name);

        debug!("step 2: checking exclusion rules");
        let monitors = self.registry.list_monitors();
        if let Some(reason) = self.policy.exclusion_reason(&window, &monitors) {
            error!("window excluded ({reason:?}): {}", window.title);
            return false;
        }

        if monitors.len() < 2 {
            warn!("cannot move window: fewer than 2 monitors available");
            return false;
        }

        let Some(current) = find_window_monitor(&window.rect, &monitors) else {
            error!("could not determine current monitor");
            return false;
        };
        let Some(target_monitor) = next_monitor(current, &monitors) else {
            error!("could not determine next monitor");
            return false;
        };

        let moved = if window.is_maximized {
            self.move_maximized(&window, current, target_monitor)
        } else {
            let target = self.mapper.map_rect(&window.rect, current, target_monitor);
            self.executor.place(&window, target)
        };

        if moved {
            info!(
                "moved window '{}' from monitor {} to monitor {}",
                window.title, current.index, target_monitor.index
            );
        }
        moved
    }

    fn move_maximized(&self, window: &WindowSnapshot, origin: &MonitorInfo, destination: &MonitorInfo) -> bool {
        info!("detected maximized window: {}", window.title);
        let Some(handle) = self.executor.validate(window) else {
            return false;
        };
        if handle != window.handle {
            // The origin monitor and maximized flag belong to the captured
            // window, not the one that took focus.
            warn!(
                "focus moved to {handle:?} before the move started; leaving {:?} in place",
                window.handle
            );
            return false;
        }

        let mut phase = MaximizedPhase::Maximized;
        let mut restored_rect: Option<Rect> = None;
        loop {
            debug!(?phase, "maximized move");
            phase = match phase {
                MaximizedPhase::Maximized => {
                    if !self.executor.restore(handle) {
                        return self.roll_back(handle, restored_rect);
                    }
                    MaximizedPhase::Restored
                }
                MaximizedPhase::Restored => {
                    let Some(restored) = capture_window(self.windows.as_ref(), handle) else {
                        error!("could not capture window after restore");
                        return self.roll_back(handle, None);
                    };
                    if restored.is_maximized {
                        warn!("window still reports maximized after restore");
                        return self.roll_back(handle, None);
                    }
                    restored_rect = Some(restored.rect);
                    let target = self.mapper.map_rect(&restored.rect, origin, destination);
                    if !self.executor.place_window(handle, target) {
                        return self.roll_back(handle, restored_rect);
                    }
                    MaximizedPhase::Relocated
                }
                MaximizedPhase::Relocated => {
                    if !self.executor.maximize(handle) {
                        return self.roll_back(handle, restored_rect);
                    }
                    MaximizedPhase::Remaximized
                }
                MaximizedPhase::Remaximized => {
                    info!("maximized window moved successfully");
                    return true;
                }
            };
        }
    }

    /// Puts the window back on its original monitor, maximized.  Always
    /// returns `false` so callers can `return self.roll_back(..)`.
    fn roll_back(&self, handle: WindowHandle, restored_rect: Option<Rect>) -> bool {
        warn!("maximized move failed; restoring maximize on the original monitor");
        if let Some(rect) = restored_rect {
            if let Err(e) = self.windows.set_window_pos(handle, rect.to_target()) {
                warn!("could not put window back at {rect:?}: {e}");
            }
        }
        if !self.executor.maximize(handle) {
            error!("could not re-maximize window {handle:?}");
        }
        false
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
