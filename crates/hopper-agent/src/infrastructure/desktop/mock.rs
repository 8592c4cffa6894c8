//! Scriptable in-memory desktop for tests.
//!
//! Simulates monitors, top-level windows, focus and the maximize/restore
//! behaviour of the real window manager closely enough to drive the whole
//! relocation pipeline:
//!
//! - maximizing fills the work area of the monitor holding the window's
//!   normal rectangle, overhanging it by the 8 px frame as Windows does;
//! - restoring puts the normal rectangle back;
//! - `SetWindowPos` on a normal window updates its normal rectangle.
//!
//! Failure knobs let tests make the OS misbehave: enumeration errors,
//! failing or misplaced moves, a one-off size override, ignored restores.

use std::collections::HashMap;
use std::sync::Arc;

use hopper_core::{
    find_window_monitor, Dpi, DpiResolver, DpiStrategy, MonitorHandle, MonitorInfo, MonitorProbe,
    Rect, ResolutionHeuristic, ShowState, TargetRect, WindowHandle,
};
use parking_lot::Mutex;

use crate::application::desktop::{DesktopError, MonitorSource, RawMonitor, ShowCommand, WindowSystem};

/// Frame overhang of a maximized window on each side.
pub const MAXIMIZED_OVERHANG: i32 = 8;

/// A simulated top-level window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWindow {
    pub rect: Rect,
    /// Where the window returns to when restored.
    pub normal_rect: Rect,
    pub title: String,
    pub class_name: String,
    pub process_name: String,
    pub state: ShowState,
}

impl FakeWindow {
    /// A normal-state window at `rect`.
    pub fn new(rect: Rect, title: &str) -> Self {
        Self {
            rect,
            normal_rect: rect,
            title: title.to_string(),
            class_name: "FakeWindowClass".to_string(),
            process_name: "fake.exe".to_string(),
            state: ShowState::Normal,
        }
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }
}

/// A mutating call observed by the fake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopCall {
    SetWindowPos(WindowHandle, TargetRect),
    ShowWindow(WindowHandle, ShowCommand),
}

struct FakeMonitor {
    raw: RawMonitor,
    dpi: Option<Dpi>,
}

#[derive(Default)]
struct FakeState {
    monitors: Vec<FakeMonitor>,
    windows: HashMap<WindowHandle, FakeWindow>,
    foreground: Option<WindowHandle>,
    next_handle: isize,
    calls: Vec<DesktopCall>,
    enumerations: usize,
    fail_enumeration: bool,
    fail_moves: bool,
    fail_show_window: bool,
    ignore_restore: bool,
    move_offset: (i32, i32),
    next_size_override: Option<(i32, i32)>,
    /// Successful `GetWindowRect` reads left before every read fails.
    window_rect_budget: Option<usize>,
}

impl FakeState {
    fn window_mut(&mut self, window: WindowHandle) -> Result<&mut FakeWindow, DesktopError> {
        self.windows
            .get_mut(&window)
            .ok_or(DesktopError::WindowGone(window))
    }

    fn window(&self, window: WindowHandle) -> Result<&FakeWindow, DesktopError> {
        self.windows.get(&window).ok_or(DesktopError::WindowGone(window))
    }

    /// Work area the window would maximize into.
    fn maximize_area(&self, normal: &Rect) -> Option<Rect> {
        let infos: Vec<MonitorInfo> = self
            .monitors
            .iter()
            .enumerate()
            .map(|(index, m)| MonitorInfo {
                index,
                handle: m.raw.handle,
                bounds: m.raw.bounds,
                work_area: m.raw.work_area,
                is_primary: m.raw.is_primary,
                device_name: m.raw.device_name.clone(),
                dpi: Dpi::BASELINE,
            })
            .collect();
        find_window_monitor(normal, &infos)
            .or_else(|| infos.first())
            .map(|m| m.work_area)
    }
}

/// In-memory [`MonitorSource`] + [`WindowSystem`].
#[derive(Clone, Default)]
pub struct FakeDesktop {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Monitors ─────────────────────────────────────────────────────────────

    /// Adds a monitor.  The first one added is primary.  `dpi` of `None`
    /// makes the fake DPI strategy decline, leaving the heuristic to decide.
    pub fn add_monitor(&self, bounds: Rect, work_area: Rect, dpi: Option<u32>) -> MonitorHandle {
        let mut state = self.state.lock();
        state.next_handle += 1;
        let handle = MonitorHandle(0x1_0000 + state.next_handle);
        let number = state.monitors.len() + 1;
        let is_primary = state.monitors.is_empty();
        state.monitors.push(FakeMonitor {
            raw: RawMonitor {
                handle,
                bounds,
                work_area,
                is_primary,
                device_name: format!("\\\\.\\DISPLAY{number}"),
            },
            dpi: dpi.map(Dpi::uniform),
        });
        handle
    }

    pub fn remove_monitor(&self, handle: MonitorHandle) {
        self.state.lock().monitors.retain(|m| m.raw.handle != handle);
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.state.lock().fail_enumeration = fail;
    }

    pub fn enumeration_count(&self) -> usize {
        self.state.lock().enumerations
    }

    /// A resolver whose first strategy reports the DPI given to
    /// [`add_monitor`](Self::add_monitor), followed by the heuristic.
    pub fn dpi_resolver(&self) -> DpiResolver {
        DpiResolver::new(vec![
            Box::new(FakeDpiStrategy {
                state: Arc::clone(&self.state),
            }),
            Box::new(ResolutionHeuristic),
        ])
    }

    // ── Windows ──────────────────────────────────────────────────────────────

    /// Adds a window and gives it focus.
    pub fn add_window(&self, window: FakeWindow) -> WindowHandle {
        let mut state = self.state.lock();
        state.next_handle += 1;
        let handle = WindowHandle(0x1000 + state.next_handle);
        state.windows.insert(handle, window);
        state.foreground = Some(handle);
        handle
    }

    /// Adds a window maximized on the monitor holding `normal_rect`.
    pub fn add_maximized_window(&self, normal_rect: Rect, title: &str) -> WindowHandle {
        let handle = self.add_window(FakeWindow::new(normal_rect, title));
        let mut state = self.state.lock();
        if let Some(area) = state.maximize_area(&normal_rect) {
            if let Ok(window) = state.window_mut(handle) {
                window.rect = inflate(area, MAXIMIZED_OVERHANG);
                window.state = ShowState::Maximized;
            }
        }
        handle
    }

    pub fn window(&self, handle: WindowHandle) -> Option<FakeWindow> {
        self.state.lock().windows.get(&handle).cloned()
    }

    pub fn set_foreground(&self, handle: Option<WindowHandle>) {
        self.state.lock().foreground = handle;
    }

    pub fn close_window(&self, handle: WindowHandle) {
        let mut state = self.state.lock();
        state.windows.remove(&handle);
        if state.foreground == Some(handle) {
            state.foreground = None;
        }
    }

    // ── Failure knobs ────────────────────────────────────────────────────────

    /// Makes every `SetWindowPos` fail.
    pub fn fail_moves(&self, fail: bool) {
        self.state.lock().fail_moves = fail;
    }

    /// Makes every `ShowWindow` fail.
    pub fn fail_show_window(&self, fail: bool) {
        self.state.lock().fail_show_window = fail;
    }

    /// Makes restore a silent no-op: the window stays maximized.
    pub fn ignore_restore(&self, ignore: bool) {
        self.state.lock().ignore_restore = ignore;
    }

    /// Offsets the position of every subsequent move.
    pub fn offset_moves(&self, dx: i32, dy: i32) {
        self.state.lock().move_offset = (dx, dy);
    }

    /// Forces the size of the next move only.
    pub fn override_next_size(&self, width: i32, height: i32) {
        self.state.lock().next_size_override = Some((width, height));
    }

    /// Lets the next `reads` window rectangle queries succeed, then fails
    /// every later one.
    pub fn fail_window_rect_after(&self, reads: usize) {
        self.state.lock().window_rect_budget = Some(reads);
    }

    // ── Observations ─────────────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<DesktopCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

fn inflate(rect: Rect, by: i32) -> Rect {
    Rect::new(rect.left - by, rect.top - by, rect.right + by, rect.bottom + by)
}

fn show_cmd_of(state: ShowState) -> u32 {
    match state {
        ShowState::Hidden => 0,
        ShowState::Normal => 1,
        ShowState::Minimized => 2,
        ShowState::Maximized => 3,
    }
}

impl MonitorSource for FakeDesktop {
    fn enumerate_monitors(&self) -> Result<Vec<RawMonitor>, DesktopError> {
        let mut state = self.state.lock();
        state.enumerations += 1;
        if state.fail_enumeration {
            return Err(DesktopError::Api {
                call: "EnumDisplayMonitors",
                message: "simulated failure".to_string(),
            });
        }
        Ok(state.monitors.iter().map(|m| m.raw.clone()).collect())
    }
}

impl WindowSystem for FakeDesktop {
    fn foreground_window(&self) -> Option<WindowHandle> {
        self.state.lock().foreground
    }

    fn is_window(&self, window: WindowHandle) -> bool {
        self.state.lock().windows.contains_key(&window)
    }

    fn window_rect(&self, window: WindowHandle) -> Result<Rect, DesktopError> {
        let mut state = self.state.lock();
        if let Some(remaining) = state.window_rect_budget.as_mut() {
            if *remaining == 0 {
                return Err(DesktopError::Api {
                    call: "GetWindowRect",
                    message: "simulated failure".to_string(),
                });
            }
            *remaining -= 1;
        }
        Ok(state.window(window)?.rect)
    }

    fn window_title(&self, window: WindowHandle) -> Result<String, DesktopError> {
        Ok(self.state.lock().window(window)?.title.clone())
    }

    fn window_class(&self, window: WindowHandle) -> Result<String, DesktopError> {
        Ok(self.state.lock().window(window)?.class_name.clone())
    }

    fn show_cmd(&self, window: WindowHandle) -> Result<u32, DesktopError> {
        Ok(show_cmd_of(self.state.lock().window(window)?.state))
    }

    fn process_name(&self, window: WindowHandle) -> Result<String, DesktopError> {
        Ok(self.state.lock().window(window)?.process_name.clone())
    }

    fn set_window_pos(&self, window: WindowHandle, target: TargetRect) -> Result<(), DesktopError> {
        let mut state = self.state.lock();
        state.calls.push(DesktopCall::SetWindowPos(window, target));
        if state.fail_moves {
            return Err(DesktopError::Api {
                call: "SetWindowPos",
                message: "simulated failure".to_string(),
            });
        }
        let (dx, dy) = state.move_offset;
        let (width, height) = state
            .next_size_override
            .take()
            .unwrap_or((target.width, target.height));
        let fake = state.window_mut(window)?;
        fake.rect = Rect::from_origin_size(target.x + dx, target.y + dy, width, height);
        if fake.state == ShowState::Normal {
            fake.normal_rect = fake.rect;
        }
        Ok(())
    }

    fn show_window(&self, window: WindowHandle, command: ShowCommand) -> Result<(), DesktopError> {
        let mut state = self.state.lock();
        state.calls.push(DesktopCall::ShowWindow(window, command));
        if state.fail_show_window {
            return Err(DesktopError::Api {
                call: "ShowWindow",
                message: "simulated failure".to_string(),
            });
        }
        let ignore_restore = state.ignore_restore;
        let normal = state.window(window)?.normal_rect;
        let area = state.maximize_area(&normal);
        let fake = state.window_mut(window)?;
        match command {
            ShowCommand::Restore if ignore_restore => {}
            ShowCommand::Restore => {
                fake.rect = fake.normal_rect;
                fake.state = ShowState::Normal;
            }
            ShowCommand::Maximize => {
                if let Some(area) = area {
                    fake.rect = inflate(area, MAXIMIZED_OVERHANG);
                }
                fake.state = ShowState::Maximized;
            }
        }
        Ok(())
    }
}

/// Reports the DPI configured on the fake monitors.
struct FakeDpiStrategy {
    state: Arc<Mutex<FakeState>>,
}

impl DpiStrategy for FakeDpiStrategy {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn resolve(&self, probe: &MonitorProbe) -> Option<Dpi> {
        self.state
            .lock()
            .monitors
            .iter()
            .find(|m| m.raw.handle == probe.handle)
            .and_then(|m| m.dpi)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
