//! Abstractions over the host windowing system.
//!
//! The use cases in this layer only ever talk to these traits.  The Win32
//! adapter lives in `infrastructure::desktop::windows`; tests use the
//! scriptable `FakeDesktop` or the `mockall` mocks generated below.

use hopper_core::{MonitorHandle, Rect, TargetRect, WindowHandle};
use thiserror::Error;

/// A monitor as reported by the OS, before DPI resolution and indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMonitor {
    pub handle: MonitorHandle,
    pub bounds: Rect,
    pub work_area: Rect,
    pub is_primary: bool,
    pub device_name: String,
}

/// State change requested through `ShowWindow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    Restore,
    Maximize,
}

/// Error type for desktop adapter calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DesktopError {
    /// A Win32 call reported failure.
    #[error("{call} failed: {message}")]
    Api { call: &'static str, message: String },

    /// The window was destroyed between capture and use.
    #[error("window {0:?} no longer exists")]
    WindowGone(WindowHandle),

    /// The platform has no desktop adapter.
    #[error("platform not supported: {0}")]
    Unsupported(String),
}

/// Enumerates the monitors attached to the desktop.
#[cfg_attr(test, mockall::automock)]
pub trait MonitorSource: Send + Sync {
    /// Returns every active monitor in OS enumeration order.
    fn enumerate_monitors(&self) -> Result<Vec<RawMonitor>, DesktopError>;
}

/// Window queries and the two mutating calls the placement executor needs.
#[cfg_attr(test, mockall::automock)]
pub trait WindowSystem: Send + Sync {
    /// The window receiving keyboard input, `None` when there is none.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Whether `window` still identifies a live window.
    fn is_window(&self, window: WindowHandle) -> bool;

    /// Outer frame rectangle in logical units.
    fn window_rect(&self, window: WindowHandle) -> Result<Rect, DesktopError>;

    fn window_title(&self, window: WindowHandle) -> Result<String, DesktopError>;

    fn window_class(&self, window: WindowHandle) -> Result<String, DesktopError>;

    /// Raw `showCmd` from the window placement.
    fn show_cmd(&self, window: WindowHandle) -> Result<u32, DesktopError>;

    /// Executable file name of the owning process.
    fn process_name(&self, window: WindowHandle) -> Result<String, DesktopError>;

    /// Moves and resizes without changing z-order or activation.
    fn set_window_pos(&self, window: WindowHandle, target: TargetRect) -> Result<(), DesktopError>;

    fn show_window(&self, window: WindowHandle, command: ShowCommand) -> Result<(), DesktopError>;
}
