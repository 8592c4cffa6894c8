//! Window model: the state of the focused window captured for one relocation.

use super::geometry::Rect;

/// Opaque OS identifier of a top-level window (an `HWND` on Windows).
///
/// The handle may become invalid at any moment: the window can be closed
/// between capture and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// The window's show state as recorded in its placement, not inferred from
/// its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowState {
    Normal,
    Maximized,
    Minimized,
    Hidden,
}

impl ShowState {
    /// Maps a Win32 `SHOW_WINDOW_CMD` value (as found in
    /// `WINDOWPLACEMENT::showCmd`) to a show state.
    pub fn from_show_cmd(cmd: u32) -> Self {
        match cmd {
            0 => ShowState::Hidden,
            2 | 6 | 7 => ShowState::Minimized,
            3 => ShowState::Maximized,
            _ => ShowState::Normal,
        }
    }

    /// Win32 name of a raw show command, for diagnostics.
    pub fn show_cmd_name(cmd: u32) -> &'static str {
        match cmd {
            0 => "SW_HIDE",
            1 => "SW_SHOWNORMAL",
            2 => "SW_SHOWMINIMIZED",
            3 => "SW_SHOWMAXIMIZED",
            4 => "SW_SHOWNOACTIVATE",
            5 => "SW_SHOW",
            6 => "SW_MINIMIZE",
            7 => "SW_SHOWMINNOACTIVE",
            8 => "SW_SHOWNA",
            9 => "SW_RESTORE",
            10 => "SW_SHOWDEFAULT",
            11 => "SW_FORCEMINIMIZE",
            _ => "UNKNOWN",
        }
    }
}

/// Identity, geometry and state of the foreground window at capture time.
///
/// Created fresh for every hotkey press and dropped when the operation ends.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub handle: WindowHandle,
    /// Outer frame rectangle in logical units.
    pub rect: Rect,
    pub title: String,
    pub class_name: String,
    pub is_maximized: bool,
    pub is_minimized: bool,
    /// Executable file name of the owning process, empty when unknown.
    pub process_name: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
