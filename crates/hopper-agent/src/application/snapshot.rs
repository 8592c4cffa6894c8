//! Window Snapshot: captures the focused window for one relocation attempt.
//!
//! Title, class and process name are best effort and default to an empty
//! string.  The rectangle and the placement are not: without them the window
//! cannot be moved, so the capture is abandoned.

use hopper_core::{ShowState, WindowHandle, WindowSnapshot};
use tracing::debug;

use super::desktop::WindowSystem;

/// Captures the current foreground window, or `None` if there is no usable one.
pub fn capture_foreground_window(windows: &dyn WindowSystem) -> Option<WindowSnapshot> {
    let Some(handle) = windows.foreground_window() else {
        debug!("no foreground window");
        return None;
    };
    capture_window(windows, handle)
}

/// Captures a specific window.
pub fn capture_window(windows: &dyn WindowSystem, handle: WindowHandle) -> Option<WindowSnapshot> {
    if handle.is_null() || !windows.is_window(handle) {
        debug!(?handle, "no valid window handle");
        return None;
    }

    let rect = match windows.window_rect(handle) {
        Ok(rect) => rect,
        Err(e) => {
            debug!(?handle, "failed to get window rect: {e}");
            return None;
        }
    };
    if rect.is_degenerate() {
        debug!(?handle, ?rect, "window rect has no area");
        return None;
    }

    let show_cmd = match windows.show_cmd(handle) {
        Ok(cmd) => cmd,
        Err(e) => {
            debug!(?handle, "failed to read window placement: {e}");
            return None;
        }
    };
    let state = ShowState::from_show_cmd(show_cmd);

    let title = windows.window_title(handle).unwrap_or_default();
    let class_name = windows.window_class(handle).unwrap_or_default();
    let process_name = windows.process_name(handle).unwrap_or_default();

    debug!(
        "window state: {}, is_maximized={}, is_minimized={}",
        ShowState::show_cmd_name(show_cmd),
        state == ShowState::Maximized,
        state == ShowState::Minimized,
    );
    debug!("current window: {title} ({class_name}) - {rect:?}");

    Some(WindowSnapshot {
        handle,
        rect,
        title,
        class_name,
        is_maximized: state == ShowState::Maximized,
        is_minimized: state == ShowState::Minimized,
        process_name,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::desktop::{DesktopError, MockWindowSystem};
    use hopper_core::Rect;

    const HWND: WindowHandle = WindowHandle(0x5150);

    fn api_error(call: &'static str) -> DesktopError {
        DesktopError::Api {
            call,
            message: "the handle is invalid".to_string(),
        }
    }

    fn healthy_window() -> MockWindowSystem {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| Some(HWND));
        windows.expect_is_window().returning(|_| true);
        windows
            .expect_window_rect()
            .returning(|_| Ok(Rect::new(100, 100, 900, 700)));
        windows.expect_show_cmd().returning(|_| Ok(1));
        windows
            .expect_window_title()
            .returning(|_| Ok("notes.txt - Notepad".to_string()));
        windows
            .expect_window_class()
            .returning(|_| Ok("Notepad".to_string()));
        windows
            .expect_process_name()
            .returning(|_| Ok("notepad.exe".to_string()));
        windows
    }

    #[test]
    fn test_capture_returns_full_snapshot() {
        // Arrange
        let windows = healthy_window();

        // Act
        let snapshot = capture_foreground_window(&windows).expect("snapshot");

        // Assert
        assert_eq!(snapshot.handle, HWND);
        assert_eq!(snapshot.rect, Rect::new(100, 100, 900, 700));
        assert_eq!(snapshot.title, "notes.txt - Notepad");
        assert_eq!(snapshot.class_name, "Notepad");
        assert_eq!(snapshot.process_name, "notepad.exe");
        assert!(!snapshot.is_maximized);
        assert!(!snapshot.is_minimized);
    }

    #[test]
    fn test_no_foreground_window_returns_none() {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| None);
        assert!(capture_foreground_window(&windows).is_none());
    }

    #[test]
    fn test_dead_handle_returns_none() {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| Some(HWND));
        windows.expect_is_window().returning(|_| false);
        assert!(capture_foreground_window(&windows).is_none());
    }

    #[test]
    fn test_rect_failure_aborts_capture() {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| Some(HWND));
        windows.expect_is_window().returning(|_| true);
        windows
            .expect_window_rect()
            .returning(|_| Err(api_error("GetWindowRect")));
        assert!(capture_foreground_window(&windows).is_none());
    }

    #[test]
    fn test_degenerate_rect_aborts_capture() {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| Some(HWND));
        windows.expect_is_window().returning(|_| true);
        windows
            .expect_window_rect()
            .returning(|_| Ok(Rect::new(500, 500, 500, 800)));
        assert!(capture_foreground_window(&windows).is_none());
    }

    #[test]
    fn test_title_class_and_process_failures_default_to_empty() {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| Some(HWND));
        windows.expect_is_window().returning(|_| true);
        windows
            .expect_window_rect()
            .returning(|_| Ok(Rect::new(0, 0, 640, 480)));
        windows.expect_show_cmd().returning(|_| Ok(1));
        windows
            .expect_window_title()
            .returning(|_| Err(api_error("GetWindowTextW")));
        windows
            .expect_window_class()
            .returning(|_| Err(api_error("GetClassNameW")));
        windows
            .expect_process_name()
            .returning(|_| Err(api_error("OpenProcess")));

        let snapshot = capture_foreground_window(&windows).expect("snapshot");

        assert_eq!(snapshot.title, "");
        assert_eq!(snapshot.class_name, "");
        assert_eq!(snapshot.process_name, "");
    }

    #[test]
    fn test_maximized_state_comes_from_placement() {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| Some(HWND));
        windows.expect_is_window().returning(|_| true);
        // A small rectangle, yet the placement says maximized.
        windows
            .expect_window_rect()
            .returning(|_| Ok(Rect::new(10, 10, 400, 300)));
        windows.expect_show_cmd().returning(|_| Ok(3));
        windows.expect_window_title().returning(|_| Ok("x".to_string()));
        windows.expect_window_class().returning(|_| Ok("y".to_string()));
        windows.expect_process_name().returning(|_| Ok(String::new()));

        let snapshot = capture_foreground_window(&windows).expect("snapshot");

        assert!(snapshot.is_maximized);
        assert!(!snapshot.is_minimized);
    }

    #[test]
    fn test_minimized_state_comes_from_placement() {
        let mut windows = MockWindowSystem::new();
        windows.expect_foreground_window().returning(|| Some(HWND));
        windows.expect_is_window().returning(|_| true);
        windows
            .expect_window_rect()
            .returning(|_| Ok(Rect::new(-32000, -32000, -31840, -31972)));
        windows.expect_show_cmd().returning(|_| Ok(2));
        windows.expect_window_title().returning(|_| Ok("x".to_string()));
        windows.expect_window_class().returning(|_| Ok("y".to_string()));
        windows.expect_process_name().returning(|_| Ok(String::new()));

        let snapshot = capture_foreground_window(&windows).expect("snapshot");

        assert!(snapshot.is_minimized);
    }
}
