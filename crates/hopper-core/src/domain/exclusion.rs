//! Decides whether a captured window may be relocated.
//!
//! A window is left alone when any of these hold:
//!
//! 1. It is minimized.
//! 2. Its title is empty or whitespace (system and utility windows).
//! 3. Its class is one of the shell's own windows (taskbar, desktop).
//! 4. Fullscreen exclusion is enabled and the window is fullscreen.
//!
//! Maximized and fullscreen are different things here.  Maximized is a flag
//! in the window's placement and is always eligible.  Fullscreen is a
//! geometric judgement: a window that is *not* maximized but whose rectangle
//! covers the whole of its monitor, as games and video players do.

use super::monitor::{find_window_monitor, MonitorInfo};
use super::window::WindowSnapshot;

/// Window classes that belong to the Windows shell and must never move.
pub const EXCLUDED_CLASSES: [&str; 4] = [
    "Shell_TrayWnd",  // taskbar
    "DV2ControlHost", // start menu host
    "WorkerW",        // desktop worker
    "Progman",        // program manager / desktop
];

/// Why a window was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    Minimized,
    Untitled,
    ShellWindow,
    Fullscreen,
}

/// The eligibility rules, configured from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionPolicy {
    pub exclude_fullscreen: bool,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            exclude_fullscreen: true,
        }
    }
}

impl ExclusionPolicy {
    pub fn new(exclude_fullscreen: bool) -> Self {
        Self { exclude_fullscreen }
    }

    /// Returns `true` when `window` must not be relocated.
    ///
    /// `monitors` is only consulted for the fullscreen judgement.
    pub fn should_exclude(&self, window: &WindowSnapshot, monitors: &[MonitorInfo]) -> bool {
        self.exclusion_reason(window, monitors).is_some()
    }

    /// Returns the first rule that rejects `window`, or `None` if it is
    /// eligible.
    pub fn exclusion_reason(
        &self,
        window: &WindowSnapshot,
        monitors: &[MonitorInfo],
    ) -> Option<ExclusionReason> {
        if window.is_minimized {
            return Some(ExclusionReason::Minimized);
        }
        if self.exclude_fullscreen && is_fullscreen(window, monitors) {
            return Some(ExclusionReason::Fullscreen);
        }
        if EXCLUDED_CLASSES.contains(&window.class_name.as_str()) {
            return Some(ExclusionReason::ShellWindow);
        }
        if window.title.trim().is_empty() {
            return Some(ExclusionReason::Untitled);
        }
        None
    }
}

/// Returns `true` when a non-maximized window covers the full bounds of the
/// monitor it belongs to.
pub fn is_fullscreen(window: &WindowSnapshot, monitors: &[MonitorInfo]) -> bool {
    if window.is_maximized {
        return false;
    }
    match find_window_monitor(&window.rect, monitors) {
        Some(monitor) => window.rect.covers(&monitor.bounds),
        None => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Rect;
    use crate::domain::monitor::{Dpi, MonitorHandle};
    use crate::domain::window::WindowHandle;

    fn monitors() -> Vec<MonitorInfo> {
        vec![MonitorInfo {
            index: 0,
            handle: MonitorHandle(1),
            bounds: Rect::new(0, 0, 1920, 1080),
            work_area: Rect::new(0, 0, 1920, 1040),
            is_primary: true,
            device_name: "\\\\.\\DISPLAY1".to_string(),
            dpi: Dpi::BASELINE,
        }]
    }

    fn window(rect: Rect) -> WindowSnapshot {
        WindowSnapshot {
            handle: WindowHandle(0x100),
            rect,
            title: "Untitled - Notepad".to_string(),
            class_name: "Notepad".to_string(),
            is_maximized: false,
            is_minimized: false,
            process_name: "notepad.exe".to_string(),
        }
    }

    #[test]
    fn test_ordinary_window_is_eligible() {
        let policy = ExclusionPolicy::default();
        let w = window(Rect::new(100, 100, 900, 700));
        assert!(!policy.should_exclude(&w, &monitors()));
    }

    #[test]
    fn test_minimized_window_is_excluded_regardless_of_other_attributes() {
        let policy = ExclusionPolicy::new(false);
        let mut w = window(Rect::new(100, 100, 900, 700));
        w.is_minimized = true;
        w.is_maximized = true;
        assert_eq!(
            policy.exclusion_reason(&w, &monitors()),
            Some(ExclusionReason::Minimized)
        );
    }

    #[test]
    fn test_whitespace_title_is_excluded() {
        let policy = ExclusionPolicy::default();
        let mut w = window(Rect::new(100, 100, 900, 700));
        w.title = "   \t".to_string();
        assert_eq!(
            policy.exclusion_reason(&w, &monitors()),
            Some(ExclusionReason::Untitled)
        );
    }

    #[test]
    fn test_shell_classes_are_excluded() {
        let policy = ExclusionPolicy::default();
        for class in EXCLUDED_CLASSES {
            let mut w = window(Rect::new(100, 100, 900, 700));
            w.class_name = class.to_string();
            assert_eq!(
                policy.exclusion_reason(&w, &monitors()),
                Some(ExclusionReason::ShellWindow),
                "class {class} must be excluded"
            );
        }
    }

    #[test]
    fn test_window_covering_monitor_is_fullscreen() {
        let policy = ExclusionPolicy::new(true);
        let w = window(Rect::new(0, 0, 1920, 1080));
        assert_eq!(
            policy.exclusion_reason(&w, &monitors()),
            Some(ExclusionReason::Fullscreen)
        );
    }

    #[test]
    fn test_fullscreen_window_is_eligible_when_setting_disabled() {
        let policy = ExclusionPolicy::new(false);
        let w = window(Rect::new(0, 0, 1920, 1080));
        assert!(!policy.should_exclude(&w, &monitors()));
    }

    #[test]
    fn test_maximized_window_is_never_fullscreen() {
        // A maximized frame overhangs the monitor by its border width.
        let mut w = window(Rect::new(-8, -8, 1928, 1048));
        w.is_maximized = true;
        assert!(!is_fullscreen(&w, &monitors()));
        assert!(!ExclusionPolicy::new(true).should_exclude(&w, &monitors()));
    }

    #[test]
    fn test_window_one_unit_short_of_monitor_is_not_fullscreen() {
        let w = window(Rect::new(0, 0, 1920, 1079));
        assert!(!is_fullscreen(&w, &monitors()));
    }

    #[test]
    fn test_off_screen_window_is_not_fullscreen() {
        let w = window(Rect::new(5000, 5000, 9000, 9000));
        assert!(!is_fullscreen(&w, &monitors()));
    }
}
