//! Settings consumed by the window manager.
//!
//! The application layer never reads files.  It asks a [`SettingsStore`] for
//! the current [`WindowManagementSettings`] every time it needs them, so a
//! store backed by a file observes edits on the next `reload_config()`.

use hopper_core::hotkey::DEFAULT_HOTKEY;

/// The `[window_management]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowManagementSettings {
    /// Whether the hotkey listener may be started at all.
    pub enabled: bool,
    /// Hotkey string, e.g. `"Ctrl+Alt+F9"`.
    pub hotkey: String,
    /// Whether fullscreen windows are left alone.
    pub exclude_fullscreen: bool,
    /// Verbose per-step logging.
    pub debug_mode: bool,
}

impl Default for WindowManagementSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            hotkey: DEFAULT_HOTKEY.to_string(),
            exclude_fullscreen: true,
            debug_mode: false,
        }
    }
}

/// Source of window management settings.
pub trait SettingsStore: Send + Sync {
    /// Current settings.  Implementations fall back to defaults rather than
    /// fail.
    fn window_management(&self) -> WindowManagementSettings;
}

/// A store holding settings in memory, for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct StaticSettingsStore {
    settings: parking_lot::Mutex<WindowManagementSettings>,
}

impl StaticSettingsStore {
    pub fn new(settings: WindowManagementSettings) -> Self {
        Self {
            settings: parking_lot::Mutex::new(settings),
        }
    }

    /// Replaces the stored settings; visible to the next read.
    pub fn set(&self, settings: WindowManagementSettings) {
        *self.settings.lock() = settings;
    }
}

impl SettingsStore for StaticSettingsStore {
    fn window_management(&self) -> WindowManagementSettings {
        self.settings.lock().clone()
    }
}

/// Adjusts log verbosity at runtime when `debug_mode` changes.
pub trait LogLevelControl: Send + Sync {
    fn set_debug(&self, enabled: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let settings = WindowManagementSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.hotkey, "F12");
        assert!(settings.exclude_fullscreen);
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_static_store_returns_latest_settings() {
        let store = StaticSettingsStore::default();
        store.set(WindowManagementSettings {
            hotkey: "Ctrl+Alt+F9".to_string(),
            ..WindowManagementSettings::default()
        });
        assert_eq!(store.window_management().hotkey, "Ctrl+Alt+F9");
    }
}
