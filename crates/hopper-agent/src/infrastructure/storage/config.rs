//! TOML-based configuration persistence for the agent.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Hopper\config.toml`
//! - Linux:    `~/.config/hopper/config.toml`
//! - macOS:    `~/Library/Application Support/Hopper/config.toml`
//!
//! The `HOPPER_CONFIG` environment variable, when set, names the file
//! directly.
//!
//! Example:
//!
//! ```toml
//! [window_management]
//! enabled = true
//! hotkey = "Ctrl+Alt+F9"
//! exclude_fullscreen = true
//! debug_mode = false
//!
//! [monitors]
//! cache_ttl_ms = 5000
//!
//! [placement]
//! position_tolerance = 10
//! size_tolerance = 50
//! settle_timeout_ms = 300
//! settle_poll_ms = 10
//! ```
//!
//! # Serde default values
//!
//! Every field is annotated with `#[serde(default = "some_fn")]`, so a file
//! that omits a section or a key still loads, with the documented default in
//! place of the missing value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hopper_core::hotkey::DEFAULT_HOTKEY;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::application::placement::PlacementOptions;
use crate::application::settings::{SettingsStore, WindowManagementSettings};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "HOPPER_CONFIG";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub window_management: WindowManagementConfig,
    #[serde(default)]
    pub monitors: MonitorsConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

/// The `[window_management]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowManagementConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Human-readable combination, e.g. `"Ctrl+Alt+F9"`.
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    #[serde(default = "default_true")]
    pub exclude_fullscreen: bool,
    #[serde(default)]
    pub debug_mode: bool,
}

/// The `[monitors]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorsConfig {
    /// How long an enumeration stays fresh, in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

/// The `[placement]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacementConfig {
    /// Allowed drift of the top-left corner after a move.
    #[serde(default = "default_position_tolerance")]
    pub position_tolerance: i32,
    /// Allowed drift of width/height before a corrective resize.
    #[serde(default = "default_size_tolerance")]
    pub size_tolerance: i32,
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
    #[serde(default = "default_settle_poll_ms")]
    pub settle_poll_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}
fn default_cache_ttl_ms() -> u64 {
    5000
}
fn default_position_tolerance() -> i32 {
    10
}
fn default_size_tolerance() -> i32 {
    50
}
fn default_settle_timeout_ms() -> u64 {
    300
}
fn default_settle_poll_ms() -> u64 {
    10
}

impl Default for WindowManagementConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            hotkey: default_hotkey(),
            exclude_fullscreen: default_true(),
            debug_mode: false,
        }
    }
}

impl Default for MonitorsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            position_tolerance: default_position_tolerance(),
            size_tolerance: default_size_tolerance(),
            settle_timeout_ms: default_settle_timeout_ms(),
            settle_poll_ms: default_settle_poll_ms(),
        }
    }
}

// ── Conversions into application types ───────────────────────────────────────

impl AppConfig {
    pub fn window_management_settings(&self) -> WindowManagementSettings {
        let wm = &self.window_management;
        WindowManagementSettings {
            enabled: wm.enabled,
            hotkey: wm.hotkey.clone(),
            exclude_fullscreen: wm.exclude_fullscreen,
            debug_mode: wm.debug_mode,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.monitors.cache_ttl_ms)
    }

    /// Placement tuning; a zero poll interval is raised to 1 ms.
    pub fn placement_options(&self) -> PlacementOptions {
        let p = &self.placement;
        PlacementOptions {
            position_tolerance: p.position_tolerance.max(0),
            size_tolerance: p.size_tolerance.max(0),
            settle_timeout: Duration::from_millis(p.settle_timeout_ms),
            settle_poll: Duration::from_millis(p.settle_poll_ms.max(1)),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file, honouring `HOPPER_CONFIG`.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the override is unset and
/// the base directory cannot be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Loads `AppConfig` from the resolved config file path.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Persists `config` to the resolved config file path.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Resolves the platform config base directory including the `Hopper`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Hopper"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("hopper"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Hopper"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Settings store ────────────────────────────────────────────────────────────

/// [`SettingsStore`] backed by the TOML file.
///
/// The file is re-read on every call so that `reload_config()` observes
/// edits made while the agent runs.  A missing file yields defaults; a
/// malformed one is logged and also yields defaults.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole config, or defaults when it cannot be loaded.
    pub fn load(&self) -> AppConfig {
        match load_config_from(&self.path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(path = %self.path.display(), "config unusable, using defaults: {e}");
                AppConfig::default()
            }
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn window_management(&self) -> WindowManagementSettings {
        self.load().window_management_settings()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A fresh directory under the system temp dir, unique per call.
    fn scratch_dir(tag: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("hopper_test_{}_{}_{}", tag, std::process::id(), n));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_matches_documented_values() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert!(cfg.window_management.enabled);
        assert_eq!(cfg.window_management.hotkey, "F12");
        assert!(cfg.window_management.exclude_fullscreen);
        assert!(!cfg.window_management.debug_mode);
        assert_eq!(cfg.monitors.cache_ttl_ms, 5000);
        assert_eq!(cfg.placement, PlacementConfig::default());
    }

    #[test]
    fn test_default_conversions_match_application_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.window_management_settings(), WindowManagementSettings::default());
        assert_eq!(cfg.placement_options(), PlacementOptions::default());
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(5));
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[window_management]
hotkey = "Ctrl+Alt+F9"
debug_mode = true

[placement]
settle_timeout_ms = 500
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.window_management.hotkey, "Ctrl+Alt+F9");
        assert!(cfg.window_management.debug_mode);
        // Unspecified fields keep their defaults
        assert!(cfg.window_management.enabled);
        assert_eq!(cfg.placement.settle_timeout_ms, 500);
        assert_eq!(cfg.placement.settle_poll_ms, 10);
        assert_eq!(cfg.monitors.cache_ttl_ms, 5000);
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_poll_interval_is_raised() {
        let mut cfg = AppConfig::default();
        cfg.placement.settle_poll_ms = 0;
        assert_eq!(cfg.placement_options().settle_poll, Duration::from_millis(1));
    }

    // ── File access ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_file_returns_default() {
        let dir = scratch_dir("missing");
        let cfg = load_config_from(&dir.join("absent.toml")).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_from_malformed_file_returns_parse_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join("config.toml");
        std::fs::write(&path, "window_management = [").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.window_management.hotkey = "Win+Shift+Right".to_string();
        cfg.monitors.cache_ttl_ms = 1000;

        // Act
        save_config_to(&path, &cfg).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_settings_store_observes_edits() {
        // Arrange
        let dir = scratch_dir("store");
        let path = dir.join("config.toml");
        let store = FileSettingsStore::new(&path);
        assert_eq!(store.window_management(), WindowManagementSettings::default());

        // Act
        std::fs::write(&path, "[window_management]\nenabled = false\nhotkey = \"Alt+F1\"\n").unwrap();
        let settings = store.window_management();

        // Assert
        assert!(!settings.enabled);
        assert_eq!(settings.hotkey, "Alt+F1");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_settings_store_falls_back_on_malformed_file() {
        let dir = scratch_dir("fallback");
        let path = dir.join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let settings = FileSettingsStore::new(&path).window_management();

        assert_eq!(settings, WindowManagementSettings::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_platform_config_dir_ends_with_app_folder() {
        if let Some(dir) = platform_config_dir() {
            let name = dir.file_name().map(|n| n.to_string_lossy().to_lowercase());
            assert_eq!(name.as_deref(), Some("hopper"));
        }
        // None is acceptable in a stripped environment.
    }
}
