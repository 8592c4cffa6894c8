//! Hotkey strings, their validation, and press detection.
//!
//! # Pipeline
//!
//! ```text
//! config "Ctrl+Alt+F9" ──parse──► Hotkey ──► HotkeyDetector ◄── VK codes from hook
//!                                                  │
//!                                                  ▼
//!                                            "pressed" (once per press)
//! ```

pub mod combo;
pub mod detector;
pub mod windows_vk;

pub use combo::{validate_hotkey, Hotkey, Key, Modifier};
pub use detector::HotkeyDetector;

use thiserror::Error;

/// Default hotkey when the configuration does not name one.
pub const DEFAULT_HOTKEY: &str = "F12";

/// Errors produced when a hotkey string cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HotkeyError {
    #[error("hotkey is empty")]
    Empty,

    #[error("hotkey {0:?} contains an empty key name")]
    EmptyToken(String),

    #[error("unknown key {0:?}")]
    UnknownKey(String),

    #[error("modifier {0} appears more than once")]
    DuplicateModifier(String),

    #[error("hotkey has two main keys ({0} and {1}); use exactly one")]
    MultipleKeys(String, String),

    #[error("hotkey needs a main key besides the modifiers")]
    MissingKey,
}
