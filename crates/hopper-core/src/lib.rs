//! # hopper-core
//!
//! Platform-independent rules for Hopper, a tool that moves the focused
//! window to the next monitor while keeping its relative size and position
//! across monitors with different DPI scaling.
//!
//! This crate has no dependency on OS APIs.  The agent crate enumerates
//! monitors and windows through Win32 and hands plain values to the code in
//! here, which decides what should happen.
//!
//! - **`domain`** – monitors, windows, the exclusion policy, the DPI
//!   strategy cascade and the geometry mapper.
//!
//! - **`hotkey`** – parsing and validating hotkey strings, the Windows VK
//!   table, and the detector that turns raw key events into presses.

pub mod domain;
pub mod hotkey;

pub use domain::dpi::{DpiResolver, DpiStrategy, MonitorProbe, ResolutionHeuristic};
pub use domain::exclusion::{ExclusionPolicy, ExclusionReason};
pub use domain::geometry::{Rect, TargetRect};
pub use domain::mapper::{map_rect, GeometryMapper};
pub use domain::monitor::{find_window_monitor, next_monitor, Dpi, MonitorHandle, MonitorInfo};
pub use domain::window::{ShowState, WindowHandle, WindowSnapshot};
pub use hotkey::{validate_hotkey, Hotkey, HotkeyDetector, HotkeyError};
