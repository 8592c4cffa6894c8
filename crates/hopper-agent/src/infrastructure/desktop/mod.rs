//! Desktop adapters implementing [`MonitorSource`] and [`WindowSystem`].
//!
//! - [`windows::WindowsDesktop`] talks to Win32 (Windows only).
//! - [`mock::FakeDesktop`] simulates monitors and windows in memory.
//!
//! [`MonitorSource`]: crate::application::desktop::MonitorSource
//! [`WindowSystem`]: crate::application::desktop::WindowSystem

use hopper_core::DpiResolver;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// The DPI cascade for the current platform.
///
/// On Windows: effective-DPI API, then a device context, then the resolution
/// heuristic.  Elsewhere only the heuristic is available.
pub fn platform_dpi_resolver() -> DpiResolver {
    #[cfg(target_os = "windows")]
    {
        windows::dpi_resolver()
    }

    #[cfg(not(target_os = "windows"))]
    {
        DpiResolver::heuristic_only()
    }
}
