//! Win32 desktop adapter.
//!
//! Monitors come from `EnumDisplayMonitors` / `GetMonitorInfoW`; window
//! queries and moves go through the `WindowsAndMessaging` API.  DPI is
//! resolved by the cascade built in [`dpi_resolver`].
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::ffi::c_void;
use std::path::Path;

use hopper_core::{
    Dpi, DpiResolver, DpiStrategy, MonitorHandle, MonitorProbe, Rect, ResolutionHeuristic,
    TargetRect, WindowHandle,
};
use tracing::{debug, info, warn};
use windows::core::{w, PCWSTR, PWSTR};
use windows::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    CreateDCW, DeleteDC, EnumDisplayMonitors, GetDeviceCaps, GetMonitorInfoW, HDC, HMONITOR,
    LOGPIXELSX, LOGPIXELSY, MONITORINFOEXW,
};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::HiDpi::{
    GetAwarenessFromDpiAwarenessContext, GetDpiForMonitor, GetThreadDpiAwarenessContext,
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, MDT_EFFECTIVE_DPI,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClassNameW, GetForegroundWindow, GetWindowPlacement, GetWindowRect, GetWindowTextW,
    GetWindowThreadProcessId, IsWindow, SetWindowPos, ShowWindow, SWP_NOACTIVATE, SWP_NOZORDER,
    SW_MAXIMIZE, SW_RESTORE, WINDOWPLACEMENT,
};

use crate::application::desktop::{DesktopError, MonitorSource, RawMonitor, ShowCommand, WindowSystem};

/// `MONITORINFO::dwFlags` bit marking the primary monitor.
const MONITORINFOF_PRIMARY: u32 = 1;

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

fn hmonitor(monitor: MonitorHandle) -> HMONITOR {
    HMONITOR(monitor.0 as *mut c_void)
}

fn api_error(call: &'static str, e: windows::core::Error) -> DesktopError {
    DesktopError::Api {
        call,
        message: e.message(),
    }
}

fn rect_from(rc: &RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right, rc.bottom)
}

/// Decodes a NUL-terminated UTF-16 buffer.
fn utf16_until_nul(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

/// Declares per-monitor (V2) DPI awareness and logs the mode in effect.
///
/// Must run before any window is created.  If the host already chose a mode
/// (manifest, earlier call) the request fails; that is logged and ignored
/// because the DPI cascade copes with either mode.
pub fn enable_dpi_awareness() {
    // SAFETY: Plain Win32 call with a predefined context constant.
    match unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) } {
        Ok(()) => debug!("requested per-monitor DPI awareness (V2)"),
        Err(e) => warn!("could not set per-monitor DPI awareness: {}", e.message()),
    }

    // SAFETY: Queries the calling thread's awareness context; no pointers involved.
    let awareness = unsafe { GetAwarenessFromDpiAwarenessContext(GetThreadDpiAwarenessContext()) };
    let mode = match awareness.0 {
        0 => "unaware",
        1 => "system aware",
        2 => "per-monitor aware",
        _ => "unknown",
    };
    info!("DPI awareness in effect: {mode}");
}

/// The Windows DPI cascade: effective DPI, device context, heuristic.
pub fn dpi_resolver() -> DpiResolver {
    DpiResolver::new(vec![
        Box::new(EffectiveDpi),
        Box::new(DeviceContextDpi),
        Box::new(ResolutionHeuristic),
    ])
}

/// `GetDpiForMonitor(MDT_EFFECTIVE_DPI)`.
pub struct EffectiveDpi;

impl DpiStrategy for EffectiveDpi {
    fn name(&self) -> &'static str {
        "effective-dpi"
    }

    fn resolve(&self, probe: &MonitorProbe) -> Option<Dpi> {
        let mut x = 0u32;
        let mut y = 0u32;
        // SAFETY: `x` and `y` are valid for writes for the duration of the call.
        match unsafe { GetDpiForMonitor(hmonitor(probe.handle), MDT_EFFECTIVE_DPI, &mut x, &mut y) } {
            Ok(()) => Some(Dpi::new(x, y)),
            Err(e) => {
                debug!(device = %probe.device_name, "GetDpiForMonitor failed: {}", e.message());
                None
            }
        }
    }
}

/// `GetDeviceCaps(LOGPIXELSX/Y)` on a DC created for the monitor's device.
pub struct DeviceContextDpi;

impl DpiStrategy for DeviceContextDpi {
    fn name(&self) -> &'static str {
        "device-context"
    }

    fn resolve(&self, probe: &MonitorProbe) -> Option<Dpi> {
        if probe.device_name.is_empty() {
            return None;
        }
        let device: Vec<u16> = probe.device_name.encode_utf16().chain(Some(0)).collect();

        // SAFETY: `device` is NUL-terminated and outlives the call.
        let hdc: HDC = unsafe { CreateDCW(w!("DISPLAY"), PCWSTR(device.as_ptr()), PCWSTR::null(), None) };
        if hdc.is_invalid() {
            debug!(device = %probe.device_name, "CreateDCW returned no device context");
            return None;
        }

        // SAFETY: `hdc` is a valid DC created above and deleted right after.
        let (x, y) = unsafe {
            let x = GetDeviceCaps(hdc, LOGPIXELSX);
            let y = GetDeviceCaps(hdc, LOGPIXELSY);
            let _ = DeleteDC(hdc);
            (x, y)
        };

        if x <= 0 || y <= 0 {
            return None;
        }
        Some(Dpi::new(x as u32, y as u32))
    }
}

/// Win32 implementation of [`MonitorSource`] and [`WindowSystem`].
pub struct WindowsDesktop;

impl WindowsDesktop {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorSource for WindowsDesktop {
    fn enumerate_monitors(&self) -> Result<Vec<RawMonitor>, DesktopError> {
        let mut monitors: Vec<RawMonitor> = Vec::new();

        // SAFETY: `lpfn` is a valid function pointer with the correct signature.
        // `lParam` is a raw pointer to `monitors` which outlives this call.
        // The callback is synchronous and called only within `EnumDisplayMonitors`.
        // `HDC::default()` (null) means enumerate all monitors on the virtual desktop.
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut monitors as *mut Vec<RawMonitor> as isize),
            )
        };

        if !ok.as_bool() {
            return Err(DesktopError::Api {
                call: "EnumDisplayMonitors",
                message: "enumeration aborted".to_string(),
            });
        }
        if monitors.is_empty() {
            return Err(DesktopError::Api {
                call: "EnumDisplayMonitors",
                message: "returned no monitors".to_string(),
            });
        }
        Ok(monitors)
    }
}

/// Win32 monitor enumeration callback.
///
/// # Safety
///
/// Called by Win32 inside `EnumDisplayMonitors`. `lparam` must be a valid
/// pointer to `Vec<RawMonitor>` for the duration of the enumeration call.
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprc_clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = &mut *(lparam.0 as *mut Vec<RawMonitor>);

    // SAFETY: MONITORINFOEXW is a Plain Old Data struct; zero initialization is valid.
    let mut info: MONITORINFOEXW = std::mem::zeroed();
    info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

    // SAFETY: `hmonitor` is a valid handle provided by Win32.
    if GetMonitorInfoW(hmonitor, &mut info.monitorInfo).as_bool() {
        monitors.push(RawMonitor {
            handle: MonitorHandle(hmonitor.0 as isize),
            bounds: rect_from(&info.monitorInfo.rcMonitor),
            work_area: rect_from(&info.monitorInfo.rcWork),
            is_primary: (info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY) != 0,
            device_name: utf16_until_nul(&info.szDevice),
        });
    } else {
        warn!("GetMonitorInfoW failed for monitor {:?}; skipping", hmonitor.0);
    }

    BOOL(1) // continue enumeration
}

impl WindowSystem for WindowsDesktop {
    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: No arguments; returns null when no window has focus.
        let hwnd = unsafe { GetForegroundWindow() };
        let handle = WindowHandle(hwnd.0 as isize);
        (!handle.is_null()).then_some(handle)
    }

    fn is_window(&self, window: WindowHandle) -> bool {
        // SAFETY: IsWindow accepts any value, including stale handles.
        !window.is_null() && unsafe { IsWindow(hwnd(window)) }.as_bool()
    }

    fn window_rect(&self, window: WindowHandle) -> Result<Rect, DesktopError> {
        let mut rc = RECT::default();
        // SAFETY: `rc` is valid for writes.
        unsafe { GetWindowRect(hwnd(window), &mut rc) }.map_err(|e| api_error("GetWindowRect", e))?;
        Ok(rect_from(&rc))
    }

    fn window_title(&self, window: WindowHandle) -> Result<String, DesktopError> {
        let mut buf = [0u16; 512];
        // SAFETY: The buffer length is passed implicitly by the slice.
        let len = unsafe { GetWindowTextW(hwnd(window), &mut buf) };
        Ok(String::from_utf16_lossy(&buf[..len.max(0) as usize]))
    }

    fn window_class(&self, window: WindowHandle) -> Result<String, DesktopError> {
        let mut buf = [0u16; 256];
        // SAFETY: The buffer length is passed implicitly by the slice.
        let len = unsafe { GetClassNameW(hwnd(window), &mut buf) };
        if len == 0 {
            return Err(api_error("GetClassNameW", windows::core::Error::from_win32()));
        }
        Ok(String::from_utf16_lossy(&buf[..len as usize]))
    }

    fn show_cmd(&self, window: WindowHandle) -> Result<u32, DesktopError> {
        let mut placement = WINDOWPLACEMENT {
            length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
            ..Default::default()
        };
        // SAFETY: `placement.length` is initialised as the API requires.
        unsafe { GetWindowPlacement(hwnd(window), &mut placement) }
            .map_err(|e| api_error("GetWindowPlacement", e))?;
        Ok(placement.showCmd)
    }

    fn process_name(&self, window: WindowHandle) -> Result<String, DesktopError> {
        let mut pid = 0u32;
        // SAFETY: `pid` is valid for writes.
        unsafe { GetWindowThreadProcessId(hwnd(window), Some(&mut pid as *mut u32)) };
        if pid == 0 {
            return Err(DesktopError::WindowGone(window));
        }

        // SAFETY: The handle is closed below on every path.
        let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
            .map_err(|e| api_error("OpenProcess", e))?;

        let mut buf = [0u16; 1024];
        let mut size = buf.len() as u32;
        // SAFETY: `buf` holds `size` UTF-16 units; `size` is updated in place.
        let queried = unsafe {
            QueryFullProcessImageNameW(process, PROCESS_NAME_WIN32, PWSTR(buf.as_mut_ptr()), &mut size)
        };
        // SAFETY: `process` was opened above and is not used afterwards.
        let _ = unsafe { CloseHandle(process) };
        queried.map_err(|e| api_error("QueryFullProcessImageNameW", e))?;

        let path = String::from_utf16_lossy(&buf[..size as usize]);
        Ok(Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(path))
    }

    fn set_window_pos(&self, window: WindowHandle, target: TargetRect) -> Result<(), DesktopError> {
        if !self.is_window(window) {
            return Err(DesktopError::WindowGone(window));
        }
        // SAFETY: Plain Win32 call on a live handle; z-order and activation untouched.
        unsafe {
            SetWindowPos(
                hwnd(window),
                HWND::default(),
                target.x,
                target.y,
                target.width,
                target.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        }
        .map_err(|e| api_error("SetWindowPos", e))
    }

    fn show_window(&self, window: WindowHandle, command: ShowCommand) -> Result<(), DesktopError> {
        if !self.is_window(window) {
            return Err(DesktopError::WindowGone(window));
        }
        let cmd = match command {
            ShowCommand::Restore => SW_RESTORE,
            ShowCommand::Maximize => SW_MAXIMIZE,
        };
        // SAFETY: Plain Win32 call on a live handle.  The return value is the
        // previous visibility, not an error indicator.
        let _ = unsafe { ShowWindow(hwnd(window), cmd) };
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
