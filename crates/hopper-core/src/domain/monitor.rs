//! Display model: one [`MonitorInfo`] per connected monitor.
//!
//! A `MonitorInfo` is a snapshot.  The registry that produces it rebuilds the
//! whole list on every refresh, so an `index` is only meaningful within the
//! list it came from and must never be persisted.
//!
//! # Logical vs. physical units (for beginners)
//!
//! Windows reports monitor and window rectangles in *logical* units.  A
//! display running at 175% scaling packs 1.75 physical pixels into every
//! logical unit along each axis.  Multiplying a logical length by the
//! monitor's [`scale_factor`](MonitorInfo::scale_factor) gives the physical
//! length, i.e. how much of the real panel it occupies.

use std::fmt;

use super::geometry::Rect;

/// DPI that Windows treats as 100% scaling.
pub const BASELINE_DPI: u32 = 96;

/// Opaque OS identifier of a monitor (an `HMONITOR` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MonitorHandle(pub isize);

/// Horizontal and vertical dots-per-inch of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dpi {
    pub x: u32,
    pub y: u32,
}

impl Dpi {
    /// 96×96, the unscaled baseline.
    pub const BASELINE: Dpi = Dpi::uniform(BASELINE_DPI);

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The same DPI on both axes.
    pub const fn uniform(dpi: u32) -> Self {
        Self { x: dpi, y: dpi }
    }

    /// Horizontal scale factor relative to 96 DPI.  Never zero: a zero DPI is
    /// treated as the baseline.
    pub fn scale_x(&self) -> f64 {
        scale_of(self.x)
    }

    /// Vertical scale factor relative to 96 DPI.
    pub fn scale_y(&self) -> f64 {
        scale_of(self.y)
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::BASELINE
    }
}

fn scale_of(dpi: u32) -> f64 {
    if dpi == 0 {
        1.0
    } else {
        f64::from(dpi) / f64::from(BASELINE_DPI)
    }
}

/// One connected display as seen during a single enumeration pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInfo {
    /// Position in the enumeration, unique within one registry snapshot.
    pub index: usize,
    pub handle: MonitorHandle,
    /// Full display rectangle in logical units.
    pub bounds: Rect,
    /// Display rectangle minus taskbars and docked app bars.
    pub work_area: Rect,
    pub is_primary: bool,
    /// Device name such as `\\.\DISPLAY1`.
    pub device_name: String,
    pub dpi: Dpi,
}

impl MonitorInfo {
    /// Scale factor on the horizontal axis (`dpi.x / 96`).  Always > 0.
    pub fn scale_factor(&self) -> f64 {
        self.dpi.scale_x()
    }

    /// Estimated physical resolution: logical bounds multiplied by the scale
    /// factor of each axis.
    pub fn physical_size(&self) -> (i32, i32) {
        let width = f64::from(self.bounds.width()) * self.dpi.scale_x();
        let height = f64::from(self.bounds.height()) * self.dpi.scale_y();
        (width.round() as i32, height.round() as i32)
    }

    /// A one-line human readable summary, used in startup diagnostics.
    pub fn describe(&self) -> String {
        MonitorSummary(self).to_string()
    }
}

struct MonitorSummary<'a>(&'a MonitorInfo);

impl fmt::Display for MonitorSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        let (physical_w, physical_h) = m.physical_size();
        let scale = m.scale_factor();
        write!(
            f,
            "monitor {} {}{}: logical {}x{} at ({}, {}), estimated physical {}x{}, scale {:.2}x ({}%), {} DPI",
            m.index,
            m.device_name,
            if m.is_primary { " [primary]" } else { "" },
            m.bounds.width(),
            m.bounds.height(),
            m.bounds.left,
            m.bounds.top,
            physical_w,
            physical_h,
            scale,
            (scale * 100.0).round() as i64,
            m.dpi.x,
        )
    }
}

/// Finds the monitor that holds the largest part of `window`.
///
/// Returns `None` when the window does not overlap any monitor, for example
/// when it has been parked far off-screen.
pub fn find_window_monitor<'a>(window: &Rect, monitors: &'a [MonitorInfo]) -> Option<&'a MonitorInfo> {
    let mut best: Option<(&MonitorInfo, i64)> = None;
    for monitor in monitors {
        let overlap = window.overlap_area(&monitor.bounds);
        if overlap == 0 {
            continue;
        }
        match best {
            Some((_, best_overlap)) if best_overlap >= overlap => {}
            _ => best = Some((monitor, overlap)),
        }
    }
    best.map(|(monitor, _)| monitor)
}

/// Returns the monitor that follows `current` in index order, wrapping around.
///
/// With two monitors, calling this twice returns to the starting monitor.
/// Returns `None` for an empty list or when no monitor carries the expected
/// index (a list from a different registry snapshot).
pub fn next_monitor<'a>(current: &MonitorInfo, monitors: &'a [MonitorInfo]) -> Option<&'a MonitorInfo> {
    if monitors.is_empty() {
        return None;
    }
    let next_index = (current.index + 1) % monitors.len();
    monitors.iter().find(|m| m.index == next_index)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
