//! Geometry mapper: where should a window land on another monitor?
//!
//! The window keeps its *relative* position and its *relative* size.
//!
//! - **Position** is expressed as a fraction of the source work area in
//!   logical units, then re-applied to the target work area in logical units.
//!   Logical units are right for position because the result has to line up
//!   with the target's own logical coordinate space.
//! - **Size** is expressed as a fraction of the source work area in
//!   *physical* units (logical length × scale factor), applied to the
//!   target's physical work area, then converted back to target logical units.
//!   This keeps the window's real on-screen footprint consistent across
//!   displays of different pixel density.
//!
//! The result is then clamped so the window is usable and fully inside the
//! target work area:
//!
//! ```text
//! width  ∈ [MIN_WIDTH,  target work width  − EDGE_MARGIN]
//! height ∈ [MIN_HEIGHT, target work height − EDGE_MARGIN]
//! x      ∈ [work.left + EDGE_INSET, work.right  − width  − EDGE_INSET]
//! y      ∈ [work.top  + EDGE_INSET, work.bottom − height − EDGE_INSET]
//! ```
//!
//! On a work area too small to honour both bounds, the upper bound wins.
//!
//! Ratios outside a plausible range are clamped and logged instead of
//! aborting: a usable-if-imperfect placement beats no placement when the
//! work-area data is corrupt.

use tracing::{debug, warn};

use super::geometry::{Rect, TargetRect};
use super::monitor::MonitorInfo;

/// Smallest width the mapper will produce, in logical units.
pub const MIN_WIDTH: i32 = 300;
/// Smallest height the mapper will produce, in logical units.
pub const MIN_HEIGHT: i32 = 200;
/// Gap kept between the window size and the work-area size.
pub const EDGE_MARGIN: i32 = 40;
/// Minimum distance between the window and the work-area edges.
pub const EDGE_INSET: i32 = 10;

/// Plausible range for a size ratio (window length / work-area length).
pub const SIZE_RATIO_RANGE: (f64, f64) = (0.10, 1.50);
/// Plausible range for a position ratio (offset / work-area length).
pub const POSITION_RATIO_RANGE: (f64, f64) = (-0.50, 1.50);

/// Ratio used when the source work area has no extent on an axis.
const FALLBACK_RATIO: f64 = 0.5;

/// Clamping limits for [`GeometryMapper::map_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryMapper {
    pub min_width: i32,
    pub min_height: i32,
    pub margin: i32,
    pub inset: i32,
}

impl Default for GeometryMapper {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            margin: EDGE_MARGIN,
            inset: EDGE_INSET,
        }
    }
}

/// Maps `source` from `from` to `to` with the default limits.
pub fn map_rect(source: &Rect, from: &MonitorInfo, to: &MonitorInfo) -> TargetRect {
    GeometryMapper::default().map_rect(source, from, to)
}

/// One axis of the mapping, kept separate so horizontal and vertical use
/// their own scale factors.
struct Axis {
    name: &'static str,
    win_start: i32,
    win_len: i32,
    src_start: i32,
    src_len: i32,
    src_scale: f64,
    dst_start: i32,
    dst_len: i32,
    dst_scale: f64,
}

impl Axis {
    /// Returns the unclamped `(start, length)` on the target axis.
    fn map(&self) -> (i32, i32) {
        let src_len = f64::from(self.src_len);
        let dst_len = f64::from(self.dst_len);
        let src_physical = src_len * self.src_scale;
        let dst_physical = dst_len * self.dst_scale;

        let position_ratio = if self.src_len > 0 {
            f64::from(self.win_start - self.src_start) / src_len
        } else {
            warn!(axis = self.name, "source work area has no extent; centring");
            FALLBACK_RATIO
        };
        let size_ratio = if src_physical > 0.0 {
            f64::from(self.win_len) * self.src_scale / src_physical
        } else {
            FALLBACK_RATIO
        };

        let position_ratio = plausible(self.name, "position", position_ratio, POSITION_RATIO_RANGE);
        let size_ratio = plausible(self.name, "size", size_ratio, SIZE_RATIO_RANGE);

        debug!(
            axis = self.name,
            position_ratio = format_args!("{:.1}%", position_ratio * 100.0),
            size_ratio = format_args!("{:.1}%", size_ratio * 100.0),
            src_physical = format_args!("{src_physical:.0}"),
            dst_physical = format_args!("{dst_physical:.0}"),
            "relative placement"
        );

        let length = (size_ratio * dst_physical / self.dst_scale).round() as i32;
        let start = self.dst_start + (position_ratio * dst_len).round() as i32;
        (start, length)
    }
}

/// Clamps `ratio` into `range`, logging a warning when it had to.
fn plausible(axis: &'static str, kind: &'static str, ratio: f64, range: (f64, f64)) -> f64 {
    let (low, high) = range;
    if ratio.is_nan() {
        warn!(axis, kind, "ratio is not a number; using {FALLBACK_RATIO}");
        return FALLBACK_RATIO;
    }
    if ratio < low || ratio > high {
        let clamped = ratio.clamp(low, high);
        warn!(
            axis,
            kind,
            ratio = format_args!("{:.1}%", ratio * 100.0),
            clamped = format_args!("{:.1}%", clamped * 100.0),
            "implausible ratio clamped"
        );
        return clamped;
    }
    ratio
}

/// Falls back to the monitor bounds when the reported work area is empty.
fn usable_area(monitor: &MonitorInfo) -> Rect {
    if monitor.work_area.is_degenerate() {
        warn!(
            monitor = monitor.index,
            work_area = ?monitor.work_area,
            "degenerate work area; using monitor bounds"
        );
        monitor.bounds
    } else {
        monitor.work_area
    }
}

/// Clamps a length into `[min, available - margin]`, letting the upper bound
/// win when the two conflict.
fn clamp_length(length: i32, min: i32, available: i32, margin: i32) -> i32 {
    let max = (available - margin).max(1);
    length.clamp(min.min(max), max)
}

/// Clamps a start coordinate so `[start, start + length)` stays inside
/// `[area_start + inset, area_end - inset]` where possible.
fn clamp_start(start: i32, length: i32, area_start: i32, area_end: i32, inset: i32) -> i32 {
    let low = area_start + inset;
    let high = (area_end - length - inset).max(low);
    start.clamp(low, high)
}

impl GeometryMapper {
    /// Computes the target rectangle for a window currently at `source` on
    /// monitor `from`, moving to monitor `to`.
    pub fn map_rect(&self, source: &Rect, from: &MonitorInfo, to: &MonitorInfo) -> TargetRect {
        let src = usable_area(from);
        let dst = usable_area(to);

        debug!(
            from = from.index,
            to = to.index,
            window = ?source,
            src_work = ?src,
            dst_work = ?dst,
            src_scale = from.dpi.scale_x(),
            dst_scale = to.dpi.scale_x(),
            "mapping window rectangle"
        );

        let horizontal = Axis {
            name: "x",
            win_start: source.left,
            win_len: source.width(),
            src_start: src.left,
            src_len: src.width(),
            src_scale: from.dpi.scale_x(),
            dst_start: dst.left,
            dst_len: dst.width(),
            dst_scale: to.dpi.scale_x(),
        };
        let vertical = Axis {
            name: "y",
            win_start: source.top,
            win_len: source.height(),
            src_start: src.top,
            src_len: src.height(),
            src_scale: from.dpi.scale_y(),
            dst_start: dst.top,
            dst_len: dst.height(),
            dst_scale: to.dpi.scale_y(),
        };

        let (raw_x, raw_width) = horizontal.map();
        let (raw_y, raw_height) = vertical.map();

        let width = clamp_length(raw_width, self.min_width, dst.width(), self.margin);
        let height = clamp_length(raw_height, self.min_height, dst.height(), self.margin);
        let x = clamp_start(raw_x, width, dst.left, dst.right, self.inset);
        let y = clamp_start(raw_y, height, dst.top, dst.bottom, self.inset);

        let target = TargetRect::new(x, y, width, height);
        debug!(
            raw = ?TargetRect::new(raw_x, raw_y, raw_width, raw_height),
            clamped = ?target,
            "mapped target rectangle"
        );
        target
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
