//! Domain entities and rules for cross-monitor window relocation.
//!
//! Nothing in here talks to the OS.  Monitors and windows arrive as plain
//! values, and every decision (which monitor a window is on, whether it may
//! move, where it should land, which DPI to believe) is a pure function of
//! those values.  That keeps the rules testable on any platform.
//!
//! - [`geometry`] – `Rect` / `TargetRect` primitives.
//! - [`monitor`]  – `MonitorInfo`, DPI and scale factors, monitor lookup.
//! - [`window`]   – `WindowSnapshot` and show state.
//! - [`exclusion`] – which windows are never relocated.
//! - [`mapper`]   – computing the target rectangle across DPI domains.
//! - [`dpi`]      – the DPI strategy cascade and resolution heuristic.

pub mod dpi;
pub mod exclusion;
pub mod geometry;
pub mod mapper;
pub mod monitor;
pub mod window;
