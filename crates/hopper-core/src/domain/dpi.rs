//! DPI resolution as an ordered cascade of strategies.
//!
//! Per-monitor DPI reporting on Windows depends on the OS version and on the
//! process's DPI-awareness mode, and neither can be fully trusted.  The
//! resolver therefore tries strategies from most to least precise and stops
//! at the first one that yields a plausible value:
//!
//! 1. The per-monitor effective-DPI API (`GetDpiForMonitor`).
//! 2. A device context opened on the monitor's device name (`GetDeviceCaps`).
//! 3. [`ResolutionHeuristic`]: a guess from the logical resolution.
//! 4. 96×96.
//!
//! Strategies 1 and 2 need the OS and live in the agent crate; this module
//! only owns the driver and the pure heuristic.

use tracing::debug;

use super::geometry::Rect;
use super::monitor::{Dpi, MonitorHandle, BASELINE_DPI};

/// DPI assumed for small logical resolutions, i.e. 175% scaling.
pub const HIGH_SCALE_DPI: u32 = 168;

/// Lowest DPI a strategy may report and still be believed.
pub const MIN_PLAUSIBLE_DPI: u32 = 72;
/// Highest DPI a strategy may report and still be believed (500% scaling).
pub const MAX_PLAUSIBLE_DPI: u32 = 480;

/// Everything a strategy may need to know about the monitor being probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorProbe {
    pub handle: MonitorHandle,
    pub device_name: String,
    pub bounds: Rect,
}

/// One way of finding out a monitor's DPI.
///
/// Returning `None` means "I could not tell"; the resolver moves on.
pub trait DpiStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn resolve(&self, probe: &MonitorProbe) -> Option<Dpi>;
}

/// Returns `true` when both axes fall within the believable range.
pub fn is_plausible(dpi: Dpi) -> bool {
    let range = MIN_PLAUSIBLE_DPI..=MAX_PLAUSIBLE_DPI;
    range.contains(&dpi.x) && range.contains(&dpi.y)
}

/// Runs strategies in order, falling back to 96×96.
pub struct DpiResolver {
    strategies: Vec<Box<dyn DpiStrategy>>,
}

impl DpiResolver {
    pub fn new(strategies: Vec<Box<dyn DpiStrategy>>) -> Self {
        Self { strategies }
    }

    /// A resolver with only the resolution heuristic, for platforms without
    /// a native DPI API.
    pub fn heuristic_only() -> Self {
        Self::new(vec![Box::new(ResolutionHeuristic)])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolves the DPI for `probe`.  Never fails.
    pub fn resolve(&self, probe: &MonitorProbe) -> Dpi {
        for strategy in &self.strategies {
            match strategy.resolve(probe) {
                Some(dpi) if is_plausible(dpi) => {
                    debug!(
                        device = %probe.device_name,
                        strategy = strategy.name(),
                        dpi_x = dpi.x,
                        dpi_y = dpi.y,
                        "resolved monitor DPI"
                    );
                    return dpi;
                }
                Some(dpi) => debug!(
                    device = %probe.device_name,
                    strategy = strategy.name(),
                    dpi_x = dpi.x,
                    dpi_y = dpi.y,
                    "discarding implausible DPI"
                ),
                None => debug!(
                    device = %probe.device_name,
                    strategy = strategy.name(),
                    "strategy gave no answer"
                ),
            }
        }
        debug!(device = %probe.device_name, "all DPI strategies failed; assuming 96");
        Dpi::BASELINE
    }
}

/// Common resolutions that almost always run at 100% scaling.
const UNSCALED_RESOLUTIONS: [(i32, i32); 6] = [
    (1920, 1080),
    (2560, 1440),
    (3440, 1440),
    (2560, 1080),
    (3840, 1600),
    (5120, 1440),
];

/// Guesses DPI from the monitor's logical resolution.
///
/// A small logical resolution usually means a dense panel scaled up, so it is
/// assumed to run at 175%.  Everything else is assumed unscaled.  This is a
/// best-effort default, not a contract.
pub struct ResolutionHeuristic;

impl ResolutionHeuristic {
    pub fn estimate(width: i32, height: i32) -> Dpi {
        if UNSCALED_RESOLUTIONS.contains(&(width, height)) {
            Dpi::BASELINE
        } else if width < 1600 && height < 1000 {
            Dpi::uniform(HIGH_SCALE_DPI)
        } else {
            Dpi::uniform(BASELINE_DPI)
        }
    }
}

impl DpiStrategy for ResolutionHeuristic {
    fn name(&self) -> &'static str {
        "resolution-heuristic"
    }

    fn resolve(&self, probe: &MonitorProbe) -> Option<Dpi> {
        if probe.bounds.is_degenerate() {
            return None;
        }
        Some(Self::estimate(probe.bounds.width(), probe.bounds.height()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        answer: Option<Dpi>,
        calls: Arc<AtomicUsize>,
    }

    impl DpiStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn resolve(&self, _probe: &MonitorProbe) -> Option<Dpi> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    fn fixed(answer: Option<Dpi>) -> (Box<dyn DpiStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Fixed {
                answer,
                calls: Arc::clone(&calls),
            }),
            calls,
        )
    }

    fn probe(width: i32, height: i32) -> MonitorProbe {
        MonitorProbe {
            handle: MonitorHandle(1),
            device_name: "\\\\.\\DISPLAY1".to_string(),
            bounds: Rect::new(0, 0, width, height),
        }
    }

    #[test]
    fn test_resolver_stops_at_first_plausible_answer() {
        // Arrange
        let (first, first_calls) = fixed(Some(Dpi::uniform(144)));
        let (second, second_calls) = fixed(Some(Dpi::uniform(96)));
        let resolver = DpiResolver::new(vec![first, second]);

        // Act
        let dpi = resolver.resolve(&probe(2560, 1440));

        // Assert
        assert_eq!(dpi, Dpi::uniform(144));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resolver_skips_missing_and_implausible_answers() {
        let (none, _) = fixed(None);
        let (absurd, _) = fixed(Some(Dpi::new(0, 0)));
        let (good, _) = fixed(Some(Dpi::uniform(120)));
        let resolver = DpiResolver::new(vec![none, absurd, good]);

        assert_eq!(resolver.resolve(&probe(1920, 1080)), Dpi::uniform(120));
    }

    #[test]
    fn test_resolver_falls_back_to_baseline_when_everything_fails() {
        let (none, _) = fixed(None);
        let resolver = DpiResolver::new(vec![none]);
        assert_eq!(resolver.resolve(&probe(1920, 1080)), Dpi::BASELINE);
    }

    #[test]
    fn test_empty_resolver_returns_baseline() {
        let resolver = DpiResolver::new(Vec::new());
        assert_eq!(resolver.resolve(&probe(1280, 720)), Dpi::BASELINE);
    }

    #[test]
    fn test_heuristic_treats_common_resolutions_as_unscaled() {
        assert_eq!(ResolutionHeuristic::estimate(1920, 1080), Dpi::BASELINE);
        assert_eq!(ResolutionHeuristic::estimate(2560, 1440), Dpi::BASELINE);
        assert_eq!(ResolutionHeuristic::estimate(3440, 1440), Dpi::BASELINE);
    }

    #[test]
    fn test_heuristic_treats_small_resolution_as_175_percent() {
        assert_eq!(ResolutionHeuristic::estimate(1536, 864), Dpi::uniform(168));
        assert_eq!(ResolutionHeuristic::estimate(1280, 720), Dpi::uniform(168));
    }

    #[test]
    fn test_heuristic_defaults_unknown_resolution_to_baseline() {
        assert_eq!(ResolutionHeuristic::estimate(1680, 1050), Dpi::BASELINE);
        assert_eq!(ResolutionHeuristic::estimate(1600, 900), Dpi::BASELINE);
    }

    #[test]
    fn test_heuristic_strategy_declines_degenerate_bounds() {
        assert!(ResolutionHeuristic.resolve(&probe(0, 0)).is_none());
    }

    #[test]
    fn test_plausibility_range_is_inclusive() {
        assert!(is_plausible(Dpi::uniform(72)));
        assert!(is_plausible(Dpi::uniform(480)));
        assert!(!is_plausible(Dpi::uniform(71)));
        assert!(!is_plausible(Dpi::new(96, 481)));
    }
}
