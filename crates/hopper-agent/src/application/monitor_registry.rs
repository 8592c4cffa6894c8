//! Monitor Registry: enumerates displays and caches the result for a TTL.
//!
//! All reads within one TTL window observe the same snapshot.  The cache is
//! behind a lock held across enumeration, so concurrent callers arriving at
//! an expired cache wait for a single refresh instead of racing it.
//!
//! Enumeration failures never propagate: the registry logs the error and
//! returns an empty list, which callers treat as "relocation unavailable".
//! Failures are not cached, so the next call retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hopper_core::{DpiResolver, MonitorInfo, MonitorProbe, Rect};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use super::desktop::{MonitorSource, RawMonitor};

/// Default time-to-live of the monitor cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

struct CachedMonitors {
    monitors: Vec<MonitorInfo>,
    fetched_at: Instant,
}

pub struct MonitorRegistry {
    source: Arc<dyn MonitorSource>,
    resolver: DpiResolver,
    ttl: Duration,
    cache: Mutex<Option<CachedMonitors>>,
}

impl MonitorRegistry {
    pub fn new(source: Arc<dyn MonitorSource>, resolver: DpiResolver, ttl: Duration) -> Self {
        Self {
            source,
            resolver,
            ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the monitors, enumerating again only when the cache expired.
    pub fn list_monitors(&self) -> Vec<MonitorInfo> {
        let mut cache = self.cache.lock();
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return cached.monitors.clone();
            }
        }
        self.refresh_locked(&mut cache)
    }

    /// Enumerates now, regardless of the cache age.
    pub fn refresh(&self) -> Vec<MonitorInfo> {
        let mut cache = self.cache.lock();
        self.refresh_locked(&mut cache)
    }

    /// `true` when the next [`list_monitors`](Self::list_monitors) call will
    /// enumerate.
    pub fn is_stale(&self) -> bool {
        match self.cache.lock().as_ref() {
            Some(cached) => cached.fetched_at.elapsed() >= self.ttl,
            None => true,
        }
    }

    /// Drops the cached snapshot.
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }

    fn refresh_locked(&self, cache: &mut Option<CachedMonitors>) -> Vec<MonitorInfo> {
        let raw = match self.source.enumerate_monitors() {
            Ok(raw) => raw,
            Err(e) => {
                error!("failed to enumerate monitors: {e}");
                *cache = None;
                return Vec::new();
            }
        };

        let monitors = self.build(raw);
        debug!("found {} monitor(s)", monitors.len());
        for monitor in &monitors {
            debug!("{}", monitor.describe());
        }

        *cache = Some(CachedMonitors {
            monitors: monitors.clone(),
            fetched_at: Instant::now(),
        });
        monitors
    }

    fn build(&self, raw: Vec<RawMonitor>) -> Vec<MonitorInfo> {
        let primary = primary_position(&raw);
        raw.into_iter()
            .enumerate()
            .map(|(index, m)| {
                let probe = MonitorProbe {
                    handle: m.handle,
                    device_name: m.device_name.clone(),
                    bounds: m.bounds,
                };
                MonitorInfo {
                    index,
                    handle: m.handle,
                    bounds: m.bounds,
                    work_area: m.work_area,
                    is_primary: Some(index) == primary,
                    device_name: m.device_name,
                    dpi: self.resolver.resolve(&probe),
                }
            })
            .collect()
    }
}

/// Picks the single monitor to tag as primary.
///
/// The first monitor the OS flags wins.  With no flag at all, the monitor
/// containing the desktop origin is chosen, else the first one.
fn primary_position(raw: &[RawMonitor]) -> Option<usize> {
    let flagged: Vec<usize> = raw
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_primary)
        .map(|(i, _)| i)
        .collect();
    if flagged.len() > 1 {
        warn!("OS reported {} primary monitors; keeping the first", flagged.len());
    }
    if let Some(first) = flagged.first() {
        return Some(*first);
    }
    if raw.is_empty() {
        return None;
    }
    warn!("OS reported no primary monitor; inferring one");
    Some(raw.iter().position(|m| contains_origin(&m.bounds)).unwrap_or(0))
}

fn contains_origin(bounds: &Rect) -> bool {
    bounds.left <= 0 && 0 < bounds.right && bounds.top <= 0 && 0 < bounds.bottom
}

// ── Tests ─────────────────────────────────────────────────────────────────────
