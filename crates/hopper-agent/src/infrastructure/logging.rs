//! Structured logging setup.
//!
//! The level comes from `RUST_LOG` when set; otherwise it is `info`, or
//! `debug` while the `debug_mode` setting is on.  The filter sits behind a
//! [`reload`] layer so `reload_config()` can switch verbosity without a
//! restart.

use tracing::{debug, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::application::settings::LogLevelControl;

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn level_filter(verbose: bool) -> EnvFilter {
    EnvFilter::new(if verbose { "debug" } else { "info" })
}

/// Installs the global subscriber and returns the control for live level
/// changes.
///
/// Calling it twice is harmless: the second subscriber is not installed and
/// the returned control does nothing.
pub fn init_logging(verbose: bool) -> ReloadableLogLevel {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let env_override = env_filter.is_some();
    let filter = env_filter.unwrap_or_else(|| level_filter(verbose));

    let (filter_layer, handle) = reload::Layer::new(filter);
    let installed = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer())
        .try_init()
        .is_ok();

    ReloadableLogLevel {
        handle: installed.then_some(handle),
        env_override,
    }
}

/// [`LogLevelControl`] backed by a `tracing_subscriber` reload handle.
pub struct ReloadableLogLevel {
    handle: Option<FilterHandle>,
    /// `RUST_LOG` was set; it wins over `debug_mode`.
    env_override: bool,
}

impl ReloadableLogLevel {
    pub fn from_handle(handle: FilterHandle, env_override: bool) -> Self {
        Self {
            handle: Some(handle),
            env_override,
        }
    }

    /// The active filter directives, if a subscriber is attached.
    pub fn current_filter(&self) -> Option<String> {
        self.handle.as_ref()?.with_current(|f| f.to_string()).ok()
    }
}

impl LogLevelControl for ReloadableLogLevel {
    fn set_debug(&self, enabled: bool) {
        let Some(handle) = &self.handle else {
            return;
        };
        if self.env_override {
            debug!("RUST_LOG is set; ignoring debug_mode={enabled}");
            return;
        }
        match handle.reload(level_filter(enabled)) {
            Ok(()) => debug!(enabled, "log level updated"),
            Err(e) => warn!("could not update log level: {e}"),
        }
    }
}
