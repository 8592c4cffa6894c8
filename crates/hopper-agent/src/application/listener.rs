//! Global hotkey listener abstraction.
//!
//! A listener owns whatever OS machinery observes the keyboard and reports
//! each press of the configured combination on a channel.  It does no
//! relocation work itself: the OS callback only enqueues, and the service's
//! worker thread consumes.

use std::sync::mpsc;
use std::time::Instant;

use hopper_core::Hotkey;
use thiserror::Error;

/// One press of the configured hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyPress {
    pub at: Instant,
}

impl HotkeyPress {
    pub fn now() -> Self {
        Self { at: Instant::now() }
    }
}

/// Error type for listener installation.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to install keyboard hook: {0}")]
    HookInstallFailed(String),
    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawnFailed(String),
    #[error("listener is already running")]
    AlreadyRunning,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting the global hotkey facility.
///
/// The production implementation uses a low-level keyboard hook; tests use
/// `infrastructure::hotkey::mock::MockHotkeyListener`.
pub trait HotkeyListener: Send + Sync {
    /// Installs the listener for `hotkey`.  Each press is delivered once on
    /// the returned receiver.
    fn start(&self, hotkey: &Hotkey) -> Result<mpsc::Receiver<HotkeyPress>, ListenerError>;

    /// Uninstalls the listener and closes the channel.  Idempotent.
    fn stop(&self);
}
