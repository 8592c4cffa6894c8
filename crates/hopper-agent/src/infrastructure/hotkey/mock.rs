//! Mock hotkey listener for testing.
//!
//! Lets tests simulate hotkey presses without a Windows message loop or
//! OS hooks, and records how the service drove the listener.

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use hopper_core::Hotkey;
use parking_lot::Mutex;

use crate::application::listener::{HotkeyListener, HotkeyPress, ListenerError};

#[derive(Default)]
struct MockState {
    sender: Option<Sender<HotkeyPress>>,
    started: Vec<Hotkey>,
    stop_count: u32,
    fail_next_start: Option<String>,
}

/// A mock implementation of [`HotkeyListener`].
///
/// Clones share state, so a test can keep one handle while the service owns
/// another.
#[derive(Clone, Default)]
pub struct MockHotkeyListener {
    state: Arc<Mutex<MockState>>,
}

impl MockHotkeyListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates one press of the installed hotkey.
    ///
    /// Returns `false` when no listener is installed or the consumer is gone.
    pub fn press(&self) -> bool {
        match self.state.lock().sender.as_ref() {
            Some(sender) => sender.send(HotkeyPress::now()).is_ok(),
            None => false,
        }
    }

    /// Makes the next `start()` fail with a hook installation error.
    pub fn fail_next_start(&self, reason: &str) {
        self.state.lock().fail_next_start = Some(reason.to_string());
    }

    /// `true` while a listener is installed.
    pub fn is_installed(&self) -> bool {
        self.state.lock().sender.is_some()
    }

    /// Every hotkey passed to a successful `start()`, in order.
    pub fn started_hotkeys(&self) -> Vec<Hotkey> {
        self.state.lock().started.clone()
    }

    /// Number of times `stop()` was called.
    pub fn stop_count(&self) -> u32 {
        self.state.lock().stop_count
    }
}

impl HotkeyListener for MockHotkeyListener {
    fn start(&self, hotkey: &Hotkey) -> Result<mpsc::Receiver<HotkeyPress>, ListenerError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.fail_next_start.take() {
            return Err(ListenerError::HookInstallFailed(reason));
        }
        if state.sender.is_some() {
            return Err(ListenerError::AlreadyRunning);
        }
        let (tx, rx) = mpsc::channel();
        state.sender = Some(tx);
        state.started.push(hotkey.clone());
        Ok(rx)
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        // Dropping the sender closes the channel.
        state.sender = None;
        state.stop_count += 1;
    }
}
