//! `WindowManagerService`: the lifecycle façade the host process talks to.
//!
//! ```text
//! HotkeyListener ──HotkeyPress──► mpsc ──► worker thread ──► RelocateWindowUseCase
//!  (OS callback only enqueues)            (one move at a time; presses that
//!                                          arrive meanwhile are dropped)
//! ```
//!
//! `start()` and `stop()` are idempotent.  `reload_config()` re-reads the
//! settings store and, when running, tears down and reinstalls the listener.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use hopper_core::{validate_hotkey, ExclusionPolicy, MonitorInfo};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::desktop::WindowSystem;
use super::listener::{HotkeyListener, HotkeyPress};
use super::monitor_registry::MonitorRegistry;
use super::placement::{PlacementExecutor, PlacementOptions};
use super::relocate::RelocateWindowUseCase;
use super::settings::{LogLevelControl, SettingsStore, WindowManagementSettings};

pub struct WindowManagerService {
    settings: Arc<dyn SettingsStore>,
    registry: Arc<MonitorRegistry>,
    relocate: Arc<Mutex<RelocateWindowUseCase>>,
    listener: Arc<dyn HotkeyListener>,
    log_level: Option<Arc<dyn LogLevelControl>>,
    /// `Some` while running.
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WindowManagerService {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        registry: Arc<MonitorRegistry>,
        windows: Arc<dyn WindowSystem>,
        listener: Arc<dyn HotkeyListener>,
        placement: PlacementOptions,
    ) -> Self {
        let policy = ExclusionPolicy::new(settings.window_management().exclude_fullscreen);
        let executor = PlacementExecutor::new(Arc::clone(&windows), placement);
        let relocate = RelocateWindowUseCase::new(Arc::clone(&registry), windows, executor, policy);
        Self {
            settings,
            registry,
            relocate: Arc::new(Mutex::new(relocate)),
            listener,
            log_level: None,
            worker: Mutex::new(None),
        }
    }

    /// Lets `reload_config()` apply `debug_mode` to the log filter.
    pub fn with_log_level_control(mut self, control: Arc<dyn LogLevelControl>) -> Self {
        self.log_level = Some(control);
        self
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Starts the hotkey listener.
    ///
    /// Returns `false` when window management is disabled, the hotkey is
    /// invalid, or the listener cannot be installed.  Already running counts
    /// as success.
    pub fn start(&self) -> bool {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            warn!("window manager is already running");
            return true;
        }

        let settings = self.apply_settings();
        if !settings.enabled {
            info!("window management is disabled in settings");
            return false;
        }

        if !self.is_multi_monitor_setup() {
            // Still start: a monitor may be plugged in later.
            warn!("single monitor detected; window management functionality limited");
        }

        match self.spawn_listener(&settings) {
            Some(handle) => {
                *worker = Some(handle);
                info!("window manager started successfully");
                true
            }
            None => {
                error!("failed to start hotkey listener");
                false
            }
        }
    }

    /// Stops the listener and waits for an in-flight move to finish.
    pub fn stop(&self) {
        let mut worker = self.worker.lock();
        if worker.is_none() {
            return;
        }
        self.shut_down(&mut worker);
        self.registry.invalidate();
        info!("window manager stopped");
    }

    /// Re-reads settings, drops the monitor cache and restarts the listener
    /// if it was running.
    pub fn reload_config(&self) -> bool {
        let settings = self.apply_settings();
        self.registry.invalidate();

        let mut worker = self.worker.lock();
        if worker.is_none() {
            return true;
        }
        self.shut_down(&mut worker);

        if !settings.enabled {
            info!("window management disabled by configuration reload");
            return true;
        }
        match self.spawn_listener(&settings) {
            Some(handle) => {
                *worker = Some(handle);
                info!("configuration reloaded successfully");
                true
            }
            None => {
                error!("failed to restart hotkey listener after config reload");
                false
            }
        }
    }

    /// Current monitors, for diagnostics.
    pub fn get_monitors(&self) -> Vec<MonitorInfo> {
        self.registry.list_monitors()
    }

    pub fn is_multi_monitor_setup(&self) -> bool {
        self.registry.list_monitors().len() >= 2
    }

    /// Runs one relocation on the calling thread, serialised with the worker.
    pub fn move_active_window_to_next_monitor(&self) -> bool {
        self.relocate.lock().move_active_window_to_next_monitor()
    }

    fn apply_settings(&self) -> WindowManagementSettings {
        let settings = self.settings.window_management();
        if let Some(control) = &self.log_level {
            control.set_debug(settings.debug_mode);
        }
        self.relocate
            .lock()
            .set_policy(ExclusionPolicy::new(settings.exclude_fullscreen));
        settings
    }

    fn spawn_listener(&self, settings: &WindowManagementSettings) -> Option<JoinHandle<()>> {
        let hotkey = match validate_hotkey(&settings.hotkey) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                error!("invalid hotkey configuration {:?}: {e}", settings.hotkey);
                return None;
            }
        };

        let presses = match self.listener.start(&hotkey) {
            Ok(rx) => rx,
            Err(e) => {
                error!("failed to start hotkey listener: {e}");
                return None;
            }
        };

        let relocate = Arc::clone(&self.relocate);
        let spawned = thread::Builder::new()
            .name("hopper-relocate".to_string())
            .spawn(move || run_worker(presses, relocate));
        match spawned {
            Ok(handle) => {
                info!("hotkey listener started for: {hotkey}");
                Some(handle)
            }
            Err(e) => {
                error!("failed to spawn relocation worker: {e}");
                self.listener.stop();
                None
            }
        }
    }

    fn shut_down(&self, worker: &mut Option<JoinHandle<()>>) {
        // Stopping the listener closes the channel, which ends the worker loop.
        self.listener.stop();
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                error!("relocation worker panicked");
            }
        }
        info!("hotkey listener stopped");
    }
}

impl Drop for WindowManagerService {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Consumes presses until the listener closes the channel.
fn run_worker(presses: Receiver<HotkeyPress>, relocate: Arc<Mutex<RelocateWindowUseCase>>) {
    while let Ok(press) = presses.recv() {
        debug!("hotkey press picked up after {:?}", press.at.elapsed());
        relocate.lock().move_active_window_to_next_monitor();

        let dropped = presses.try_iter().count();
        if dropped > 0 {
            debug!("dropped {dropped} hotkey press(es) received during the move");
        }
    }
    debug!("relocation worker exiting");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
