//! Hopper agent entry point.
//!
//! Wires the infrastructure adapters into a `WindowManagerService`, starts
//! the hotkey listener, and blocks until Ctrl-C.
//!
//! ```text
//! main()
//!  └─ FileSettingsStore      -- TOML config, re-read on reload
//!  └─ init_logging()         -- EnvFilter behind a reload handle
//!  └─ WindowManagerService
//!       ├─ MonitorRegistry   (WindowsDesktop + DPI cascade, 5 s cache)
//!       ├─ WindowsDesktop    (window queries and moves)
//!       └─ WindowsHotkeyListener (WH_KEYBOARD_LL hook thread)
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use hopper_agent::infrastructure::logging::{init_logging, ReloadableLogLevel};
use hopper_agent::infrastructure::storage::config::{
    config_file_path, save_config_to, AppConfig, FileSettingsStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = config_file_path().context("resolving the config file location")?;
    let store = FileSettingsStore::new(&config_path);
    let config = store.load();

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    let log_level = Arc::new(init_logging(config.window_management.debug_mode));

    info!("Hopper starting (config: {})", config_path.display());
    write_default_config(&config_path, &config);

    run(store, config, log_level).await?;

    info!("Hopper stopped");
    Ok(())
}

/// Writes the defaults on first run so there is a file to edit.
fn write_default_config(path: &Path, config: &AppConfig) {
    if path.exists() {
        return;
    }
    match save_config_to(path, config) {
        Ok(()) => info!("wrote default config to {}", path.display()),
        Err(e) => warn!("could not write default config: {e}"),
    }
}

#[cfg(target_os = "windows")]
async fn run(
    store: FileSettingsStore,
    config: AppConfig,
    log_level: Arc<ReloadableLogLevel>,
) -> anyhow::Result<()> {
    use hopper_agent::application::monitor_registry::MonitorRegistry;
    use hopper_agent::application::service::WindowManagerService;
    use hopper_agent::infrastructure::desktop::platform_dpi_resolver;
    use hopper_agent::infrastructure::desktop::windows::{enable_dpi_awareness, WindowsDesktop};
    use hopper_agent::infrastructure::hotkey::windows::WindowsHotkeyListener;

    // Must precede any window creation.
    enable_dpi_awareness();

    let desktop = Arc::new(WindowsDesktop::new());
    let registry = Arc::new(MonitorRegistry::new(
        desktop.clone(),
        platform_dpi_resolver(),
        config.cache_ttl(),
    ));
    let service = WindowManagerService::new(
        Arc::new(store),
        registry,
        desktop,
        Arc::new(WindowsHotkeyListener::new()),
        config.placement_options(),
    )
    .with_log_level_control(log_level);

    let monitors = service.get_monitors();
    println!("Detected {} monitor(s):", monitors.len());
    for monitor in &monitors {
        println!("  {}", monitor.describe());
    }

    if service.start() {
        info!("Hopper ready.  Press Ctrl-C to exit.");
    } else {
        warn!("window relocation is unavailable; check the [window_management] settings");
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for the shutdown signal")?;
    info!("shutdown signal received");

    service.stop();
    Ok(())
}

#[cfg(not(target_os = "windows"))]
async fn run(
    _store: FileSettingsStore,
    _config: AppConfig,
    _log_level: Arc<ReloadableLogLevel>,
) -> anyhow::Result<()> {
    warn!(
        "window relocation needs the Win32 desktop API; {} is not supported",
        std::env::consts::OS
    );
    Ok(())
}
