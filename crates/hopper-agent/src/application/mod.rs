//! Application layer use cases for the Hopper agent.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (`hopper_core`: pure rules about monitors, windows and geometry) and the
//! infrastructure (Win32 calls, the keyboard hook, the config file).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal ("move the focused
//!   window to the next monitor").
//! - **Depend on abstractions** ([`desktop::WindowSystem`],
//!   [`desktop::MonitorSource`], [`listener::HotkeyListener`],
//!   [`settings::SettingsStore`]) rather than on Win32, so every path can be
//!   exercised by tests on any platform.
//! - **Contain no OS calls**.
//!
//! # Sub-modules
//!
//! - **`desktop`**          – traits over the windowing system.
//! - **`listener`**         – trait over the global hotkey facility.
//! - **`monitor_registry`** – enumerates monitors, resolves DPI, caches for a TTL.
//! - **`snapshot`**         – captures the foreground window.
//! - **`placement`**        – moves/resizes/restores/maximizes and verifies.
//! - **`relocate`**         – the capture → map → place pipeline.
//! - **`settings`**         – settings model and the store/log-level seams.
//! - **`service`**          – start/stop/reload façade and the worker thread.

pub mod desktop;
pub mod listener;
pub mod monitor_registry;
pub mod placement;
pub mod relocate;
pub mod service;
pub mod settings;
pub mod snapshot;
