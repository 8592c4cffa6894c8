//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate directory.
//! - Writing a default file for the user to edit.
//! - Providing defaults when the file does not exist yet (first run) or is
//!   malformed.
//!
//! [`FileSettingsStore`](config::FileSettingsStore) adapts the file to the
//! application's `SettingsStore` trait.

pub mod config;
