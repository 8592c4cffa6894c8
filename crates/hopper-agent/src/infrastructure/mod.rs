//! Infrastructure layer for the Hopper agent.
//!
//! Contains OS-facing adapters: the Win32 desktop adapter, the low-level
//! keyboard hook, the TOML settings store and the logging setup, plus the
//! in-memory stand-ins used by tests.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `hopper_core`, but MUST NOT be imported by the `application` layer.

pub mod desktop;
pub mod hotkey;
pub mod logging;
pub mod storage;
