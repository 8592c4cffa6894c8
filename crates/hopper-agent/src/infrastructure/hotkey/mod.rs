//! Global hotkey listeners implementing [`HotkeyListener`].
//!
//! On Windows a low-level keyboard hook (`WH_KEYBOARD_LL`) runs on a
//! dedicated message-loop thread.  The hook callback only feeds a
//! [`HotkeyDetector`] and enqueues a [`HotkeyPress`]; relocation work happens
//! on the service's worker thread.
//!
//! The hook callback must complete within ~300ms or Windows will remove the
//! hook, so nothing in it blocks.
//!
//! # Testability
//!
//! [`mock::MockHotkeyListener`] lets tests press the hotkey without a message
//! loop or OS hooks.
//!
//! [`HotkeyListener`]: crate::application::listener::HotkeyListener
//! [`HotkeyPress`]: crate::application::listener::HotkeyPress
//! [`HotkeyDetector`]: hopper_core::HotkeyDetector

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
