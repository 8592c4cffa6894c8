//! Windows low-level keyboard hook listener.
//!
//! Installs `WH_KEYBOARD_LL` on a dedicated Win32 message-loop thread.  Key
//! events are fed to a [`HotkeyDetector`]; each detected press is sent on the
//! channel returned by [`HotkeyListener::start`].  Keys are never swallowed:
//! every event is forwarded with `CallNextHookEx`.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use hopper_core::{Hotkey, HotkeyDetector};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG,
    WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use crate::application::listener::{HotkeyListener, HotkeyPress, ListenerError};

/// State shared with the hook callback, which cannot capture anything.
struct HookState {
    detector: HotkeyDetector,
    sender: Sender<HotkeyPress>,
}

/// Only one hook may be installed per process.
static HOOK_STATE: Mutex<Option<HookState>> = parking_lot::const_mutex(None);

struct HookThread {
    thread_id: u32,
    handle: JoinHandle<()>,
}

/// Windows global hotkey listener built on a low-level keyboard hook.
pub struct WindowsHotkeyListener {
    hook_thread: Mutex<Option<HookThread>>,
}

impl WindowsHotkeyListener {
    /// Creates a new (unstarted) listener.
    pub fn new() -> Self {
        Self {
            hook_thread: Mutex::new(None),
        }
    }
}

impl Default for WindowsHotkeyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyListener for WindowsHotkeyListener {
    fn start(&self, hotkey: &Hotkey) -> Result<mpsc::Receiver<HotkeyPress>, ListenerError> {
        let mut slot = self.hook_thread.lock();
        if slot.is_some() {
            return Err(ListenerError::AlreadyRunning);
        }

        let (tx, rx) = mpsc::channel::<HotkeyPress>();
        {
            let mut state = HOOK_STATE.lock();
            if state.is_some() {
                return Err(ListenerError::AlreadyRunning);
            }
            *state = Some(HookState {
                detector: HotkeyDetector::new(hotkey.clone()),
                sender: tx,
            });
        }

        // The hook thread reports its id once the hook is installed, or the
        // installation error.
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<u32, String>>(1);
        let handle = thread::Builder::new()
            .name("hopper-hotkey".to_string())
            .spawn(move || run_hook_message_loop(ready_tx))
            .map_err(|e| {
                *HOOK_STATE.lock() = None;
                ListenerError::ThreadSpawnFailed(e.to_string())
            })?;

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                info!(%hotkey, "keyboard hook installed");
                *slot = Some(HookThread { thread_id, handle });
                Ok(rx)
            }
            Ok(Err(reason)) => {
                let _ = handle.join();
                *HOOK_STATE.lock() = None;
                Err(ListenerError::HookInstallFailed(reason))
            }
            Err(_) => {
                let _ = handle.join();
                *HOOK_STATE.lock() = None;
                Err(ListenerError::HookInstallFailed(
                    "hook thread exited before reporting".to_string(),
                ))
            }
        }
    }

    fn stop(&self) {
        let Some(hook_thread) = self.hook_thread.lock().take() else {
            return;
        };

        // SAFETY: Posting to a thread id obtained from the hook thread itself.
        // WM_QUIT makes its GetMessageW loop return 0.
        let posted = unsafe {
            PostThreadMessageW(hook_thread.thread_id, WM_QUIT, WPARAM(0), LPARAM(0))
        };
        if let Err(e) = posted {
            warn!("PostThreadMessageW(WM_QUIT) failed: {}", e.message());
        }
        if hook_thread.handle.join().is_err() {
            warn!("keyboard hook thread panicked");
        }

        // Dropping the sender closes the channel for the consumer.
        *HOOK_STATE.lock() = None;
        info!("keyboard hook removed");
    }
}

impl Drop for WindowsHotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop(ready: mpsc::SyncSender<Result<u32, String>>) {
    // SAFETY: A null module name returns the handle of the current executable.
    let module = match unsafe { GetModuleHandleW(PCWSTR::null()) } {
        Ok(module) => HINSTANCE(module.0),
        Err(e) => {
            let _ = ready.send(Err(format!("GetModuleHandleW failed: {}", e.message())));
            return;
        }
    };

    // SAFETY: SetWindowsHookExW requires the calling thread to have a message
    // loop, which this thread runs below until WM_QUIT.
    let hook: HHOOK = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), module, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(e.message()));
            return;
        }
    };

    // SAFETY: No arguments; always succeeds.
    let thread_id = unsafe { GetCurrentThreadId() };
    let _ = ready.send(Ok(thread_id));

    let mut msg = MSG::default();
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        if let Err(e) = UnhookWindowsHookEx(hook) {
            warn!("UnhookWindowsHookEx failed: {}", e.message());
        }
    }
    debug!("keyboard hook message loop exited");
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows from the hook message loop thread.  It must return
/// quickly (< ~300ms) to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(n_code: i32, w_param: WPARAM, l_param: LPARAM) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
        let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
        let vk = kbs.vkCode as u8;

        if let Some(state) = HOOK_STATE.lock().as_mut() {
            match w_param.0 as u32 {
                WM_KEYDOWN | WM_SYSKEYDOWN => {
                    if state.detector.on_key_down(vk) {
                        // Ignore send errors (channel closed during shutdown).
                        let _ = state.sender.send(HotkeyPress::now());
                    }
                }
                WM_KEYUP | WM_SYSKEYUP => state.detector.on_key_up(vk),
                _ => {}
            }
        }
    }

    // SAFETY: Forward every event to the next hook in the chain.
    CallNextHookEx(HHOOK::default(), n_code, w_param, l_param)
}
