//! Windows Virtual Key code table for hotkey keys and modifiers.
//!
//! Windows VK codes are defined in `WinUser.h`.  A low-level keyboard hook
//! reports the side-specific modifier codes (`VK_LCONTROL`, `VK_RSHIFT`, …)
//! while `SendInput` and some remapping tools produce the generic ones
//! (`VK_CONTROL`, `VK_SHIFT`, `VK_MENU`), so both are recognised.
//!
//! Reference: <https://learn.microsoft.com/en-us/windows/win32/inputdev/virtual-key-codes>

use super::combo::{Key, Modifier};

pub const VK_TAB: u8 = 0x09;
pub const VK_RETURN: u8 = 0x0D;
pub const VK_SHIFT: u8 = 0x10;
pub const VK_CONTROL: u8 = 0x11;
pub const VK_MENU: u8 = 0x12;
pub const VK_ESCAPE: u8 = 0x1B;
pub const VK_SPACE: u8 = 0x20;
pub const VK_PRIOR: u8 = 0x21;
pub const VK_NEXT: u8 = 0x22;
pub const VK_END: u8 = 0x23;
pub const VK_HOME: u8 = 0x24;
pub const VK_INSERT: u8 = 0x2D;
pub const VK_DELETE: u8 = 0x2E;
pub const VK_0: u8 = 0x30;
pub const VK_A: u8 = 0x41;
pub const VK_LWIN: u8 = 0x5B;
pub const VK_RWIN: u8 = 0x5C;
pub const VK_F1: u8 = 0x70;
pub const VK_LSHIFT: u8 = 0xA0;
pub const VK_RSHIFT: u8 = 0xA1;
pub const VK_LCONTROL: u8 = 0xA2;
pub const VK_RCONTROL: u8 = 0xA3;
pub const VK_LMENU: u8 = 0xA4;
pub const VK_RMENU: u8 = 0xA5;

/// Maps a hotkey main key to its Windows VK code.
pub fn key_to_vk(key: Key) -> u8 {
    match key {
        Key::F(n) => VK_F1 + (n.clamp(1, 12) - 1),
        Key::Letter(c) => VK_A + (c.to_ascii_uppercase() as u8).saturating_sub(b'A'),
        Key::Digit(d) => VK_0 + d.min(9),
        Key::Space => VK_SPACE,
        Key::Tab => VK_TAB,
        Key::Enter => VK_RETURN,
        Key::Escape => VK_ESCAPE,
        Key::Delete => VK_DELETE,
        Key::Insert => VK_INSERT,
        Key::Home => VK_HOME,
        Key::End => VK_END,
        Key::PageUp => VK_PRIOR,
        Key::PageDown => VK_NEXT,
    }
}

/// Returns the modifier a VK code belongs to, if any.
pub fn vk_to_modifier(vk: u8) -> Option<Modifier> {
    match vk {
        VK_CONTROL | VK_LCONTROL | VK_RCONTROL => Some(Modifier::Ctrl),
        VK_MENU | VK_LMENU | VK_RMENU => Some(Modifier::Alt),
        VK_SHIFT | VK_LSHIFT | VK_RSHIFT => Some(Modifier::Shift),
        VK_LWIN | VK_RWIN => Some(Modifier::Win),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
