//! Turns a raw stream of key-down / key-up events into hotkey presses.
//!
//! The detector is fed Windows VK codes in the order the keyboard hook sees
//! them.  It reports a press when the main key goes down while exactly the
//! configured modifiers are held.  Auto-repeat key-downs are ignored until
//! the main key has been released, so holding the hotkey fires once.

use std::collections::HashSet;

use super::combo::{Hotkey, Modifier};
use super::windows_vk::{key_to_vk, vk_to_modifier};

#[derive(Debug, Clone)]
pub struct HotkeyDetector {
    hotkey: Hotkey,
    main_vk: u8,
    /// Modifier VK codes currently down.  Left and right are tracked
    /// separately so releasing one side does not drop the modifier.
    held_modifiers: HashSet<u8>,
    main_down: bool,
}

impl HotkeyDetector {
    pub fn new(hotkey: Hotkey) -> Self {
        let main_vk = key_to_vk(hotkey.key());
        Self {
            hotkey,
            main_vk,
            held_modifiers: HashSet::new(),
            main_down: false,
        }
    }

    pub fn hotkey(&self) -> &Hotkey {
        &self.hotkey
    }

    /// Processes a key-down.  Returns `true` exactly once per press.
    pub fn on_key_down(&mut self, vk: u8) -> bool {
        if vk_to_modifier(vk).is_some() {
            self.held_modifiers.insert(vk);
            return false;
        }
        if vk != self.main_vk {
            return false;
        }
        if self.main_down {
            return false;
        }
        self.main_down = true;
        self.modifiers_match()
    }

    pub fn on_key_up(&mut self, vk: u8) {
        if vk_to_modifier(vk).is_some() {
            self.held_modifiers.remove(&vk);
        } else if vk == self.main_vk {
            self.main_down = false;
        }
    }

    /// Forgets all held keys, e.g. after the hook was re-installed.
    pub fn reset(&mut self) {
        self.held_modifiers.clear();
        self.main_down = false;
    }

    fn modifiers_match(&self) -> bool {
        Modifier::ALL.iter().all(|modifier| {
            let held = self
                .held_modifiers
                .iter()
                .any(|vk| vk_to_modifier(*vk) == Some(*modifier));
            held == self.hotkey.has_modifier(*modifier)
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
