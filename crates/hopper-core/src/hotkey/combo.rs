//! Parsing and validation of hotkey strings such as `"Ctrl+Alt+F9"`.
//!
//! # Grammar
//!
//! ```text
//! hotkey   = { modifier "+" } key
//! modifier = "Ctrl" | "Control" | "Alt" | "Shift" | "Win" | "Cmd" | "Super"
//! key      = "F1" … "F12" | "A" … "Z" | "0" … "9"
//!          | "Space" | "Tab" | "Enter" | "Return" | "Esc" | "Escape"
//!          | "Delete" | "Del" | "Insert" | "Ins" | "Home" | "End"
//!          | "PageUp" | "PageDown"
//! ```
//!
//! Tokens are case-insensitive and may be padded with spaces.  Exactly one
//! non-modifier key is required and a modifier may appear only once.  The
//! modifiers may come in any order; [`Hotkey`]'s `Display` renders them in
//! the canonical order `Ctrl+Alt+Shift+Win`.

use std::fmt;
use std::str::FromStr;

use super::HotkeyError;

/// A modifier key.  Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Win,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Win];

    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "win" | "cmd" | "super" => Some(Modifier::Win),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Win => "Win",
        }
    }
}

/// The main (non-modifier) key of a hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `F1` … `F12`; the payload is the function key number.
    F(u8),
    /// `A` … `Z`, stored upper-case.
    Letter(char),
    /// `0` … `9`; the payload is the digit value.
    Digit(u8),
    Space,
    Tab,
    Enter,
    Escape,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Key {
    fn parse(token: &str) -> Option<Self> {
        let lower = token.to_ascii_lowercase();
        let named = match lower.as_str() {
            "space" => Some(Key::Space),
            "tab" => Some(Key::Tab),
            "enter" | "return" => Some(Key::Enter),
            "esc" | "escape" => Some(Key::Escape),
            "delete" | "del" => Some(Key::Delete),
            "insert" | "ins" => Some(Key::Insert),
            "home" => Some(Key::Home),
            "end" => Some(Key::End),
            "pageup" | "pgup" => Some(Key::PageUp),
            "pagedown" | "pgdn" => Some(Key::PageDown),
            _ => None,
        };
        if named.is_some() {
            return named;
        }

        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                return Some(Key::Letter(c.to_ascii_uppercase()));
            }
            if let Some(digit) = c.to_digit(10) {
                return Some(Key::Digit(digit as u8));
            }
            return None;
        }

        let number = lower.strip_prefix('f')?;
        match number.parse::<u8>() {
            Ok(n) if (1..=12).contains(&n) && !number.starts_with('0') => Some(Key::F(n)),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::F(n) => write!(f, "F{n}"),
            Key::Letter(c) => write!(f, "{c}"),
            Key::Digit(d) => write!(f, "{d}"),
            Key::Space => f.write_str("Space"),
            Key::Tab => f.write_str("Tab"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Esc"),
            Key::Delete => f.write_str("Delete"),
            Key::Insert => f.write_str("Insert"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::PageUp => f.write_str("PageUp"),
            Key::PageDown => f.write_str("PageDown"),
        }
    }
}

/// A validated key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    /// Held modifiers, sorted and free of duplicates.
    modifiers: Vec<Modifier>,
    key: Key,
}

impl Hotkey {
    /// Builds a hotkey from parts.
    ///
    /// # Errors
    ///
    /// Returns [`HotkeyError::DuplicateModifier`] if a modifier repeats.
    pub fn new(modifiers: &[Modifier], key: Key) -> Result<Self, HotkeyError> {
        let mut sorted = modifiers.to_vec();
        sorted.sort();
        for pair in sorted.windows(2) {
            if pair[0] == pair[1] {
                return Err(HotkeyError::DuplicateModifier(pair[0].as_str().to_string()));
            }
        }
        Ok(Self {
            modifiers: sorted,
            key,
        })
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for Hotkey {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(HotkeyError::Empty);
        }

        let mut modifiers: Vec<Modifier> = Vec::new();
        let mut key: Option<Key> = None;

        for raw in trimmed.split('+') {
            let token = raw.trim();
            if token.is_empty() {
                return Err(HotkeyError::EmptyToken(s.to_string()));
            }
            if let Some(modifier) = Modifier::parse(token) {
                if modifiers.contains(&modifier) {
                    return Err(HotkeyError::DuplicateModifier(modifier.as_str().to_string()));
                }
                modifiers.push(modifier);
                continue;
            }
            let parsed = Key::parse(token).ok_or_else(|| HotkeyError::UnknownKey(token.to_string()))?;
            if let Some(existing) = key {
                return Err(HotkeyError::MultipleKeys(existing.to_string(), parsed.to_string()));
            }
            key = Some(parsed);
        }

        let key = key.ok_or(HotkeyError::MissingKey)?;
        Hotkey::new(&modifiers, key)
    }
}

/// Validates a user-supplied hotkey string.
///
/// `Ok` carries the parsed combination; `Err` carries a message suitable for
/// showing to the user.
pub fn validate_hotkey(input: &str) -> Result<Hotkey, HotkeyError> {
    input.parse()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
