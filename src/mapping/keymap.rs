//! Symbolic key name registry
//!
//! Maps the key names RetroArch writes into `retroarch.cfg` (`"left"`,
//! `"kp_enter"`, `"f1"`, ...) to Linux input keycodes.
//!
//! # Supported Keys
//!
//! ## Letters
//! `a-z`
//!
//! ## Numbers
//! `num0-num9` (top row), `keypad0-keypad9` (numpad)
//!
//! ## Function Keys
//! `f1` through `f12`
//!
//! ## Modifiers
//! `shift`, `rshift`, `ctrl`, `rctrl`, `alt`, `ralt`
//!
//! ## Navigation
//! `up`, `down`, `left`, `right`, `home`, `end`, `pageup`, `pagedown`,
//! `insert`, `del`
//!
//! ## Special Keys
//! `enter`, `kp_enter`, `tab`, `space`, `escape`, `backspace`, `capslock`,
//! `numlock`, `scrolllock`, `pause`
//!
//! ## Punctuation
//! `period`, `comma`, `minus`, `slash`, `semicolon`, `equals`, `backslash`,
//! `backquote`, `kp_minus`, `kp_plus`, `kp_period`, `kp_equals`

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Linux input keycode (`KEY_*` from `input-event-codes.h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const fn code(self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY({})", self.0)
    }
}

/// Returned when a name has no entry in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported key: '{0}'")]
pub struct UnsupportedKey(pub String);

/// RetroArch key names and their keycodes.
#[rustfmt::skip]
const KEY_TABLE: &[(&str, u16)] = &[
    // Letters
    ("a", 30), ("b", 48), ("c", 46), ("d", 32), ("e", 18), ("f", 33),
    ("g", 34), ("h", 35), ("i", 23), ("j", 36), ("k", 37), ("l", 38),
    ("m", 50), ("n", 49), ("o", 24), ("p", 25), ("q", 16), ("r", 19),
    ("s", 31), ("t", 20), ("u", 22), ("v", 47), ("w", 17), ("x", 45),
    ("y", 21), ("z", 44),

    // Top row numbers
    ("num1", 2), ("num2", 3), ("num3", 4), ("num4", 5), ("num5", 6),
    ("num6", 7), ("num7", 8), ("num8", 9), ("num9", 10), ("num0", 11),

    // Function keys
    ("f1", 59), ("f2", 60), ("f3", 61), ("f4", 62), ("f5", 63), ("f6", 64),
    ("f7", 65), ("f8", 66), ("f9", 67), ("f10", 68), ("f11", 87), ("f12", 88),

    // Modifiers
    ("shift", 42), ("rshift", 54),
    ("ctrl", 29), ("rctrl", 97),
    ("alt", 56), ("ralt", 100),

    // Navigation
    ("up", 103), ("down", 108), ("left", 105), ("right", 106),
    ("home", 102), ("end", 107), ("pageup", 104), ("pagedown", 109),
    ("insert", 110), ("del", 111),

    // Special keys
    ("escape", 1), ("tab", 15), ("enter", 28), ("backspace", 14),
    ("space", 57), ("capslock", 58), ("numlock", 69), ("scrolllock", 70),
    ("pause", 119),

    // Punctuation
    ("minus", 12), ("equals", 13), ("semicolon", 39), ("backquote", 41),
    ("backslash", 43), ("comma", 51), ("period", 52), ("slash", 53),

    // Keypad
    ("keypad7", 71), ("keypad8", 72), ("keypad9", 73), ("kp_minus", 74),
    ("keypad4", 75), ("keypad5", 76), ("keypad6", 77), ("kp_plus", 78),
    ("keypad1", 79), ("keypad2", 80), ("keypad3", 81), ("keypad0", 82),
    ("kp_period", 83), ("kp_enter", 96), ("kp_equals", 117),
];

/// Immutable name -> keycode registry.
///
/// Built once at startup and handed to whoever needs to resolve names.
#[derive(Debug, Clone)]
pub struct KeyMap {
    by_name: BTreeMap<&'static str, KeyCode>,
    by_code: BTreeMap<KeyCode, &'static str>,
}

impl KeyMap {
    pub fn new() -> Self {
        let mut by_name = BTreeMap::new();
        let mut by_code = BTreeMap::new();
        for &(name, code) in KEY_TABLE {
            by_name.insert(name, KeyCode(code));
            by_code.insert(KeyCode(code), name);
        }
        Self { by_name, by_code }
    }

    /// Resolve a RetroArch key name. Names are case-sensitive.
    pub fn resolve(&self, name: &str) -> Result<KeyCode, UnsupportedKey> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| UnsupportedKey(name.to_string()))
    }

    /// Reverse lookup.
    pub fn name_of(&self, code: KeyCode) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }

    /// All supported names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}
