//! Customizable label hotkeys.
//!
//! Defines which key cycles through labels and which keys jump straight to a
//! label by position. Bindings are persisted through [`crate::config`].

use crate::constants::MAX_LABEL_HOTKEYS;
use crate::event::Key;

/// Keybinding configuration for label selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Hotkey that advances to the next label
    pub cycle_label: Key,

    /// Hotkeys for label selection (indices 0-9 map to labels 1-10)
    /// None means no hotkey assigned for that slot
    pub label_hotkeys: [Option<Key>; MAX_LABEL_HOTKEYS],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            cycle_label: Key::Char('q'),

            // 0 sits after 9 on the keyboard, so it selects the tenth label.
            label_hotkeys: [
                Some(Key::Char('1')),
                Some(Key::Char('2')),
                Some(Key::Char('3')),
                Some(Key::Char('4')),
                Some(Key::Char('5')),
                Some(Key::Char('6')),
                Some(Key::Char('7')),
                Some(Key::Char('8')),
                Some(Key::Char('9')),
                Some(Key::Char('0')),
            ],
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is the cycle hotkey. Character keys compare case-insensitively.
    pub fn is_cycle_key(&self, key: Key) -> bool {
        key.to_lowercase() == self.cycle_label.to_lowercase()
    }

    /// Get the label index (0-based) that corresponds to a key press, if any.
    pub fn label_index_for_key(&self, key: Key) -> Option<usize> {
        let key = key.to_lowercase();
        self.label_hotkeys
            .iter()
            .position(|hotkey| hotkey.map(Key::to_lowercase) == Some(key))
    }

    /// Get the hotkey for a label at a specific index, if any.
    pub fn key_for_label_index(&self, index: usize) -> Option<Key> {
        self.label_hotkeys.get(index).copied().flatten()
    }

    /// Set the hotkey for a label index.
    pub fn set_label_key(&mut self, index: usize, key: Option<Key>) {
        if index < MAX_LABEL_HOTKEYS {
            self.label_hotkeys[index] = key;
        }
    }

    /// Check if a key is already used by any binding.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: Key) -> Option<String> {
        if self.is_cycle_key(key) {
            return Some("Next label".to_string());
        }
        self.label_index_for_key(key)
            .map(|i| format!("Label {}", i + 1))
    }
}

/// Convert a key to a display string.
pub fn key_to_string(key: Key) -> String {
    match key {
        Key::Char(c) => c.to_uppercase().collect(),
        Key::Enter => "Enter".to_string(),
        Key::Escape => "Esc".to_string(),
        Key::Backspace => "Backspace".to_string(),
        Key::Delete => "Delete".to_string(),
        Key::Tab => "Tab".to_string(),
        Key::Space => "Space".to_string(),
        Key::Control => "Ctrl".to_string(),
        Key::Meta => "Cmd".to_string(),
        Key::Shift => "Shift".to_string(),
        Key::Alt => "Alt".to_string(),
        Key::Other => "?".to_string(),
    }
}
