//! Key events and baseline tracking over the keystroke source's reconstruction.
//!
//! The keystroke source delivers the complete ordered key log together with
//! the text a consumer of those keys would currently display. The tracker
//! never re-derives that text. It only remembers two offsets into it:
//!
//! - the *baseline*: everything before it belongs to an earlier sub-mode
//!   (text typed before a cut, the letter that selected a spelling chip, ...)
//! - the *cycle start*: everything after it was typed during the current
//!   expansion cycle and must be erased from the host view on expansion.

use serde::{Deserialize, Serialize};

/// A single physical key as reported by the keystroke source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEvent {
    /// Printable character
    Char(char),
    /// Space bar
    Space,
    /// Enter/Return
    Enter,
    /// Backspace
    Backspace,
}

impl KeyEvent {
    /// Map a reconstructed character back to the key that produces it.
    pub fn from_char(ch: char) -> Self {
        match ch {
            ' ' => KeyEvent::Space,
            '\n' | '\r' => KeyEvent::Enter,
            '\u{8}' => KeyEvent::Backspace,
            other => KeyEvent::Char(other),
        }
    }

    /// Text this key appends to a plain text field, if any.
    pub fn as_char(&self) -> Option<char> {
        match self {
            KeyEvent::Char(ch) => Some(*ch),
            KeyEvent::Space => Some(' '),
            KeyEvent::Enter => Some('\n'),
            KeyEvent::Backspace => None,
        }
    }

    /// SPACE or ENTER: the keys that commit a spelled word.
    pub fn is_commit(&self) -> bool {
        matches!(self, KeyEvent::Space | KeyEvent::Enter)
    }

    /// Parse the names used in config files and replay scripts.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "space" => Some(KeyEvent::Space),
            "enter" | "return" => Some(KeyEvent::Enter),
            "backspace" => Some(KeyEvent::Backspace),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Some(KeyEvent::from_char(ch)),
                    _ => None,
                }
            }
        }
    }
}

/// Whether `keys` ends with the non-empty `suffix`.
pub fn key_sequence_ends_with(keys: &[KeyEvent], suffix: &[KeyEvent]) -> bool {
    !suffix.is_empty() && keys.ends_with(suffix)
}

/// Tracks the suffix of the latest reconstruction relative to a baseline.
///
/// Offsets are counted in chars, so multi-byte input never splits a
/// character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySequenceTracker {
    latest: String,
    base_chars: usize,
    cycle_start_chars: usize,
}

impl KeySequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reconstruction delivered with the newest key.
    pub fn observe(&mut self, reconstructed: &str) {
        self.latest.clear();
        self.latest.push_str(reconstructed);
        let len = self.latest_chars();
        if len < self.base_chars {
            // Tolerated: seen transiently across mode switches.
            tracing::debug!(
                len,
                base = self.base_chars,
                "reconstruction shorter than baseline; treating delta as empty"
            );
        }
    }

    /// The latest full reconstruction.
    pub fn latest(&self) -> &str {
        &self.latest
    }

    fn latest_chars(&self) -> usize {
        self.latest.chars().count()
    }

    fn suffix_from(&self, chars: usize) -> &str {
        match self.latest.char_indices().nth(chars) {
            Some((idx, _)) => &self.latest[idx..],
            None => "",
        }
    }

    /// Text typed since the baseline. Empty, never negative, when the
    /// reconstruction is shorter than the baseline.
    pub fn delta(&self) -> &str {
        self.suffix_from(self.base_chars)
    }

    /// Text typed since the current expansion cycle started.
    pub fn cycle_text(&self) -> &str {
        self.suffix_from(self.cycle_start_chars)
    }

    /// Last character of the latest reconstruction.
    pub fn last_char(&self) -> Option<char> {
        self.latest.chars().next_back()
    }

    /// Baseline offset in chars.
    pub fn base_len(&self) -> usize {
        self.base_chars
    }

    /// Move the baseline to the end of the latest reconstruction.
    pub fn rebase(&mut self) {
        self.base_chars = self.latest_chars();
    }

    /// Move the baseline to just before the last reconstructed character, so
    /// that character becomes the first character of the delta.
    pub fn rebase_excluding_last(&mut self) {
        self.base_chars = self.latest_chars().saturating_sub(1);
    }

    /// Start a new expansion cycle at the end of the latest reconstruction.
    pub fn start_cycle(&mut self) {
        self.rebase();
        self.cycle_start_chars = self.base_chars;
    }
}
