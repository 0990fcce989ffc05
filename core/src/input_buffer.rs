//! Reference keystroke source.
//!
//! The input buffer records every physical key in order and keeps the text a
//! plain text field would show after those keys. It produces exactly the
//! `(keys, reconstructed_text)` pair the input bar expects from the global
//! keystroke hook, which makes it the driver for tests and script replay.

use crate::key_sequence::KeyEvent;

/// Append-only key log plus its textual reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    keys: Vec<KeyEvent>,
    text: String,
}

impl InputBuffer {
    /// Create a new empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys pressed so far, oldest first.
    pub fn keys(&self) -> &[KeyEvent] {
        &self.keys
    }

    /// The reconstructed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of keys recorded.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no key has been recorded.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Record one key and return the full log with the new reconstruction.
    pub fn press(&mut self, key: KeyEvent) -> (&[KeyEvent], &str) {
        match key.as_char() {
            Some(ch) => self.text.push(ch),
            None => {
                self.text.pop();
            }
        }
        self.keys.push(key);
        (&self.keys, &self.text)
    }

    /// Keys that would type `text`, one per character.
    pub fn keys_for(text: &str) -> Vec<KeyEvent> {
        text.chars().map(KeyEvent::from_char).collect()
    }

    /// Clear the log and the reconstruction.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let buffer = InputBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_press_appends_and_erases() {
        let mut buffer = InputBuffer::new();
        buffer.press(KeyEvent::Char('b'));
        buffer.press(KeyEvent::Char('a'));
        let (keys, text) = buffer.press(KeyEvent::Backspace);
        assert_eq!(text, "b");
        assert_eq!(keys.len(), 3);

        let (_, text) = buffer.press(KeyEvent::Char('c'));
        assert_eq!(text, "bc");
    }

    #[test]
    fn test_space_and_enter() {
        let mut buffer = InputBuffer::new();
        for key in InputBuffer::keys_for("xy \n") {
            buffer.press(key);
        }
        assert_eq!(buffer.text(), "xy \n");
        assert_eq!(buffer.keys()[2], KeyEvent::Space);
        assert_eq!(buffer.keys()[3], KeyEvent::Enter);
    }

    #[test]
    fn test_backspace_on_empty() {
        let mut buffer = InputBuffer::new();
        let (keys, text) = buffer.press(KeyEvent::Backspace);
        assert_eq!(text, "");
        assert_eq!(keys, &[KeyEvent::Backspace]);
    }

    #[test]
    fn test_clear() {
        let mut buffer = InputBuffer::new();
        buffer.press(KeyEvent::Char('a'));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.text(), "");
    }
}
