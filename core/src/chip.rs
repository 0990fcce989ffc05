//! Chips: independently editable units of text shown during refinement.
//!
//! A chip set is one *generation* of chips. Readers get a shared handle to
//! the chip slice; writing to a generation after it has been read clones it
//! first, so a snapshot the host is still rendering never changes under it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a chip stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipKind {
    /// One letter of an abbreviation (spelling)
    Letter,
    /// One word of a returned expansion (refinement)
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chip {
    pub text: String,
    pub is_spelled: bool,
    pub override_text: Option<String>,
}

impl Chip {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            is_spelled: false,
            override_text: None,
        }
    }

    /// Override if present, original text otherwise.
    pub fn display_text(&self) -> &str {
        self.override_text.as_deref().unwrap_or(&self.text)
    }
}

/// One generation of chips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipSet {
    kind: ChipKind,
    generation: u64,
    chips: Arc<Vec<Chip>>,
}

impl ChipSet {
    /// One letter chip per character of `abbreviation`.
    pub fn letters(abbreviation: &str, generation: u64) -> Self {
        Self {
            kind: ChipKind::Letter,
            generation,
            chips: Arc::new(abbreviation.chars().map(Chip::new).collect()),
        }
    }

    /// One word chip per entry of `words`.
    pub fn words<I, S>(words: I, generation: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ChipKind::Word,
            generation,
            chips: Arc::new(words.into_iter().map(Chip::new).collect()),
        }
    }

    pub fn kind(&self) -> ChipKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chip> {
        self.chips.get(index)
    }

    pub fn as_slice(&self) -> &[Chip] {
        &self.chips
    }

    /// Shared handle to this generation for the view layer.
    pub fn snapshot(&self) -> Arc<Vec<Chip>> {
        Arc::clone(&self.chips)
    }

    /// Display texts, overrides applied.
    pub fn display_texts(&self) -> Vec<String> {
        self.chips.iter().map(|c| c.display_text().to_string()).collect()
    }

    /// Set or clear the override of one chip. Returns false when `index` is
    /// out of range.
    pub fn set_override(&mut self, index: usize, text: Option<String>) -> bool {
        if index >= self.chips.len() {
            return false;
        }
        let chips = Arc::make_mut(&mut self.chips);
        let chip = &mut chips[index];
        chip.is_spelled = text.is_some();
        chip.override_text = text;
        true
    }

    /// Show `text` on a chip without marking it spelled.
    pub fn set_hint(&mut self, index: usize, text: String) -> bool {
        if index >= self.chips.len() {
            return false;
        }
        let chip = &mut Arc::make_mut(&mut self.chips)[index];
        chip.is_spelled = false;
        chip.override_text = Some(text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        let chips = ChipSet::letters("abc", 1);
        assert_eq!(chips.kind(), ChipKind::Letter);
        assert_eq!(chips.len(), 3);
        assert_eq!(chips.get(1).unwrap().text, "b");
        assert_eq!(chips.generation(), 1);
    }

    #[test]
    fn test_words() {
        let chips = ChipSet::words(["i", "feel", "great"], 2);
        assert_eq!(chips.kind(), ChipKind::Word);
        assert_eq!(chips.display_texts(), vec!["i", "feel", "great"]);
    }

    #[test]
    fn test_override_marks_spelled() {
        let mut chips = ChipSet::letters("abc", 0);
        assert!(chips.set_override(1, Some("bit".to_string())));
        let chip = chips.get(1).unwrap();
        assert!(chip.is_spelled);
        assert_eq!(chip.display_text(), "bit");
        assert_eq!(chip.text, "b");

        assert!(chips.set_override(1, None));
        assert!(!chips.get(1).unwrap().is_spelled);
        assert!(!chips.set_override(3, None));
    }

    #[test]
    fn test_hint_is_displayed_but_not_spelled() {
        let mut chips = ChipSet::letters("ifg", 0);
        assert!(chips.set_hint(2, "gr".to_string()));
        let chip = chips.get(2).unwrap();
        assert_eq!(chip.display_text(), "gr");
        assert!(!chip.is_spelled);
        assert!(!chips.set_hint(3, "x".to_string()));
    }

    #[test]
    fn test_snapshot_is_not_aliased_by_later_writes() {
        let mut chips = ChipSet::words(["i", "feel"], 0);
        let snapshot = chips.snapshot();
        chips.set_override(1, Some("felt".to_string()));

        assert_eq!(snapshot[1].display_text(), "feel");
        assert_eq!(chips.get(1).unwrap().display_text(), "felt");
    }
}
