//! Letter-by-letter spelling of an abbreviation.
//!
//! Each character of the abbreviation proper becomes a letter chip. The user
//! picks a chip (by typing its letter, or by clicking when the letter is
//! duplicated) and spells the full word it stands for. Spelled chips become
//! keyword tokens; runs of unspelled chips stay abbreviated.

use crate::abbreviation::AbbreviationToken;
use crate::chip::{Chip, ChipSet};

/// Outcome of matching a typed letter against the unspelled chips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterMatch {
    Unique(usize),
    /// Several unspelled chips carry the letter; needs an explicit click.
    Ambiguous(Vec<usize>),
    NoMatch,
}

/// Spelling state for one abbreviation. Survives several emissions: chips
/// spelled earlier keep their overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingSession {
    head_keywords: Vec<String>,
    chips: ChipSet,
    focused: Option<usize>,
}

impl SpellingSession {
    /// One chip per character of `abbreviation`. `head_keywords` are
    /// re-emitted verbatim in front of the chips.
    pub fn start(abbreviation: &str, head_keywords: Vec<String>, generation: u64) -> Self {
        Self {
            head_keywords,
            chips: ChipSet::letters(abbreviation, generation),
            focused: None,
        }
    }

    pub fn chips(&self) -> &ChipSet {
        &self.chips
    }

    pub fn chip_slice(&self) -> &[Chip] {
        self.chips.as_slice()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn head_keywords(&self) -> &[String] {
        &self.head_keywords
    }

    /// Compare `letter` case-insensitively with every unspelled chip.
    pub fn match_letter(&self, letter: char) -> LetterMatch {
        let wanted: Vec<char> = letter.to_lowercase().collect();
        let hits: Vec<usize> = self
            .chips
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, chip)| {
                !chip.is_spelled && chip.text.to_lowercase().chars().eq(wanted.iter().copied())
            })
            .map(|(i, _)| i)
            .collect();
        match hits.len() {
            0 => LetterMatch::NoMatch,
            1 => LetterMatch::Unique(hits[0]),
            _ => LetterMatch::Ambiguous(hits),
        }
    }

    /// Focus the chip uniquely matching `letter` and seed its override with
    /// the letter. Ambiguous or unrelated letters change nothing.
    pub fn choose_by_letter(&mut self, letter: char) -> Option<usize> {
        match self.match_letter(letter) {
            LetterMatch::Unique(index) => {
                self.focused = Some(index);
                self.chips.set_override(index, Some(letter.to_string()));
                Some(index)
            }
            LetterMatch::Ambiguous(indices) => {
                tracing::debug!(?indices, %letter, "ambiguous letter ignored");
                None
            }
            LetterMatch::NoMatch => {
                tracing::debug!(%letter, "letter matches no unspelled chip");
                None
            }
        }
    }

    /// Focus a chip directly, bypassing ambiguity detection.
    pub fn focus(&mut self, index: usize) -> bool {
        if index >= self.chips.len() {
            return false;
        }
        self.focused = Some(index);
        true
    }

    pub fn unfocus(&mut self) {
        self.focused = None;
    }

    /// Replace the focused chip's override with `spelled`; empty text marks
    /// the chip unspelled again.
    pub fn update_focused(&mut self, spelled: &str) {
        let Some(index) = self.focused else {
            return;
        };
        let text = (!spelled.is_empty()).then(|| spelled.to_string());
        self.chips.set_override(index, text);
    }

    /// Show a partial word on a chip, e.g. a prefix carried over from word
    /// refinement. The chip stays unspelled until a word is committed on it.
    pub fn seed(&mut self, index: usize, text: &str) -> bool {
        self.chips.set_hint(index, text.to_string())
    }

    pub fn focused_override(&self) -> Option<&str> {
        self.focused
            .and_then(|i| self.chips.get(i))
            .and_then(|chip| chip.override_text.as_deref())
    }

    /// Tokens for the current composite of spelled and unspelled chips.
    pub fn tokens(&self) -> Vec<AbbreviationToken> {
        let mut tokens: Vec<AbbreviationToken> = self
            .head_keywords
            .iter()
            .map(|k| AbbreviationToken::keyword(k.as_str()))
            .collect();
        let mut pending = String::new();
        for chip in self.chips.as_slice() {
            match chip.override_text.as_deref().map(str::trim) {
                Some(word) if chip.is_spelled && !word.is_empty() => {
                    if !pending.is_empty() {
                        tokens.push(AbbreviationToken::abbreviated(std::mem::take(&mut pending)));
                    }
                    tokens.push(AbbreviationToken::keyword(word));
                }
                _ => pending.push_str(&chip.text),
            }
        }
        if !pending.is_empty() {
            tokens.push(AbbreviationToken::abbreviated(pending));
        }
        tokens
    }
}
