//! Eraser sequences.
//!
//! Before expanded text is inserted, the host has to remove what the user
//! physically typed during the cycle. The eraser sequence is one erase
//! operation per raw character, independent of how the text was tokenized
//! or which characters spelling later reassigned to chips.

use serde::{Deserialize, Serialize};

use crate::key_sequence::KeyEvent;

/// One "remove the previous character" operation in the host view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EraseOp;

/// An ordered run of erase operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EraserSequence {
    len: usize,
}

impl EraserSequence {
    pub fn with_len(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = EraseOp> {
        std::iter::repeat(EraseOp).take(self.len)
    }

    /// The erase operations as backspace key presses for the host.
    pub fn to_key_events(&self) -> Vec<KeyEvent> {
        vec![KeyEvent::Backspace; self.len]
    }
}

/// Accumulates raw typed text into an eraser sequence.
#[derive(Debug, Clone, Default)]
pub struct EraserSequenceBuilder {
    ops: usize,
}

impl EraserSequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one erase operation per character of `raw`.
    pub fn extend(mut self, raw: &str) -> Self {
        self.ops += raw.chars().count();
        self
    }

    pub fn build(&self) -> EraserSequence {
        EraserSequence::with_len(self.ops)
    }
}
