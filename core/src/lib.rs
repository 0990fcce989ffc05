//! speakfaster-core
//!
//! Keystroke-to-abbreviation state machine for AAC abbreviation expansion,
//! shared by front ends (the `speakfaster` client and CLI).
//!
//! No network code lives here. The machine emits request events and is fed
//! the responses; everything runs synchronously on the caller's thread.
//!
//! Public API:
//! - `InputBarStateMachine` - Top-level controller: modes, chips, events
//! - `AbbreviationTokenizer` / `AbbreviationSpec` - Head keywords + abbreviation proper
//! - `EraserSequenceBuilder` - Erase ops for raw typed characters
//! - `SpellingSession` - Letter-by-letter spelling of an abbreviation
//! - `KeySequenceTracker` / `InputBuffer` - Reconstruction deltas and a reference key source
//! - `ExpansionTracker` / `FillMaskTracker` - Outstanding request bookkeeping
//! - `Config` - Limits, triggers and timing
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod error;
pub use error::{AbbreviationError, ConfigError, ExpansionError, LimitViolation};

pub mod key_sequence;
pub use key_sequence::{key_sequence_ends_with, KeyEvent, KeySequenceTracker};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod eraser;
pub use eraser::{EraseOp, EraserSequence, EraserSequenceBuilder};

pub mod abbreviation;
pub use abbreviation::{
    AbbreviationLimits, AbbreviationSpec, AbbreviationToken, AbbreviationTokenizer,
    Compatibility, LineageId,
};

pub mod chip;
pub use chip::{Chip, ChipKind, ChipSet};

pub mod spelling;
pub use spelling::{LetterMatch, SpellingSession};

pub mod expansion;
pub use expansion::{
    ExpansionRequest, ExpansionResponse, ExpansionTracker, FillMaskRequest, FillMaskResponse,
    FillMaskTracker, LexiconRequest, RequestId, ResponseOutcome,
};

pub mod timer;
pub use timer::SettleTimer;

pub mod context;
pub use context::InputBarView;

pub mod input_bar;
pub use input_bar::{
    ChipRegistry, InputBarEvent, InputBarStateMachine, Mode, NoopChipRegistry, TextEntryEnd,
};

/// Configuration for the input bar.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes. Front ends embed this struct (see `ClientConfig` in the
/// `speakfaster` crate) rather than duplicating fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    // Tokenizer limits
    /// Maximum characters in the abbreviation proper
    pub max_abbreviation_proper_length: usize,
    /// Maximum verbatim words before the abbreviation proper
    pub max_head_keywords: usize,
    /// Maximum trimmed input length
    pub max_total_length: usize,

    /// Key sequences that trigger expansion when they end compatible text
    pub trigger_sequences: Vec<Vec<KeyEvent>>,

    /// Delay after selecting an option before the option list clears
    pub settle_delay_ms: u64,

    // Expansion request shaping
    /// Number of most recent conversation turns sent as context
    pub max_context_turns: usize,
    /// Each context turn keeps only its last N characters
    pub max_context_turn_length: usize,
    /// Abbreviations longer than this get `num_samples_long`
    pub long_abbreviation_threshold: usize,
    pub num_samples_short: u32,
    pub num_samples_long: u32,

    /// Cap on fill-mask replacements shown for a word chip
    pub max_replacement_tokens: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_abbreviation_proper_length: 10,
            max_head_keywords: 4,
            max_total_length: 50,
            // Double space or a single Enter
            trigger_sequences: vec![vec![KeyEvent::Space, KeyEvent::Space], vec![KeyEvent::Enter]],
            settle_delay_ms: 500,
            max_context_turns: 2,
            max_context_turn_length: 60,
            long_abbreviation_threshold: 5,
            num_samples_short: 128,
            num_samples_long: 256,
            max_replacement_tokens: 6,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    // ========== Limits ==========

    /// The tokenizer limits.
    pub fn limits(&self) -> AbbreviationLimits {
        AbbreviationLimits {
            max_proper_length: self.max_abbreviation_proper_length,
            max_head_keywords: self.max_head_keywords,
            max_total_length: self.max_total_length,
        }
    }

    pub fn set_limits(&mut self, limits: AbbreviationLimits) {
        self.max_abbreviation_proper_length = limits.max_proper_length;
        self.max_head_keywords = limits.max_head_keywords;
        self.max_total_length = limits.max_total_length;
    }

    // ========== Trigger Sequences ==========

    /// Replace the trigger sequences. Rejected (returns false) if any
    /// sequence is empty, since an empty suffix would match every key.
    pub fn set_trigger_sequences(&mut self, sequences: Vec<Vec<KeyEvent>>) -> bool {
        if sequences.iter().any(Vec::is_empty) {
            return false;
        }
        self.trigger_sequences = sequences;
        true
    }

    /// Add one trigger sequence. Empty and duplicate sequences are ignored.
    pub fn add_trigger_sequence(&mut self, sequence: Vec<KeyEvent>) -> bool {
        if sequence.is_empty() || self.trigger_sequences.contains(&sequence) {
            return false;
        }
        self.trigger_sequences.push(sequence);
        true
    }

    // ========== Timing ==========

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn set_settle_delay(&mut self, delay: Duration) {
        self.settle_delay_ms = delay.as_millis() as u64;
    }
}
