//! The input bar: top-level controller turning keystrokes into abbreviation
//! specs and driving the spelling and word-refinement sub-modes.
//!
//! Everything runs synchronously on the caller's thread. Side effects are
//! events queued in FIFO order (drained with [`InputBarStateMachine::take_events`])
//! and the chip notifications sent to the [`ChipRegistry`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, warn};

use crate::abbreviation::{AbbreviationSpec, AbbreviationTokenizer, Compatibility, LineageId};
use crate::chip::{Chip, ChipSet};
use crate::context::InputBarView;
use crate::eraser::{EraserSequence, EraserSequenceBuilder};
use crate::error::{AbbreviationError, ExpansionError};
use crate::expansion::{
    ExpansionRequest, ExpansionResponse, ExpansionTracker, FillMaskRequest, FillMaskResponse,
    FillMaskTracker, LexiconRequest, RequestId, ResponseOutcome,
};
use crate::key_sequence::{key_sequence_ends_with, KeyEvent, KeySequenceTracker};
use crate::spelling::SpellingSession;
use crate::timer::SettleTimer;
use crate::Config;

/// UI mode of the input bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Free typing; also covers choosing among returned phrases
    #[default]
    EnteringText,
    ChoosingLetterChip,
    FocusedOnLetterChip,
    ChoosingWordChip,
    FocusedOnWordChip,
    /// Typing after a prefix of a suggestion was kept
    AfterCut,
}

impl Mode {
    fn is_text(self) -> bool {
        matches!(self, Mode::EnteringText | Mode::AfterCut)
    }

    fn is_letter(self) -> bool {
        matches!(self, Mode::ChoosingLetterChip | Mode::FocusedOnLetterChip)
    }

    fn is_word(self) -> bool {
        matches!(self, Mode::ChoosingWordChip | Mode::FocusedOnWordChip)
    }
}

/// End of one text entry, reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEntryEnd {
    pub text: String,
    pub is_final: bool,
    pub is_aborted: bool,
}

/// Everything the state machine asks of the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputBarEvent {
    #[serde(rename_all = "camelCase")]
    AbbreviationChanged {
        spec: AbbreviationSpec,
        request_expansion: bool,
    },
    ExpansionRequested { request: ExpansionRequest },
    FillMaskRequested { request: FillMaskRequest },
    LexiconPrefixRequested { request: LexiconRequest },
    InputStringChanged { text: String },
    TextEntryEnded { entry: TextEntryEnd },
}

/// Host-side registration of clickable chips.
pub trait ChipRegistry {
    /// Called after every change to the chip set or the focused chip.
    fn on_chips_changed(&mut self, chips: &[Chip], focused: Option<usize>);
}

/// Registry for hosts without clickable chips.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChipRegistry;

impl ChipRegistry for NoopChipRegistry {
    fn on_chips_changed(&mut self, _chips: &[Chip], _focused: Option<usize>) {}
}

pub struct InputBarStateMachine {
    config: Config,
    tokenizer: AbbreviationTokenizer,
    tracker: KeySequenceTracker,
    mode: Mode,
    input_string: String,
    /// Text ahead of the tracked delta: a cut prefix or host-injected text
    kept_text: String,
    compatibility: Compatibility,
    spelling: Option<SpellingSession>,
    /// Lexicon lookup already sent for the focused letter chip
    prefix_requested: bool,
    word_chips: Option<ChipSet>,
    focused_word: Option<usize>,
    generation: u64,
    context_strings: Vec<String>,
    expansion: ExpansionTracker,
    fill_mask: FillMaskTracker,
    settle: SettleTimer,
    events: VecDeque<InputBarEvent>,
    registry: Box<dyn ChipRegistry>,
}

impl InputBarStateMachine {
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, Box::new(NoopChipRegistry))
    }

    pub fn with_registry(config: Config, registry: Box<dyn ChipRegistry>) -> Self {
        Self {
            tokenizer: AbbreviationTokenizer::new(config.limits()),
            settle: SettleTimer::new(config.settle_delay()),
            config,
            tracker: KeySequenceTracker::new(),
            mode: Mode::EnteringText,
            input_string: String::new(),
            kept_text: String::new(),
            compatibility: Compatibility::Empty,
            spelling: None,
            prefix_requested: false,
            word_chips: None,
            focused_word: None,
            generation: 0,
            context_strings: Vec::new(),
            expansion: ExpansionTracker::new(),
            fill_mask: FillMaskTracker::new(),
            events: VecDeque::new(),
            registry,
        }
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input_string(&self) -> &str {
        &self.input_string
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    /// Current chips: letters while spelling, words while refining.
    pub fn chips(&self) -> &[Chip] {
        match (&self.spelling, &self.word_chips) {
            (Some(session), _) => session.chip_slice(),
            (None, Some(words)) => words.as_slice(),
            (None, None) => &[],
        }
    }

    pub fn focused_index(&self) -> Option<usize> {
        match &self.spelling {
            Some(session) => session.focused(),
            None => self.focused_word,
        }
    }

    pub fn spelling(&self) -> Option<&SpellingSession> {
        self.spelling.as_ref()
    }

    pub fn expansion(&self) -> &ExpansionTracker {
        &self.expansion
    }

    pub fn fill_mask(&self) -> &FillMaskTracker {
        &self.fill_mask
    }

    pub fn context_strings(&self) -> &[String] {
        &self.context_strings
    }

    /// Drain queued events in emission order.
    pub fn take_events(&mut self) -> Vec<InputBarEvent> {
        self.events.drain(..).collect()
    }

    /// The phrase the bar currently stands for, as it would be spoken.
    pub fn effective_phrase(&self) -> String {
        if let Some(session) = &self.spelling {
            return session
                .tokens()
                .iter()
                .map(|t| t.value.as_str())
                .collect::<Vec<_>>()
                .join(" ");
        }
        if let Some(words) = &self.word_chips {
            return words
                .as_slice()
                .iter()
                .map(|c| c.display_text().trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
        }
        self.input_string.trim().to_string()
    }

    pub fn view(&self) -> InputBarView {
        let compatible = self.compatibility.is_compatible();
        let chip_set = match (&self.spelling, &self.word_chips) {
            (Some(session), _) => Some(session.chips()),
            (None, Some(words)) => Some(words),
            (None, None) => None,
        };
        InputBarView {
            mode: self.mode,
            input_string: self.input_string.clone(),
            chip_generation: self.generation,
            chips: chip_set.map(ChipSet::snapshot).unwrap_or_default(),
            focused_index: self.focused_index(),
            length_limit_exceeded: self.mode.is_text() && self.compatibility.limit_exceeded(),
            expand_enabled: (self.mode.is_text() && compatible) || self.mode.is_letter(),
            spell_enabled: (self.mode.is_text() && compatible) || self.mode.is_word(),
            options: self.expansion.options().to_vec(),
            replacements: self.fill_mask.replacements().to_vec(),
            request_ongoing: self.expansion.is_pending() || self.fill_mask.is_pending(),
            error_message: self
                .expansion
                .error()
                .or(self.fill_mask.error())
                .map(str::to_string),
        }
    }

    // ========== Keystrokes ==========

    /// Feed the complete key log and the current reconstruction. Called once
    /// per physical key.
    pub fn on_key_sequence(&mut self, keys: &[KeyEvent], reconstructed: &str) {
        if self.settle.is_pending() {
            debug!("keystroke cancels pending settle timer");
            self.settle.cancel();
            self.expansion.clear_options();
        }
        self.tracker.observe(reconstructed);
        let Some(&last) = keys.last() else {
            return;
        };
        match self.mode {
            Mode::EnteringText | Mode::AfterCut => self.on_text_key(keys),
            Mode::ChoosingLetterChip => self.on_choosing_letter_key(last),
            Mode::FocusedOnLetterChip => self.on_spelling_key(last),
            Mode::ChoosingWordChip => self.on_word_chip_typing(last),
            Mode::FocusedOnWordChip => self.on_focused_word_key(last),
        }
    }

    fn on_text_key(&mut self, keys: &[KeyEvent]) {
        let text = format!("{}{}", self.kept_text, self.tracker.delta());
        self.set_input_string(text);

        let triggered = self
            .config
            .trigger_sequences
            .iter()
            .any(|seq| key_sequence_ends_with(keys, seq));
        if !triggered {
            return;
        }
        if self.compatibility.is_compatible() {
            self.trigger_expansion();
        } else {
            debug!(compatibility = ?self.compatibility, "trigger ignored for incompatible input");
        }
    }

    fn on_choosing_letter_key(&mut self, last: KeyEvent) {
        if !matches!(last, KeyEvent::Char(_)) {
            debug!(key = ?last, "non-letter key ignored while choosing a chip");
            return;
        }
        let (Some(letter), Some(session)) = (self.tracker.last_char(), self.spelling.as_mut())
        else {
            return;
        };
        if session.choose_by_letter(letter).is_none() {
            return;
        }
        self.tracker.rebase_excluding_last();
        self.set_mode(Mode::FocusedOnLetterChip);
        self.request_prefix(letter.to_string());
        let delta = self.tracker.delta().to_string();
        self.set_input_string(delta);
        self.notify_chips();
    }

    fn on_spelling_key(&mut self, last: KeyEvent) {
        let delta = self.tracker.delta().to_string();
        let Some(session) = self.spelling.as_mut() else {
            return;
        };
        if last.is_commit() {
            let word = delta.trim();
            if word.is_empty() {
                debug!("blank word not committed");
                self.tracker.rebase();
                return;
            }
            session.update_focused(word);
            session.unfocus();
            self.tracker.rebase();
            self.set_mode(Mode::ChoosingLetterChip);
            self.set_input_string(String::new());
            self.notify_chips();
            self.trigger_expansion();
            return;
        }
        session.update_focused(&delta);
        if delta.is_empty() {
            self.tracker.rebase();
        } else if !self.prefix_requested {
            self.request_prefix(delta.clone());
        }
        self.set_input_string(delta);
        self.notify_chips();
    }

    fn on_word_chip_typing(&mut self, last: KeyEvent) {
        let Some(words) = self.word_chips.take() else {
            return;
        };
        // Typing over unfocused suggestions keeps the whole phrase as a prefix.
        self.kept_text = format!("{} ", words.display_texts().join(" "));
        if last == KeyEvent::Backspace {
            self.tracker.rebase();
        } else {
            self.tracker.rebase_excluding_last();
        }
        self.focused_word = None;
        self.fill_mask.clear();
        self.set_mode(Mode::AfterCut);
        let text = format!("{}{}", self.kept_text, self.tracker.delta());
        self.set_input_string(text);
        self.notify_chips();
    }

    fn on_focused_word_key(&mut self, last: KeyEvent) {
        if last.is_commit() {
            self.speak_as_is();
            return;
        }
        let (Some(words), Some(index)) = (self.word_chips.as_mut(), self.focused_word) else {
            return;
        };
        let delta = self.tracker.delta();
        let text = (!delta.is_empty()).then(|| delta.to_string());
        words.set_override(index, text);
        self.notify_chips();
    }

    // ========== User actions ==========

    /// Conversation turns used as expansion context, oldest first.
    pub fn set_context_strings<I, S>(&mut self, context: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_strings = context.into_iter().map(Into::into).collect();
    }

    /// Explicit expand button. Returns false when expansion is not
    /// available in the current mode.
    pub fn expand(&mut self) -> bool {
        let allowed = match self.mode {
            Mode::EnteringText | Mode::AfterCut => self.compatibility.is_compatible(),
            Mode::ChoosingLetterChip | Mode::FocusedOnLetterChip => true,
            Mode::ChoosingWordChip | Mode::FocusedOnWordChip => false,
        };
        if !allowed {
            debug!(mode = ?self.mode, "expand not available");
            return false;
        }
        self.trigger_expansion()
    }

    /// Enter letter spelling, from typed text or from word chips.
    pub fn spell(&mut self) -> bool {
        match self.mode {
            Mode::EnteringText | Mode::AfterCut => self.spell_from_text(),
            Mode::ChoosingWordChip | Mode::FocusedOnWordChip => self.spell_from_words(),
            Mode::ChoosingLetterChip | Mode::FocusedOnLetterChip => false,
        }
    }

    fn spell_from_text(&mut self) -> bool {
        if !self.compatibility.is_compatible() {
            return false;
        }
        let Ok(mut tokens) = self.tokenizer.tokenize(&self.input_string) else {
            return false;
        };
        let Some(proper) = tokens.pop() else {
            return false;
        };
        let head = tokens.into_iter().map(|t| t.value).collect();
        let generation = self.next_generation();
        self.spelling = Some(SpellingSession::start(&proper.value, head, generation));
        self.tracker.rebase();
        self.set_mode(Mode::ChoosingLetterChip);
        self.set_input_string(String::new());
        self.notify_chips();
        true
    }

    fn spell_from_words(&mut self) -> bool {
        let Some(words) = self.word_chips.take() else {
            return false;
        };
        let initials: String = words
            .as_slice()
            .iter()
            .filter_map(|c| c.text.chars().next())
            .collect();
        let prefix = self
            .focused_word
            .and_then(|i| words.get(i))
            .and_then(|c| c.override_text.clone())
            .filter(|p| !p.trim().is_empty());
        let generation = self.next_generation();
        let mut session = SpellingSession::start(&initials, Vec::new(), generation);
        self.fill_mask.clear();

        if let (Some(index), Some(prefix)) = (self.focused_word, prefix) {
            // The typed prefix stays on its letter chip and seeds a lookup.
            session.seed(index, &prefix);
            self.request_prefix(prefix);
        }
        self.focused_word = None;
        self.spelling = Some(session);
        self.tracker.rebase();
        self.set_mode(Mode::ChoosingLetterChip);
        self.set_input_string(String::new());
        self.notify_chips();
        true
    }

    /// Discard everything typed in this cycle.
    pub fn abort(&mut self) {
        self.emit(InputBarEvent::TextEntryEnded {
            entry: TextEntryEnd {
                text: String::new(),
                is_final: true,
                is_aborted: true,
            },
        });
        self.settle.cancel();
        self.expansion.clear();
        self.reset();
    }

    /// Host-driven clear: same reset as abort, without an end event.
    pub fn clear_all(&mut self) {
        self.settle.cancel();
        self.expansion.clear();
        self.reset();
    }

    /// The host reports a text entry from elsewhere (e.g. a phrase spoken
    /// from another panel). Final entries end the cycle. Non-final entries
    /// replace the typed text; typing continues after them.
    pub fn on_text_entry_end(&mut self, entry: &TextEntryEnd) {
        if !entry.is_final {
            if !self.mode.is_text() {
                debug!(mode = ?self.mode, "non-final text entry ignored outside text entry");
                return;
            }
            self.kept_text = entry.text.clone();
            self.tracker.rebase();
            self.set_input_string(entry.text.clone());
            return;
        }
        self.expansion.clear();
        self.reset();
    }

    /// Explicit chip click. Bypasses letter ambiguity; on a word chip it
    /// requests a mask fill for that position.
    pub fn click_chip(&mut self, index: usize) -> bool {
        if self.mode.is_letter() {
            let Some(session) = self.spelling.as_mut() else {
                return false;
            };
            if !session.focus(index) {
                warn!(index, "letter chip index out of range");
                return false;
            }
            self.prefix_requested = false;
            self.tracker.rebase();
            self.set_mode(Mode::FocusedOnLetterChip);
            self.set_input_string(String::new());
            self.notify_chips();
            return true;
        }
        if !self.mode.is_word() {
            return false;
        }
        let Some(words) = &self.word_chips else {
            return false;
        };
        let Some(chip) = words.get(index) else {
            warn!(index, "word chip index out of range");
            return false;
        };
        let phrase_with_mask = words
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, c)| if i == index { "_" } else { c.display_text().trim() })
            .collect::<Vec<_>>()
            .join(" ");
        let mask_initial = chip
            .override_text
            .as_deref()
            .unwrap_or(&chip.text)
            .chars()
            .next()
            .map(String::from);
        let request = FillMaskRequest {
            request_id: RequestId::new(),
            speech_content: self.context_strings.join("|"),
            phrase_with_mask,
            mask_initial,
        };
        self.fill_mask.begin(request.request_id, index, &chip.text);
        self.focused_word = Some(index);
        self.tracker.rebase();
        self.set_mode(Mode::FocusedOnWordChip);
        self.emit(InputBarEvent::FillMaskRequested { request });
        self.notify_chips();
        true
    }

    /// Keep the word chips up to and including `index` as literal text and
    /// continue typing after them.
    pub fn cut_at(&mut self, index: usize) -> bool {
        if !self.mode.is_word() {
            return false;
        }
        let Some(words) = &self.word_chips else {
            return false;
        };
        if index >= words.len() {
            warn!(index, "cut index out of range");
            return false;
        }
        let kept = words.display_texts()[..=index].join(" ");
        self.kept_text = format!("{} ", kept);
        self.word_chips = None;
        self.focused_word = None;
        self.fill_mask.clear();
        self.tracker.rebase();
        self.set_mode(Mode::AfterCut);
        self.set_input_string(self.kept_text.clone());
        self.notify_chips();
        true
    }

    /// Show `words` as word chips for refinement.
    pub fn set_word_chips<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generation = self.next_generation();
        self.word_chips = Some(ChipSet::words(words, generation));
        self.spelling = None;
        self.focused_word = None;
        self.fill_mask.clear();
        self.tracker.rebase();
        self.set_mode(Mode::ChoosingWordChip);
        self.notify_chips();
    }

    /// Split the option at `index` into word chips.
    pub fn refine_expansion(&mut self, index: usize) -> bool {
        let Some(option) = self.expansion.option(index) else {
            warn!(index, "expansion option index out of range");
            return false;
        };
        let words: Vec<String> = option.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return false;
        }
        self.set_word_chips(words);
        true
    }

    /// Replace the focused word chip with the returned replacement at
    /// `index`.
    pub fn apply_replacement(&mut self, index: usize) -> bool {
        if self.mode != Mode::FocusedOnWordChip {
            return false;
        }
        let Some(replacement) = self.fill_mask.replacement(index).map(str::to_string) else {
            warn!(index, "replacement index out of range");
            return false;
        };
        let (Some(words), Some(focused)) = (self.word_chips.as_mut(), self.focused_word) else {
            return false;
        };
        words.set_override(focused, Some(replacement));
        self.tracker.rebase();
        self.notify_chips();
        true
    }

    /// End the entry with the effective phrase instead of an expansion.
    pub fn speak_as_is(&mut self) -> bool {
        let text = self.effective_phrase();
        if text.is_empty() {
            return false;
        }
        self.emit(InputBarEvent::TextEntryEnded {
            entry: TextEntryEnd {
                text,
                is_final: true,
                is_aborted: false,
            },
        });
        self.settle.cancel();
        self.expansion.clear();
        self.reset();
        true
    }

    // ========== Responses and timers ==========

    pub fn on_expansion_response(
        &mut self,
        lineage_id: LineageId,
        response: ExpansionResponse,
    ) -> ResponseOutcome {
        let outcome = self.expansion.apply_response(lineage_id, response);
        match outcome {
            ResponseOutcome::Applied => {
                debug!(options = self.expansion.options().len(), "expansion options received");
            }
            ResponseOutcome::Failed => {
                warn!(error = ?self.expansion.error(), "expansion request failed");
            }
            ResponseOutcome::Stale => {}
        }
        outcome
    }

    /// Choose an expansion option: ends the entry with it and schedules
    /// the option list to clear after the settle delay.
    pub fn select_expansion(&mut self, index: usize, now: Instant) -> bool {
        let Some(text) = self.expansion.select(index) else {
            warn!(index, "expansion option not selectable");
            return false;
        };
        self.emit(InputBarEvent::TextEntryEnded {
            entry: TextEntryEnd {
                text,
                is_final: true,
                is_aborted: false,
            },
        });
        self.reset();
        self.settle.schedule(now);
        true
    }

    pub fn on_fill_mask_response(
        &mut self,
        request_id: RequestId,
        response: FillMaskResponse,
    ) -> ResponseOutcome {
        self.fill_mask
            .apply_response(request_id, response, self.config.max_replacement_tokens)
    }

    pub fn on_fill_mask_failure(
        &mut self,
        request_id: RequestId,
        message: impl Into<String>,
    ) -> ResponseOutcome {
        let outcome = self.fill_mask.fail(request_id, message);
        if outcome == ResponseOutcome::Failed {
            warn!(%request_id, "fill-mask request failed");
        }
        outcome
    }

    /// Fire due timers. Returns true when the settle timer fired.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        if !self.settle.poll(now) {
            return false;
        }
        debug!("settle delay elapsed; clearing options");
        self.expansion.clear_options();
        self.fill_mask.clear();
        true
    }

    // ========== Internals ==========

    fn trigger_expansion(&mut self) -> bool {
        let eraser = self.eraser_sequence();
        let spec = match self.build_spec(eraser) {
            Ok(spec) => spec,
            Err(err) => {
                let err = ExpansionError::from(err);
                warn!(%err, "cannot build abbreviation spec");
                self.expansion.fail_locally(&err);
                return false;
            }
        };
        debug!(readable = spec.readable_string(), eraser = eraser.len(), "abbreviation changed");
        self.emit(InputBarEvent::AbbreviationChanged {
            spec: spec.clone(),
            request_expansion: true,
        });
        match self.expansion.begin(spec, &self.context_strings, &self.config) {
            Ok(request) => {
                self.emit(InputBarEvent::ExpansionRequested { request });
                true
            }
            Err(err) => {
                warn!(%err, "expansion not requested");
                false
            }
        }
    }

    fn build_spec(&self, eraser: EraserSequence) -> Result<AbbreviationSpec, AbbreviationError> {
        match &self.spelling {
            Some(session) => AbbreviationSpec::from_tokens(session.tokens(), eraser, ""),
            None => self.tokenizer.build_spec(&self.input_string, eraser),
        }
    }

    /// One erase op per raw character typed in this cycle.
    fn eraser_sequence(&self) -> EraserSequence {
        EraserSequenceBuilder::new()
            .extend(self.tracker.cycle_text())
            .build()
    }

    fn reset(&mut self) {
        self.tracker.start_cycle();
        self.spelling = None;
        self.prefix_requested = false;
        self.word_chips = None;
        self.focused_word = None;
        self.kept_text.clear();
        self.fill_mask.clear();
        self.generation += 1;
        self.set_mode(Mode::EnteringText);
        self.set_input_string(String::new());
        self.notify_chips();
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "mode transition");
            self.mode = mode;
        }
    }

    fn set_input_string(&mut self, text: String) {
        self.compatibility = self.tokenizer.check(&text);
        if self.input_string != text {
            self.input_string = text;
            self.emit(InputBarEvent::InputStringChanged {
                text: self.input_string.clone(),
            });
        }
    }

    /// At most one lookup per focused letter chip.
    fn request_prefix(&mut self, prefix: String) {
        self.prefix_requested = true;
        self.emit(InputBarEvent::LexiconPrefixRequested {
            request: LexiconRequest { prefix },
        });
    }

    fn emit(&mut self, event: InputBarEvent) {
        self.events.push_back(event);
    }

    fn notify_chips(&mut self) {
        let (chips, focused) = match (&self.spelling, &self.word_chips) {
            (Some(session), _) => (session.chip_slice(), session.focused()),
            (None, Some(words)) => (words.as_slice(), self.focused_word),
            (None, None) => (&[][..], None),
        };
        self.registry.on_chips_changed(chips, focused);
    }
}
