//! View model for the host UI.
//!
//! `InputBarView` is a plain data snapshot with public fields. After feeding
//! a keystroke or action to the state machine, the host takes a view and
//! renders it. No callbacks; the chip slice is a shared handle to one chip
//! generation and never changes after it was handed out.

use serde::Serialize;
use std::sync::Arc;

use crate::chip::Chip;
use crate::input_bar::Mode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBarView {
    pub mode: Mode,

    /// Text shown in the bar
    pub input_string: String,

    /// Bumped whenever a new chip set replaces the previous one
    pub chip_generation: u64,

    pub chips: Arc<Vec<Chip>>,

    pub focused_index: Option<usize>,

    /// Typed text violates a tokenizer limit; expansion triggers are off
    pub length_limit_exceeded: bool,

    pub expand_enabled: bool,

    pub spell_enabled: bool,

    /// Expansion options returned for the latest trigger
    pub options: Vec<String>,

    /// Fill-mask replacements for the focused word chip
    pub replacements: Vec<String>,

    pub request_ongoing: bool,

    pub error_message: Option<String>,
}

impl InputBarView {
    /// Whether the host has anything to draw besides the text field.
    pub fn has_visible_state(&self) -> bool {
        !self.chips.is_empty() || !self.options.is_empty() || self.error_message.is_some()
    }

    /// Display texts of the chips, overrides applied.
    pub fn chip_texts(&self) -> Vec<&str> {
        self.chips.iter().map(Chip::display_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_empty() {
        let view = InputBarView::default();
        assert_eq!(view.mode, Mode::EnteringText);
        assert!(!view.has_visible_state());
    }

    #[test]
    fn test_chip_texts_apply_overrides() {
        let mut chip = Chip::new("b");
        chip.override_text = Some("bit".to_string());
        chip.is_spelled = true;
        let view = InputBarView {
            chips: Arc::new(vec![Chip::new("a"), chip]),
            ..Default::default()
        };
        assert_eq!(view.chip_texts(), vec!["a", "bit"]);
        assert!(view.has_visible_state());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(InputBarView::default()).unwrap();
        assert_eq!(json["mode"], "ENTERING_TEXT");
        assert_eq!(json["lengthLimitExceeded"], false);
    }
}
