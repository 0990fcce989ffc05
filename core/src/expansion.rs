//! Requests to and responses from the external expansion services.
//!
//! The state machine never blocks on the network. It hands a request to the
//! host and later receives the response tagged with the id it was sent with.
//! Only the one outstanding request may be applied; anything else arrived
//! after an abort or a newer trigger and is discarded.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::abbreviation::{AbbreviationSpec, LineageId};
use crate::error::ExpansionError;
use crate::Config;

/// Abbreviation expansion request for the ExpansionService.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionRequest {
    pub context_strings: Vec<String>,
    pub abbreviation_spec: AbbreviationSpec,
    pub num_samples: u32,
}

impl ExpansionRequest {
    /// Build a request from the conversation context and a fresh spec.
    pub fn new(
        context_strings: &[String],
        abbreviation_spec: AbbreviationSpec,
        config: &Config,
    ) -> Result<Self, ExpansionError> {
        if context_strings.iter().all(|s| s.trim().is_empty()) {
            return Err(ExpansionError::EmptyContext);
        }
        Ok(Self {
            context_strings: limit_context(
                context_strings,
                config.max_context_turns,
                config.max_context_turn_length,
            ),
            num_samples: num_samples_for(&abbreviation_spec, config),
            abbreviation_spec,
        })
    }
}

/// More samples for long abbreviations, which have more candidate
/// expansions.
pub fn num_samples_for(spec: &AbbreviationSpec, config: &Config) -> u32 {
    if spec.max_abbreviated_len() > config.long_abbreviation_threshold {
        config.num_samples_long
    } else {
        config.num_samples_short
    }
}

/// Keep the last `max_turns` turns, each cut to its last `max_len` chars.
pub fn limit_context(context: &[String], max_turns: usize, max_len: usize) -> Vec<String> {
    let start = context.len().saturating_sub(max_turns);
    context[start..]
        .iter()
        .map(|turn| {
            let len = turn.chars().count();
            if len <= max_len {
                turn.clone()
            } else {
                turn.chars().skip(len - max_len).collect()
            }
        })
        .collect()
}

/// ExpansionService response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpansionResponse {
    #[serde(rename_all = "camelCase")]
    Matches { exact_matches: Vec<String> },
    Error { error: String },
}

/// Identifies one fill-mask request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// MaskFillService request: `phrase_with_mask` has `_` in place of the word
/// to replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillMaskRequest {
    pub request_id: RequestId,
    pub speech_content: String,
    pub phrase_with_mask: String,
    pub mask_initial: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillMaskResponse {
    pub results: Vec<String>,
}

/// LexiconService request for completions of a typed prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconRequest {
    pub prefix: String,
}

/// What happened to an incoming response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    /// Service reported an error; the message is kept for display.
    Failed,
    /// Not the outstanding request; discarded.
    Stale,
}

/// Bookkeeping for the one outstanding expansion request and its options.
#[derive(Debug, Clone, Default)]
pub struct ExpansionTracker {
    pending: Option<LineageId>,
    spec: Option<AbbreviationSpec>,
    options: Vec<String>,
    selected: Option<usize>,
    error: Option<String>,
}

impl ExpansionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `spec`. On a local error the message is kept and
    /// no request is produced.
    pub fn begin(
        &mut self,
        spec: AbbreviationSpec,
        context_strings: &[String],
        config: &Config,
    ) -> Result<ExpansionRequest, ExpansionError> {
        self.options.clear();
        self.selected = None;
        self.spec = Some(spec.clone());
        match ExpansionRequest::new(context_strings, spec, config) {
            Ok(request) => {
                self.pending = Some(request.abbreviation_spec.lineage_id());
                self.error = None;
                Ok(request)
            }
            Err(err) => {
                self.pending = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Record a local failure that prevented any request.
    pub fn fail_locally(&mut self, err: &ExpansionError) {
        self.pending = None;
        self.error = Some(err.to_string());
    }

    pub fn apply_response(
        &mut self,
        lineage_id: LineageId,
        response: ExpansionResponse,
    ) -> ResponseOutcome {
        if self.pending != Some(lineage_id) {
            tracing::warn!(%lineage_id, "discarding stale expansion response");
            return ResponseOutcome::Stale;
        }
        self.pending = None;
        match response {
            ExpansionResponse::Matches { exact_matches } => {
                self.options = exact_matches;
                self.error = None;
                ResponseOutcome::Applied
            }
            ExpansionResponse::Error { error } => {
                self.error = Some(error);
                ResponseOutcome::Failed
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_lineage(&self) -> Option<LineageId> {
        self.pending
    }

    /// The spec of the latest trigger.
    pub fn spec(&self) -> Option<&AbbreviationSpec> {
        self.spec.as_ref()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Mark an option selected. Selecting the same option twice is a no-op
    /// and returns `None`.
    pub fn select(&mut self, index: usize) -> Option<String> {
        if self.selected == Some(index) {
            return None;
        }
        let text = self.options.get(index)?.clone();
        self.selected = Some(index);
        Some(text)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drop the options and selection of a finished request. An
    /// outstanding request stays pending.
    pub fn clear_options(&mut self) {
        self.options.clear();
        self.selected = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Bookkeeping for the one outstanding fill-mask request.
#[derive(Debug, Clone, Default)]
pub struct FillMaskTracker {
    pending: Option<PendingFill>,
    replacements: Vec<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
struct PendingFill {
    id: RequestId,
    chip_index: usize,
    original: String,
}

impl FillMaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new request for the word chip at `chip_index`, dropping any
    /// earlier request and its replacements.
    pub fn begin(&mut self, id: RequestId, chip_index: usize, original: &str) {
        self.pending = Some(PendingFill {
            id,
            chip_index,
            original: original.to_string(),
        });
        self.replacements.clear();
        self.error = None;
    }

    /// Apply results: the original word is removed and the rest capped at
    /// `max_replacements`.
    pub fn apply_response(
        &mut self,
        id: RequestId,
        response: FillMaskResponse,
        max_replacements: usize,
    ) -> ResponseOutcome {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            tracing::warn!(%id, "discarding stale fill-mask response");
            return ResponseOutcome::Stale;
        }
        let Some(pending) = self.pending.take() else {
            return ResponseOutcome::Stale;
        };
        self.replacements = response
            .results
            .into_iter()
            .filter(|r| *r != pending.original)
            .take(max_replacements)
            .collect();
        self.error = None;
        ResponseOutcome::Applied
    }

    pub fn fail(&mut self, id: RequestId, message: impl Into<String>) -> ResponseOutcome {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            return ResponseOutcome::Stale;
        }
        self.pending = None;
        self.error = Some(message.into());
        ResponseOutcome::Failed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Index of the chip the outstanding request is for.
    pub fn pending_chip(&self) -> Option<usize> {
        self.pending.as_ref().map(|p| p.chip_index)
    }

    pub fn replacements(&self) -> &[String] {
        &self.replacements
    }

    pub fn replacement(&self, index: usize) -> Option<&str> {
        self.replacements.get(index).map(String::as_str)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abbreviation::AbbreviationToken;
    use crate::eraser::EraserSequence;

    fn spec(text: &str) -> AbbreviationSpec {
        AbbreviationSpec::from_tokens(
            vec![AbbreviationToken::abbreviated(text)],
            EraserSequence::with_len(text.len()),
            "",
        )
        .unwrap()
    }

    fn context() -> Vec<String> {
        vec!["How are you".to_string()]
    }

    #[test]
    fn test_num_samples_heuristic() {
        let config = Config::default();
        assert_eq!(num_samples_for(&spec("abcde"), &config), 128);
        assert_eq!(num_samples_for(&spec("abcdef"), &config), 256);
    }

    #[test]
    fn test_keywords_do_not_count_for_num_samples() {
        let spec = AbbreviationSpec::from_tokens(
            vec![
                AbbreviationToken::keyword("wonderful"),
                AbbreviationToken::abbreviated("ab"),
            ],
            EraserSequence::default(),
            "",
        )
        .unwrap();
        assert_eq!(num_samples_for(&spec, &Config::default()), 128);
    }

    #[test]
    fn test_limit_context() {
        let context = vec![
            "first".to_string(),
            "second".to_string(),
            "x".repeat(70) + "tail",
        ];
        let limited = limit_context(&context, 2, 60);
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0], "second");
        assert_eq!(limited[1].chars().count(), 60);
        assert!(limited[1].ends_with("tail"));
    }

    #[test]
    fn test_empty_context_is_local_error() {
        let mut tracker = ExpansionTracker::new();
        let result = tracker.begin(spec("xy"), &[], &Config::default());
        assert_eq!(result, Err(ExpansionError::EmptyContext));
        assert!(!tracker.is_pending());
        assert_eq!(
            tracker.error(),
            Some("Cannot expand abbreviation: no speech content as context")
        );
    }

    #[test]
    fn test_response_applied_for_pending_lineage() {
        let mut tracker = ExpansionTracker::new();
        let request = tracker.begin(spec("hay"), &context(), &Config::default()).unwrap();
        let lineage = request.abbreviation_spec.lineage_id();

        let outcome = tracker.apply_response(
            lineage,
            ExpansionResponse::Matches {
                exact_matches: vec!["how are you".into(), "here are you".into()],
            },
        );
        assert_eq!(outcome, ResponseOutcome::Applied);
        assert_eq!(tracker.options().len(), 2);
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut tracker = ExpansionTracker::new();
        let old = tracker.begin(spec("hay"), &context(), &Config::default()).unwrap();
        tracker.begin(spec("hay"), &context(), &Config::default()).unwrap();

        let outcome = tracker.apply_response(
            old.abbreviation_spec.lineage_id(),
            ExpansionResponse::Matches {
                exact_matches: vec!["stale".into()],
            },
        );
        assert_eq!(outcome, ResponseOutcome::Stale);
        assert!(tracker.options().is_empty());
        assert!(tracker.is_pending());
    }

    #[test]
    fn test_error_response_keeps_message() {
        let mut tracker = ExpansionTracker::new();
        let request = tracker.begin(spec("hay"), &context(), &Config::default()).unwrap();
        let outcome = tracker.apply_response(
            request.abbreviation_spec.lineage_id(),
            ExpansionResponse::Error {
                error: "timeout".into(),
            },
        );
        assert_eq!(outcome, ResponseOutcome::Failed);
        assert_eq!(tracker.error(), Some("timeout"));
        assert!(tracker.spec().is_some());
    }

    #[test]
    fn test_select_twice_is_noop() {
        let mut tracker = ExpansionTracker::new();
        let request = tracker.begin(spec("hay"), &context(), &Config::default()).unwrap();
        tracker.apply_response(
            request.abbreviation_spec.lineage_id(),
            ExpansionResponse::Matches {
                exact_matches: vec!["how are you".into()],
            },
        );
        assert_eq!(tracker.select(0).as_deref(), Some("how are you"));
        assert_eq!(tracker.select(0), None);
        assert_eq!(tracker.select(5), None);
    }

    #[test]
    fn test_clear_options_keeps_pending_request() {
        let mut tracker = ExpansionTracker::new();
        let first = tracker.begin(spec("hay"), &context(), &Config::default()).unwrap();
        tracker.apply_response(
            first.abbreviation_spec.lineage_id(),
            ExpansionResponse::Matches {
                exact_matches: vec!["how are you".into()],
            },
        );
        tracker.select(0);
        tracker.clear_options();
        assert!(tracker.options().is_empty());
        assert_eq!(tracker.selected(), None);

        let second = tracker.begin(spec("ty"), &context(), &Config::default()).unwrap();
        tracker.clear_options();
        assert_eq!(
            tracker.pending_lineage(),
            Some(second.abbreviation_spec.lineage_id())
        );
    }

    #[test]
    fn test_response_json_shapes() {
        let ok: ExpansionResponse =
            serde_json::from_str(r#"{"exactMatches": ["hi there"]}"#).unwrap();
        assert_eq!(
            ok,
            ExpansionResponse::Matches {
                exact_matches: vec!["hi there".into()]
            }
        );
        let err: ExpansionResponse = serde_json::from_str(r#"{"error": "bad"}"#).unwrap();
        assert!(matches!(err, ExpansionResponse::Error { .. }));
    }

    #[test]
    fn test_fill_mask_filters_original_and_caps() {
        let mut tracker = FillMaskTracker::new();
        let id = RequestId::new();
        tracker.begin(id, 2, "great");
        let results = ["good", "great", "fine", "okay", "bad", "sad", "glad", "mad"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let outcome = tracker.apply_response(id, FillMaskResponse { results }, 6);
        assert_eq!(outcome, ResponseOutcome::Applied);
        assert_eq!(
            tracker.replacements(),
            &["good", "fine", "okay", "bad", "sad", "glad"]
        );
    }

    #[test]
    fn test_fill_mask_stale_and_failure() {
        let mut tracker = FillMaskTracker::new();
        let first = RequestId::new();
        let second = RequestId::new();
        tracker.begin(first, 0, "i");
        tracker.begin(second, 1, "feel");
        assert_eq!(tracker.pending_chip(), Some(1));

        let outcome = tracker.apply_response(first, FillMaskResponse::default(), 6);
        assert_eq!(outcome, ResponseOutcome::Stale);
        assert!(tracker.is_pending());

        assert_eq!(tracker.fail(second, "network down"), ResponseOutcome::Failed);
        assert_eq!(tracker.error(), Some("network down"));
        assert_eq!(tracker.fail(second, "again"), ResponseOutcome::Stale);
    }
}
