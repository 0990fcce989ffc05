//! Abbreviation specs and the tokenizer that builds them from typed text.
//!
//! Typed input like `"a good tiaths"` splits into head keywords that are
//! sent verbatim (`a`, `good`) and a final abbreviation proper (`tiaths`)
//! that the expansion service expands letter by letter.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::eraser::EraserSequence;
use crate::error::{AbbreviationError, LimitViolation};

/// One token of an abbreviation spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbbreviationToken {
    pub value: String,
    pub is_keyword: bool,
}

impl AbbreviationToken {
    /// A verbatim word.
    pub fn keyword<T: Into<String>>(value: T) -> Self {
        Self {
            value: value.into(),
            is_keyword: true,
        }
    }

    /// A fragment to be expanded.
    pub fn abbreviated<T: Into<String>>(value: T) -> Self {
        Self {
            value: value.into(),
            is_keyword: false,
        }
    }
}

/// Correlates the expansion attempts of one user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineageId(Uuid);

impl LineageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A well-formed, replayable abbreviation expansion request body.
///
/// Immutable once emitted; every trigger builds a fresh spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbbreviationSpec {
    tokens: Vec<AbbreviationToken>,
    readable_string: String,
    eraser_sequence: EraserSequence,
    lineage_id: LineageId,
    preceding_text: String,
}

impl AbbreviationSpec {
    /// Build a spec with a fresh lineage id. `readable_string` is the token
    /// values joined by single spaces.
    pub fn from_tokens(
        tokens: Vec<AbbreviationToken>,
        eraser_sequence: EraserSequence,
        preceding_text: impl Into<String>,
    ) -> Result<Self, AbbreviationError> {
        if tokens.is_empty() {
            return Err(AbbreviationError::Empty);
        }
        if tokens.iter().any(|t| t.value.is_empty()) {
            return Err(AbbreviationError::EmptyToken);
        }
        let readable_string = tokens
            .iter()
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Self {
            tokens,
            readable_string,
            eraser_sequence,
            lineage_id: LineageId::new(),
            preceding_text: preceding_text.into(),
        })
    }

    pub fn tokens(&self) -> &[AbbreviationToken] {
        &self.tokens
    }

    pub fn readable_string(&self) -> &str {
        &self.readable_string
    }

    pub fn eraser_sequence(&self) -> EraserSequence {
        self.eraser_sequence
    }

    pub fn lineage_id(&self) -> LineageId {
        self.lineage_id
    }

    pub fn preceding_text(&self) -> &str {
        &self.preceding_text
    }

    /// Length in chars of the longest non-keyword token.
    pub fn max_abbreviated_len(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| !t.is_keyword)
            .map(|t| t.value.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Limits beyond which typed text is not offered for expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbbreviationLimits {
    pub max_proper_length: usize,
    pub max_head_keywords: usize,
    pub max_total_length: usize,
}

impl Default for AbbreviationLimits {
    fn default() -> Self {
        Self {
            max_proper_length: 10,
            max_head_keywords: 4,
            max_total_length: 50,
        }
    }
}

/// Whether typed text may be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    /// Nothing but whitespace typed
    Empty,
    LimitExceeded(LimitViolation),
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }

    pub fn limit_exceeded(&self) -> bool {
        matches!(self, Compatibility::LimitExceeded(_))
    }
}

/// Splits typed text into head keywords and the abbreviation proper.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTokenizer {
    limits: AbbreviationLimits,
}

impl AbbreviationTokenizer {
    pub fn new(limits: AbbreviationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> AbbreviationLimits {
        self.limits
    }

    fn words(text: &str) -> Vec<&str> {
        text.trim().split(' ').filter(|w| !w.is_empty()).collect()
    }

    /// Check `text` against the limits. Cheap enough to run per keystroke.
    pub fn check(&self, text: &str) -> Compatibility {
        let trimmed = text.trim();
        let words = Self::words(trimmed);
        let Some(proper) = words.last() else {
            return Compatibility::Empty;
        };

        let total = trimmed.chars().count();
        if total > self.limits.max_total_length {
            return Compatibility::LimitExceeded(LimitViolation::TotalTooLong {
                len: total,
                max: self.limits.max_total_length,
            });
        }
        let head_count = words.len() - 1;
        if head_count > self.limits.max_head_keywords {
            return Compatibility::LimitExceeded(LimitViolation::TooManyHeadKeywords {
                count: head_count,
                max: self.limits.max_head_keywords,
            });
        }
        let proper_len = proper.chars().count();
        if proper_len > self.limits.max_proper_length {
            return Compatibility::LimitExceeded(LimitViolation::ProperTooLong {
                len: proper_len,
                max: self.limits.max_proper_length,
            });
        }
        Compatibility::Compatible
    }

    /// Tokenize without applying limits: all words but the last are
    /// keywords.
    pub fn tokenize(&self, text: &str) -> Result<Vec<AbbreviationToken>, AbbreviationError> {
        let words = Self::words(text);
        let Some((proper, head)) = words.split_last() else {
            return Err(AbbreviationError::Empty);
        };
        let mut tokens: Vec<AbbreviationToken> =
            head.iter().map(|w| AbbreviationToken::keyword(*w)).collect();
        tokens.push(AbbreviationToken::abbreviated(*proper));
        Ok(tokens)
    }

    /// Check limits, tokenize and wrap everything into a fresh spec.
    pub fn build_spec(
        &self,
        text: &str,
        eraser_sequence: EraserSequence,
    ) -> Result<AbbreviationSpec, AbbreviationError> {
        match self.check(text) {
            Compatibility::Compatible => {}
            Compatibility::Empty => return Err(AbbreviationError::Empty),
            Compatibility::LimitExceeded(violation) => return Err(violation.into()),
        }
        let tokens = self.tokenize(text)?;
        AbbreviationSpec::from_tokens(tokens, eraser_sequence, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> AbbreviationTokenizer {
        AbbreviationTokenizer::default()
    }

    #[test]
    fn test_single_token_is_abbreviation() {
        let tokens = tokenizer().tokenize("  xy  ").unwrap();
        assert_eq!(tokens, vec![AbbreviationToken::abbreviated("xy")]);
    }

    #[test]
    fn test_head_keywords() {
        let tokens = tokenizer().tokenize("a good tiaths").unwrap();
        assert_eq!(
            tokens,
            vec![
                AbbreviationToken::keyword("a"),
                AbbreviationToken::keyword("good"),
                AbbreviationToken::abbreviated("tiaths"),
            ]
        );
    }

    #[test]
    fn test_repeated_spaces_are_dropped() {
        let spec = tokenizer()
            .build_spec("i  feel   gr", EraserSequence::with_len(12))
            .unwrap();
        assert_eq!(spec.tokens().len(), 3);
        assert_eq!(spec.readable_string(), "i feel gr");
    }

    #[test]
    fn test_readable_length_invariant() {
        for text in ["x", "a b", "how are yd", "one two three four abc"] {
            let spec = tokenizer()
                .build_spec(text, EraserSequence::default())
                .unwrap();
            let sum: usize = spec.tokens().iter().map(|t| t.value.chars().count()).sum();
            assert_eq!(
                sum + spec.tokens().len() - 1,
                spec.readable_string().chars().count(),
                "invariant broken for {:?}",
                text
            );
            assert_eq!(spec.readable_string(), text);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenizer().check("   "), Compatibility::Empty);
        assert_eq!(
            tokenizer().tokenize(" "),
            Err(AbbreviationError::Empty)
        );
    }

    #[test]
    fn test_proper_too_long() {
        let check = tokenizer().check("abcdefghijk");
        assert_eq!(
            check,
            Compatibility::LimitExceeded(LimitViolation::ProperTooLong { len: 11, max: 10 })
        );
        assert!(tokenizer().check("abcdefghij").is_compatible());
    }

    #[test]
    fn test_too_many_head_keywords() {
        let check = tokenizer().check("a big and red and d");
        assert!(matches!(
            check,
            Compatibility::LimitExceeded(LimitViolation::TooManyHeadKeywords { count: 5, max: 4 })
        ));
        assert!(tokenizer().check("a big and red d").is_compatible());
    }

    #[test]
    fn test_total_too_long() {
        let text = "abcdefghij abcdefghij abcdefghij abcdefghij abcdefghij";
        assert!(tokenizer().check(text).limit_exceeded());
        let result = tokenizer().build_spec(text, EraserSequence::default());
        assert!(matches!(result, Err(AbbreviationError::LimitExceeded(_))));
    }

    #[test]
    fn test_custom_limits() {
        let tokenizer = AbbreviationTokenizer::new(AbbreviationLimits {
            max_proper_length: 3,
            max_head_keywords: 0,
            max_total_length: 50,
        });
        assert!(tokenizer.check("abc").is_compatible());
        assert!(tokenizer.check("abcd").limit_exceeded());
        assert!(tokenizer.check("a bc").limit_exceeded());
    }

    #[test]
    fn test_fresh_lineage_per_spec() {
        let a = tokenizer().build_spec("xy", EraserSequence::default()).unwrap();
        let b = tokenizer().build_spec("xy", EraserSequence::default()).unwrap();
        assert_eq!(a.tokens(), b.tokens());
        assert_ne!(a.lineage_id(), b.lineage_id());
    }

    #[test]
    fn test_from_tokens_rejects_empty() {
        assert_eq!(
            AbbreviationSpec::from_tokens(vec![], EraserSequence::default(), ""),
            Err(AbbreviationError::Empty)
        );
        assert_eq!(
            AbbreviationSpec::from_tokens(
                vec![AbbreviationToken::keyword("")],
                EraserSequence::default(),
                ""
            ),
            Err(AbbreviationError::EmptyToken)
        );
    }

    #[test]
    fn test_max_abbreviated_len() {
        let spec = AbbreviationSpec::from_tokens(
            vec![
                AbbreviationToken::abbreviated("ab"),
                AbbreviationToken::keyword("wonderful"),
                AbbreviationToken::abbreviated("cdefgh"),
            ],
            EraserSequence::default(),
            "",
        )
        .unwrap();
        assert_eq!(spec.max_abbreviated_len(), 6);
    }
}
