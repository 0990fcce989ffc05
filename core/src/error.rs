//! Error types for the core crate.

use thiserror::Error;

/// A length/keyword limit the current input violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimitViolation {
    #[error("abbreviation has {len} characters (max {max})")]
    ProperTooLong { len: usize, max: usize },
    #[error("{count} head keywords (max {max})")]
    TooManyHeadKeywords { count: usize, max: usize },
    #[error("input has {len} characters (max {max})")]
    TotalTooLong { len: usize, max: usize },
}

/// Failure to turn text or chips into an `AbbreviationSpec`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbbreviationError {
    #[error("empty abbreviation")]
    Empty,
    #[error("abbreviation token must not be empty")]
    EmptyToken,
    #[error("length limit exceeded: {0}")]
    LimitExceeded(#[from] LimitViolation),
}

/// Local, recoverable failure to start an expansion request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    #[error("Cannot expand abbreviation: no speech content as context")]
    EmptyContext,
    #[error("Cannot expand abbreviation: {0}")]
    InvalidAbbreviation(#[from] AbbreviationError),
}

/// Failure loading or saving a `Config`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}
