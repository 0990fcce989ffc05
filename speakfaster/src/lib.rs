//! speakfaster crate root
//!
//! Client-side glue around `speakfaster-core`: a blocking HTTP client for
//! the expansion, fill-mask and lexicon services, a client config that
//! extends the core config, and a replay-script driver used by the CLI.
//!
//! Public API exported here:
//! - `ClientConfig` from `config`
//! - `SpeakFasterClient` and `Dispatch` from `service`
//! - `Replay` and `Command` from `replay`

pub mod config;
pub mod replay;
pub mod service;

// Re-export the core types callers need alongside the client.
pub use speakfaster_core::{
    Chip, Config, InputBarEvent, InputBarStateMachine, InputBarView, InputBuffer, KeyEvent, Mode,
};

pub use config::ClientConfig;
pub use replay::{Command, Replay};
pub use service::{Dispatch, LexiconResponse, SpeakFasterClient};
