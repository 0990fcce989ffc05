//! Replay scripts: drive one input bar from a line-per-command text script.
//!
//! ```text
//! context how are you|fine thanks
//! type hay
//! key space
//! key space
//! respond how are you|here are you
//! select 0
//! wait 500
//! ```
//!
//! Keystrokes go through an [`InputBuffer`], so the bar sees exactly what a
//! keystroke source would send. Time is virtual: it only advances on `wait`.

use anyhow::{anyhow, bail, Context, Result};
use std::time::{Duration, Instant};

use speakfaster_core::{
    Config, ExpansionResponse, FillMaskResponse, InputBarEvent, InputBarStateMachine,
    InputBuffer, KeyEvent,
};

use crate::service::SpeakFasterClient;

/// One script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Key(KeyEvent),
    Expand,
    Spell,
    Abort,
    Clear,
    Click(usize),
    Cut(usize),
    Words(Vec<String>),
    Context(Vec<String>),
    /// Answer the outstanding expansion request with these options
    Respond(Vec<String>),
    /// Fail the outstanding expansion (or fill-mask) request
    Fail(String),
    Select(usize),
    Refine(usize),
    /// Answer the outstanding fill-mask request
    Fill(Vec<String>),
    Replace(usize),
    Speak,
    Wait(Duration),
}

fn split_list(arg: &str) -> Vec<String> {
    arg.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn index_arg(name: &str, arg: &str) -> Result<usize> {
    arg.trim()
        .parse()
        .with_context(|| format!("`{}` expects an index, got {:?}", name, arg.trim()))
}

impl Command {
    /// Parse one line. Blank lines and `#` comments give `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let (name, arg) = match trimmed.split_once(' ') {
            Some((name, arg)) => (name, arg),
            None => (trimmed, ""),
        };

        let command = match name {
            // Text is taken verbatim, trailing spaces included.
            "type" => Command::Type(arg.to_string()),
            "key" => Command::Key(
                KeyEvent::from_name(arg.trim())
                    .ok_or_else(|| anyhow!("unknown key {:?}", arg.trim()))?,
            ),
            "expand" => Command::Expand,
            "spell" => Command::Spell,
            "abort" => Command::Abort,
            "clear" => Command::Clear,
            "speak" => Command::Speak,
            "click" => Command::Click(index_arg(name, arg)?),
            "cut" => Command::Cut(index_arg(name, arg)?),
            "select" => Command::Select(index_arg(name, arg)?),
            "refine" => Command::Refine(index_arg(name, arg)?),
            "replace" => Command::Replace(index_arg(name, arg)?),
            "words" => Command::Words(arg.split_whitespace().map(str::to_string).collect()),
            "context" => Command::Context(split_list(arg)),
            "respond" => Command::Respond(split_list(arg)),
            "fill" => Command::Fill(split_list(arg)),
            "fail" => Command::Fail(arg.trim().to_string()),
            "wait" => {
                let ms: u64 = arg
                    .trim()
                    .parse()
                    .with_context(|| format!("`wait` expects milliseconds, got {:?}", arg.trim()))?;
                Command::Wait(Duration::from_millis(ms))
            }
            other => bail!("unknown command {:?}", other),
        };
        Ok(Some(command))
    }
}

/// One input bar, its keystroke source and a virtual clock.
pub struct Replay {
    bar: InputBarStateMachine,
    buffer: InputBuffer,
    start: Instant,
    elapsed: Duration,
    client: Option<SpeakFasterClient>,
}

impl Replay {
    pub fn new(config: Config) -> Self {
        Self {
            bar: InputBarStateMachine::new(config),
            buffer: InputBuffer::new(),
            start: Instant::now(),
            elapsed: Duration::ZERO,
            client: None,
        }
    }

    /// Send emitted requests to a live service instead of waiting for
    /// `respond`/`fill` lines.
    pub fn with_client(mut self, client: SpeakFasterClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn bar(&self) -> &InputBarStateMachine {
        &self.bar
    }

    pub fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    /// Run a whole script, returning every emitted event.
    pub fn run_script(&mut self, script: &str) -> Result<Vec<InputBarEvent>> {
        let mut events = Vec::new();
        for (i, line) in script.lines().enumerate() {
            events.extend(self.run_line(i + 1, line)?);
        }
        Ok(events)
    }

    /// Run one script line; errors carry the line number.
    pub fn run_line(&mut self, line_no: usize, line: &str) -> Result<Vec<InputBarEvent>> {
        let Some(command) =
            Command::parse(line).with_context(|| format!("line {}: {:?}", line_no, line))?
        else {
            return Ok(Vec::new());
        };
        self.run(command)
            .with_context(|| format!("line {}: {:?}", line_no, line))
    }

    pub fn run(&mut self, command: Command) -> Result<Vec<InputBarEvent>> {
        match command {
            Command::Type(text) => {
                for key in InputBuffer::keys_for(&text) {
                    self.press(key);
                }
            }
            Command::Key(key) => self.press(key),
            Command::Expand => {
                self.bar.expand();
            }
            Command::Spell => {
                self.bar.spell();
            }
            Command::Abort => self.bar.abort(),
            Command::Clear => self.bar.clear_all(),
            Command::Click(index) => {
                self.bar.click_chip(index);
            }
            Command::Cut(index) => {
                self.bar.cut_at(index);
            }
            Command::Words(words) => self.bar.set_word_chips(words),
            Command::Context(turns) => self.bar.set_context_strings(turns),
            Command::Respond(options) => {
                let lineage = self
                    .bar
                    .expansion()
                    .pending_lineage()
                    .context("no expansion request outstanding")?;
                self.bar.on_expansion_response(
                    lineage,
                    ExpansionResponse::Matches {
                        exact_matches: options,
                    },
                );
            }
            Command::Fail(message) => {
                if let Some(lineage) = self.bar.expansion().pending_lineage() {
                    self.bar
                        .on_expansion_response(lineage, ExpansionResponse::Error { error: message });
                } else if let Some(id) = self.bar.fill_mask().pending_request() {
                    self.bar.on_fill_mask_failure(id, message);
                } else {
                    bail!("no request outstanding");
                }
            }
            Command::Select(index) => {
                let now = self.now();
                self.bar.select_expansion(index, now);
            }
            Command::Refine(index) => {
                self.bar.refine_expansion(index);
            }
            Command::Fill(results) => {
                let id = self
                    .bar
                    .fill_mask()
                    .pending_request()
                    .context("no fill-mask request outstanding")?;
                self.bar
                    .on_fill_mask_response(id, FillMaskResponse { results });
            }
            Command::Replace(index) => {
                self.bar.apply_replacement(index);
            }
            Command::Speak => {
                self.bar.speak_as_is();
            }
            Command::Wait(duration) => self.elapsed += duration,
        }
        let now = self.now();
        self.bar.poll_timers(now);

        let events = self.bar.take_events();
        if let Some(client) = &self.client {
            for event in &events {
                client.dispatch(&mut self.bar, event);
            }
        }
        Ok(events)
    }

    fn press(&mut self, key: KeyEvent) {
        let (keys, reconstructed) = self.buffer.press(key);
        self.bar.on_key_sequence(keys, reconstructed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("# comment").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(
            Command::parse("type abc  ").unwrap(),
            Some(Command::Type("abc  ".into()))
        );
        assert_eq!(
            Command::parse("key space").unwrap(),
            Some(Command::Key(KeyEvent::Space))
        );
        assert_eq!(Command::parse("click 2").unwrap(), Some(Command::Click(2)));
        assert_eq!(
            Command::parse("respond how are you | here you are").unwrap(),
            Some(Command::Respond(vec!["how are you".into(), "here you are".into()]))
        );
        assert_eq!(
            Command::parse("words i feel great").unwrap(),
            Some(Command::Words(vec!["i".into(), "feel".into(), "great".into()]))
        );
        assert_eq!(
            Command::parse("wait 500").unwrap(),
            Some(Command::Wait(Duration::from_millis(500)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("jump").is_err());
        assert!(Command::parse("click x").is_err());
        assert!(Command::parse("key f13").is_err());
        assert!(Command::parse("wait soon").is_err());
    }

    #[test]
    fn test_run_line_reports_line_number() {
        let mut replay = Replay::new(Config::default());
        let err = replay.run_line(7, "respond a|b").unwrap_err();
        assert!(format!("{:#}", err).contains("line 7"));
    }

    #[test]
    fn test_wait_advances_virtual_clock() {
        let mut replay = Replay::new(Config::default());
        let before = replay.now();
        replay.run_line(1, "wait 250").unwrap();
        assert_eq!(replay.now() - before, Duration::from_millis(250));
    }
}
