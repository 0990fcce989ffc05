//! HTTP client for the expansion, fill-mask and lexicon services.
//!
//! Disabled unless an endpoint is configured. Requests are POSTed as JSON
//! to `{endpoint}/expand_abbreviation`, `{endpoint}/fill_mask` and
//! `{endpoint}/lexicon`.
//!
//! Uses `reqwest` blocking client for simplicity - no async runtime needed.
//! The state machine never waits on this: the caller drains events, calls
//! [`SpeakFasterClient::dispatch`] and the result is fed back as a response.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use speakfaster_core::{
    ExpansionRequest, ExpansionResponse, FillMaskRequest, FillMaskResponse, InputBarEvent,
    InputBarStateMachine, LexiconRequest, ResponseOutcome,
};

use crate::config::ClientConfig;

/// LexiconService response: completions for a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconResponse {
    pub words: Vec<String>,
}

/// What `dispatch` did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Client disabled; nothing sent
    Skipped,
    /// Event needs no service call
    Ignored,
    Expansion(ResponseOutcome),
    FillMask(ResponseOutcome),
    Lexicon(Vec<String>),
}

pub struct SpeakFasterClient {
    endpoint: Option<String>,
    enabled: bool,
    timeout_ms: u64,
}

impl SpeakFasterClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            enabled: true,
            timeout_ms: 5000,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            enabled: config.enabled,
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Enabled and pointed at an endpoint.
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.endpoint.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Set the request timeout in milliseconds.
    pub fn set_timeout(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn url(&self, path: &str) -> Result<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .context("no service endpoint configured")?;
        Ok(format!("{}/{}", endpoint.trim_end_matches('/'), path))
    }

    fn post<Req: Serialize, Resp: DeserializeOwned>(&self, path: &str, body: &Req) -> Result<Resp> {
        let url = self.url(path)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
            .context("building http client")?;

        let response = client
            .post(&url)
            .json(body)
            .send()
            .with_context(|| format!("POST {}", url))?
            .error_for_status()
            .with_context(|| format!("POST {}", url))?;

        response
            .json()
            .with_context(|| format!("decoding response from {}", url))
    }

    /// Blocking ExpansionService call.
    pub fn expand(&self, request: &ExpansionRequest) -> Result<ExpansionResponse> {
        self.post("expand_abbreviation", request)
    }

    /// Blocking MaskFillService call.
    pub fn fill_mask(&self, request: &FillMaskRequest) -> Result<FillMaskResponse> {
        self.post("fill_mask", request)
    }

    /// Blocking LexiconService call.
    pub fn lexicon(&self, request: &LexiconRequest) -> Result<Vec<String>> {
        let response: LexiconResponse = self.post("lexicon", request)?;
        Ok(response.words)
    }

    /// Perform the call `event` asks for and feed the result back into
    /// `bar`. Network failures become transient error states on the bar;
    /// typed text and chips are left as they are.
    pub fn dispatch(&self, bar: &mut InputBarStateMachine, event: &InputBarEvent) -> Dispatch {
        let needs_service = matches!(
            event,
            InputBarEvent::ExpansionRequested { .. }
                | InputBarEvent::FillMaskRequested { .. }
                | InputBarEvent::LexiconPrefixRequested { .. }
        );
        if !needs_service {
            return Dispatch::Ignored;
        }
        if !self.is_enabled() {
            debug!("service client disabled; request not sent");
            return Dispatch::Skipped;
        }

        match event {
            InputBarEvent::ExpansionRequested { request } => {
                let lineage = request.abbreviation_spec.lineage_id();
                let response = self.expand(request).unwrap_or_else(|err| {
                    warn!("expansion call failed: {:#}", err);
                    ExpansionResponse::Error {
                        error: format!("{:#}", err),
                    }
                });
                Dispatch::Expansion(bar.on_expansion_response(lineage, response))
            }
            InputBarEvent::FillMaskRequested { request } => {
                let outcome = match self.fill_mask(request) {
                    Ok(response) => bar.on_fill_mask_response(request.request_id, response),
                    Err(err) => {
                        warn!("fill-mask call failed: {:#}", err);
                        bar.on_fill_mask_failure(request.request_id, format!("{:#}", err))
                    }
                };
                Dispatch::FillMask(outcome)
            }
            InputBarEvent::LexiconPrefixRequested { request } => {
                // Completions are for display only.
                let words = self.lexicon(request).unwrap_or_else(|err| {
                    warn!("lexicon call failed: {:#}", err);
                    Vec::new()
                });
                Dispatch::Lexicon(words)
            }
            _ => Dispatch::Ignored,
        }
    }
}

impl Default for SpeakFasterClient {
    fn default() -> Self {
        Self::new(None)
    }
}
