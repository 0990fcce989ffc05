//! Client configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All input-bar options from `speakfaster_core::Config` (flattened via serde)
//! - The service endpoint and request timeout
//!
//! # Example
//!
//! ```rust
//! use speakfaster::ClientConfig;
//!
//! let config = ClientConfig::from_toml_str("endpoint = \"http://localhost:8080\"").unwrap();
//! assert!(config.enabled);
//! assert_eq!(config.base().max_head_keywords, 4);
//! ```
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Input-bar fields (limits, triggers, timing)
    #[serde(flatten)]
    pub base: speakfaster_core::Config,

    /// Base URL of the expansion/fill-mask/lexicon services
    pub endpoint: Option<String>,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    pub enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base: speakfaster_core::Config::default(),
            endpoint: None,
            // Expansion runs a language model server-side; allow for it.
            timeout_ms: 5000,
            enabled: true,
        }
    }
}

impl ClientConfig {
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, content).with_context(|| format!("writing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Convert into the base config for `InputBarStateMachine::new()`
    pub fn into_base(self) -> speakfaster_core::Config {
        self.base
    }

    pub fn base(&self) -> &speakfaster_core::Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut speakfaster_core::Config {
        &mut self.base
    }

    /// Whether requests will actually be sent.
    pub fn is_active(&self) -> bool {
        self.enabled && self.endpoint.as_deref().is_some_and(|e| !e.is_empty())
    }
}
