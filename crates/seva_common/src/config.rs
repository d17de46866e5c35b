//! SevaSphere configuration.
//!
//! Loaded from a TOML file (`--config` flag or /etc/sevasphere/config.toml).
//! A missing file means defaults; a malformed file is a startup error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sevasphere/config.toml";

/// Default SQLite database location
pub const DEFAULT_DB_PATH: &str = "/var/lib/sevasphere/knowledge.db";

/// Generative backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Master switch; when false every responder call fails fast
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Ollama or OpenAI-compatible endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name passed to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional bearer token for OpenAI-compatible endpoints
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Knowledge store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Insert the bundled seed FAQs/PIN codes into an empty database
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            seed: true,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address; localhost by default, the chat UI proxies to us
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

/// Quality-gate tuning. These are heuristics, not semantics; the
/// defaults match what worked in production and can be overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Candidate answers shorter than this are treated as insufficient
    #[serde(default = "default_min_answer_len")]
    pub min_answer_len: usize,

    /// Case-insensitive refusal phrases that fail the gate
    #[serde(default = "default_refusal_phrases")]
    pub refusal_phrases: Vec<String>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_answer_len: default_min_answer_len(),
            refusal_phrases: default_refusal_phrases(),
        }
    }
}

/// Top-level daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SevaConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub quality: QualityConfig,
}

impl SevaConfig {
    /// Load from a specific path. Missing file -> defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:7810".to_string()
}

fn default_min_answer_len() -> usize {
    20
}

fn default_refusal_phrases() -> Vec<String> {
    [
        "i don't know",
        "i do not know",
        "cannot answer",
        "can't answer",
        "unable to find",
        "couldn't find",
        "could not find",
        "no information",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
