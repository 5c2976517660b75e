//! Client configuration for the Ollama backend.
//!
//! Named `OllamaConfig` to avoid collision with
//! `tutorgate_types::config::BackendSettings` (the user-facing config
//! schema); the CLI maps one to the other at startup.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Connection settings for an Ollama-style generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the backend API (e.g. "http://localhost:11434").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
