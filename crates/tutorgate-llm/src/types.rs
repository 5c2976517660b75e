//! Request, response, and wire types for generation backend calls.
//!
//! The wire types mirror the Ollama HTTP API. They are standalone and have
//! no dependency on the gateway core.

use serde::{Deserialize, Serialize};
use tutorgate_types::ChatMessage;

/// Sampling options forwarded opaquely to the backend.
///
/// Absent fields are omitted from the request body so the backend applies
/// its own defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateOptions {
    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Penalty applied to repeated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f32>,

    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,

    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
}

/// A single-shot generation request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// The model identifier (e.g. "llama3:8b").
    pub model: String,

    /// The prompt text.
    pub prompt: String,

    /// Sampling options, passed through uninterpreted.
    pub options: GenerateOptions,
}

impl GenerateRequest {
    /// Create a request with default sampling options.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: GenerateOptions::default(),
        }
    }

    /// Replace the sampling options.
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

/// A model known to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    /// Model name, including the size tag (e.g. "llama3:8b").
    pub name: String,
}

// ── Wire types ──────────────────────────────────────────────────────────

/// Body for `POST /api/generate`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: &'a GenerateOptions,
}

/// Response from `POST /api/generate` with `stream: false`.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub response: String,
}

/// Body for `POST /api/chat`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
}

/// One NDJSON line of a streaming `POST /api/chat` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatStreamLine {
    #[serde(default)]
    pub message: Option<ChatStreamMessage>,

    #[serde(default)]
    pub done: bool,

    /// Present when the backend reports a failure mid-stream.
    #[serde(default)]
    pub error: Option<String>,
}

/// The message object within a streamed chat line.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatStreamMessage {
    #[serde(default)]
    pub content: String,
}

/// Response from `GET /api/tags`.
#[derive(Debug, Deserialize)]
pub(crate) struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}
