//! Ollama backend implementation.
//!
//! [`OllamaClient`] talks to an Ollama-style HTTP API: single-shot
//! generation via `POST /api/generate`, streaming chat via `POST /api/chat`
//! (newline-delimited JSON), and model listing via `GET /api/tags`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use tutorgate_types::ChatMessage;

use crate::backend::GenerationBackend;
use crate::config::OllamaConfig;
use crate::error::{BackendError, Result};
use crate::ndjson::{ChatChunk, parse_chat_line};
use crate::types::{
    ChatBody, GenerateBody, GenerateRequest, GenerateResponse, ModelInfo, TagsResponse,
};

/// A generation backend speaking the Ollama HTTP API.
pub struct OllamaClient {
    config: OllamaConfig,
    http: reqwest::Client,
}

impl OllamaClient {
    /// Create a new client from configuration.
    ///
    /// The configured timeout applies to single-shot calls only; streaming
    /// chat reads are not bounded, since a healthy stream can legitimately
    /// run longer than any fixed deadline.
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}{path}")
    }

    /// Map a non-success HTTP response into a [`BackendError`].
    async fn error_for_status(model: &str, response: reqwest::Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 404 {
            return BackendError::ModelNotFound(format!("model '{model}': {body}"));
        }

        BackendError::RequestFailed(format!("HTTP {status}: {body}"))
    }
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let url = self.endpoint("/api/generate");

        debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            "sending generation request"
        );

        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: &request.options,
        };

        let response = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(&request.model, response).await);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("failed to parse response: {e}")))?;

        debug!(
            model = %request.model,
            response_len = parsed.response.len(),
            "generation response received"
        );

        Ok(parsed.response)
    }

    async fn chat_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tx: mpsc::Sender<String>,
    ) -> Result<()> {
        let url = self.endpoint("/api/chat");

        debug!(
            model = %model,
            messages = messages.len(),
            "sending streaming chat request"
        );

        let body = ChatBody {
            model,
            messages,
            stream: true,
        };

        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(model, response).await);
        }

        // Read the NDJSON stream line by line.
        use futures_util::StreamExt;
        let mut byte_stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let bytes = chunk_result
                .map_err(|e| BackendError::RequestFailed(format!("stream read error: {e}")))?;

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(newline_pos) = buffer.find('\n') {
                let line = buffer[..newline_pos].to_string();
                buffer = buffer[newline_pos + 1..].to_string();

                let chunks = match parse_chat_line(&line) {
                    Ok(chunks) => chunks,
                    Err(BackendError::Stream(message)) => {
                        return Err(BackendError::Stream(message));
                    }
                    Err(e) => {
                        warn!(error = %e, "unparseable stream line, skipping");
                        continue;
                    }
                };

                for chunk in chunks {
                    match chunk {
                        ChatChunk::Text { text } => {
                            trace!(fragment_len = text.len(), "streaming fragment");
                            // If the receiver is dropped, stop processing.
                            if tx.send(text).await.is_err() {
                                debug!("stream receiver dropped, stopping");
                                return Ok(());
                            }
                        }
                        ChatChunk::Done => {
                            debug!(model = %model, "streaming complete");
                            return Ok(());
                        }
                    }
                }
            }
        }

        // Process any remaining data in the buffer.
        if !buffer.trim().is_empty() {
            match parse_chat_line(&buffer) {
                Ok(chunks) => {
                    for chunk in chunks {
                        if let ChatChunk::Text { text } = chunk {
                            let _ = tx.send(text).await;
                        }
                    }
                }
                Err(BackendError::Stream(message)) => return Err(BackendError::Stream(message)),
                Err(e) => warn!(error = %e, "unparseable trailing stream data"),
            }
        }

        debug!(model = %model, "stream ended without completion marker");
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint("/api/tags");

        let response = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::RequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("failed to parse tags: {e}")))?;

        Ok(tags.models)
    }
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_construction() {
        let client = OllamaClient::new(OllamaConfig::default());
        assert_eq!(
            client.endpoint("/api/generate"),
            "http://localhost:11434/api/generate"
        );
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://ollama:11434/".into(),
            ..OllamaConfig::default()
        });
        assert_eq!(client.endpoint("/api/chat"), "http://ollama:11434/api/chat");
    }

    #[test]
    fn debug_output() {
        let client = OllamaClient::new(OllamaConfig::default());
        let debug = format!("{client:?}");
        assert!(debug.contains("OllamaClient"));
        assert!(debug.contains("11434"));
    }
}
