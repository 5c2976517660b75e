//! The core [`GenerationBackend`] trait.
//!
//! The gateway core talks to the text-generation service exclusively
//! through this trait; handlers and the dispatcher never see HTTP.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tutorgate_types::ChatMessage;

use crate::error::Result;
use crate::types::{GenerateRequest, ModelInfo};

/// A backend that can execute generation requests.
///
/// The main implementation is [`OllamaClient`](crate::ollama::OllamaClient).
/// Tests use the scripted backend in [`testing`](crate::testing).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Returns the backend name (e.g. "ollama").
    fn name(&self) -> &str;

    /// Execute a single-shot generation request and return the full text.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`](crate::error::BackendError) if the request
    /// fails due to network issues, a missing model, or an invalid
    /// response.
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Stream a chat completion, sending text fragments through `tx` in
    /// the order the backend produced them.
    ///
    /// A dropped receiver stops the read without error. A backend failure
    /// after the stream started is returned as an error; fragments already
    /// sent remain valid.
    async fn chat_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tx: mpsc::Sender<String>,
    ) -> Result<()>;

    /// List the models available on the backend.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}
