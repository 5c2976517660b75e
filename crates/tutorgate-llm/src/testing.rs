//! Scripted in-memory backend for tests.
//!
//! Enabled for dependent crates via the `test-util` feature. The backend
//! replays pre-seeded generation outcomes and stream fragments so
//! classifier, dispatcher, and server tests run without HTTP.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tutorgate_types::ChatMessage;

use crate::backend::GenerationBackend;
use crate::error::{BackendError, Result};
use crate::types::{GenerateRequest, ModelInfo};

/// A [`GenerationBackend`] that replays scripted outcomes.
///
/// Single-shot generations are consumed front-to-back from a queue; the
/// chat stream emits the seeded fragments and then finishes with the
/// seeded outcome (success, or a backend error after the fragments).
#[derive(Default)]
pub struct ScriptedBackend {
    generations: Mutex<VecDeque<Result<String>>>,
    fragments: Mutex<Vec<String>>,
    stream_failure: Mutex<Option<BackendError>>,
    models: Mutex<Vec<ModelInfo>>,
    /// Every generate request seen, for assertions on prompts and options.
    generate_calls: Mutex<Vec<GenerateRequest>>,
    /// Every chat call seen, as (model, messages).
    chat_calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl ScriptedBackend {
    /// Create an empty scripted backend. Unscripted generate calls fail
    /// with a `RequestFailed` error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful generation response.
    pub fn push_generation(self, text: impl Into<String>) -> Self {
        self.generations
            .lock()
            .expect("poisoned")
            .push_back(Ok(text.into()));
        self
    }

    /// Queue a failing generation response.
    pub fn push_generation_error(self, error: BackendError) -> Self {
        self.generations
            .lock()
            .expect("poisoned")
            .push_back(Err(error));
        self
    }

    /// Set the fragments emitted by `chat_stream`.
    pub fn with_stream(self, fragments: &[&str]) -> Self {
        *self.fragments.lock().expect("poisoned") =
            fragments.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Make `chat_stream` fail with `error` after emitting its fragments.
    pub fn failing_stream(self, error: BackendError) -> Self {
        *self.stream_failure.lock().expect("poisoned") = Some(error);
        self
    }

    /// Set the models returned by `list_models`.
    pub fn with_models(self, names: &[&str]) -> Self {
        *self.models.lock().expect("poisoned") = names
            .iter()
            .map(|name| ModelInfo {
                name: (*name).to_string(),
            })
            .collect();
        self
    }

    /// The generate requests issued so far.
    pub fn generate_calls(&self) -> Vec<GenerateRequest> {
        self.generate_calls.lock().expect("poisoned").clone()
    }

    /// The chat calls issued so far, as (model, messages).
    pub fn chat_calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.chat_calls.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        self.generate_calls
            .lock()
            .expect("poisoned")
            .push(request.clone());
        self.generations
            .lock()
            .expect("poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::RequestFailed("no scripted response".into())))
    }

    async fn chat_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tx: mpsc::Sender<String>,
    ) -> Result<()> {
        self.chat_calls
            .lock()
            .expect("poisoned")
            .push((model.to_string(), messages.to_vec()));
        let fragments = self.fragments.lock().expect("poisoned").clone();
        for fragment in fragments {
            if tx.send(fragment).await.is_err() {
                return Ok(());
            }
        }
        match self.stream_failure.lock().expect("poisoned").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(self.models.lock().expect("poisoned").clone())
    }
}

impl std::fmt::Debug for ScriptedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedBackend").finish_non_exhaustive()
    }
}
