//! Request dispatch.
//!
//! The [`Dispatcher`] resolves inbound requests against the frozen
//! registry and invokes the generation backend or the matching analysis
//! handler. The two paths fail differently on purpose: chat always
//! resolves (a built-in persona is the last resort) and delivers backend
//! failures in-band, while analysis legitimately reports "no domain
//! coverage" as an error.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tutorgate_llm::GenerationBackend;
use tutorgate_types::{
    AnalysisRequest, AnalysisResult, ChatMessage, ChatRequest, StreamFragment, TutorProfile,
};

use crate::domain::{DEFAULT_DOMAIN, normalize_domain};
use crate::error::DispatchError;
use crate::handler::AnalysisHandler;
use crate::registry::HandlerRegistry;

/// The well-known id tried when the requested tutor is not registered.
pub const DEFAULT_TUTOR_ID: &str = "general_tutor";

/// Resolves requests against the registry and invokes handlers.
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    backend: Arc<dyn GenerationBackend>,
}

impl Dispatcher {
    /// Create a dispatcher over a frozen registry and a backend.
    pub fn new(registry: Arc<HandlerRegistry>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self { registry, backend }
    }

    /// The registry this dispatcher reads from.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Resolve a tutor id to a profile.
    ///
    /// Three tiers, in order: exact id, then [`DEFAULT_TUTOR_ID`], then
    /// the built-in fallback profile. Each outcome is logged distinctly;
    /// resolution never fails.
    pub fn resolve_tutor(&self, tutor_id: &str) -> TutorProfile {
        if let Some(profile) = self.registry.tutor(tutor_id) {
            debug!(tutor_id = %tutor_id, "resolved tutor by id");
            return profile.clone();
        }

        warn!(
            tutor_id = %tutor_id,
            "tutor id not found, defaulting to general tutor"
        );
        if let Some(profile) = self.registry.tutor(DEFAULT_TUTOR_ID) {
            return profile.clone();
        }

        warn!("general tutor not registered, using built-in fallback profile");
        TutorProfile::fallback()
    }

    /// Stream a chat response, sending fragments through `tx`.
    ///
    /// The caller's messages are never mutated or reordered; the resolved
    /// profile's system prompt is prepended as a fresh system message. A
    /// backend failure mid-stream is converted into one terminal error
    /// fragment -- the transport never sees it as an error, because the
    /// response has already started.
    pub async fn chat(&self, request: ChatRequest, tx: mpsc::Sender<StreamFragment>) {
        let profile = self.resolve_tutor(&request.tutor_id);

        info!(
            tutor = %profile.display_name,
            model = %profile.backend_model,
            "starting chat"
        );

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage::system(&profile.system_prompt));
        messages.extend(request.messages);

        let backend = self.backend.clone();
        let model = profile.backend_model.clone();
        let (fragment_tx, mut fragment_rx) = mpsc::channel::<String>(32);

        let stream_task =
            tokio::spawn(async move { backend.chat_stream(&model, &messages, fragment_tx).await });

        while let Some(text) = fragment_rx.recv().await {
            if tx.send(StreamFragment::text(text)).await.is_err() {
                // Client went away; stop forwarding. The backend task
                // notices its closed channel on the next fragment.
                debug!("chat client disconnected mid-stream");
                return;
            }
        }

        match stream_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(
                    model = %profile.backend_model,
                    error = %e,
                    "chat stream failed"
                );
                let _ = tx
                    .send(StreamFragment::error(format!(
                        "error with model '{}': {e}",
                        profile.backend_model
                    )))
                    .await;
            }
            Err(e) => {
                error!(error = %e, "chat stream task panicked");
                let _ = tx
                    .send(StreamFragment::error(format!(
                        "error with model '{}': internal failure",
                        profile.backend_model
                    )))
                    .await;
            }
        }
    }

    /// Resolve the analysis handler for a raw domain string.
    ///
    /// Exact lookup on the normalized domain, then the `general` handler;
    /// when both miss, analysis genuinely has no coverage and the miss is
    /// reported rather than swallowed.
    fn resolve_analyzer(
        &self,
        raw_domain: Option<&str>,
    ) -> Result<(String, &Arc<dyn AnalysisHandler>), DispatchError> {
        let key = normalize_domain(raw_domain);

        if let Some(handler) = self.registry.analyzer(&key) {
            debug!(domain = %key, "resolved analysis handler");
            return Ok((key, handler));
        }

        warn!(
            domain = %key,
            "no analysis handler for domain, trying general fallback"
        );
        if let Some(handler) = self.registry.analyzer(DEFAULT_DOMAIN) {
            return Ok((key, handler));
        }

        Err(DispatchError::NoServiceAvailable { domain: key })
    }

    /// Dispatch an analysis request.
    ///
    /// The handler's result is returned verbatim. A handler failure is
    /// caught here, logged with handler identity and request domain, and
    /// surfaced as a uniform internal-error condition.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, DispatchError> {
        let (requested_domain, handler) = self.resolve_analyzer(request.domain.as_deref())?;

        match handler.analyze(request).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(
                    handler = %handler.domain(),
                    domain = %requested_domain,
                    error = %e,
                    "analysis handler failed"
                );
                Err(DispatchError::HandlerFailed {
                    domain: handler.domain().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}
