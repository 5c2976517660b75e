//! Chat conversation types.
//!
//! A chat request carries the caller's message history plus a weak
//! reference to a tutor persona (`tutor_id`), which is resolved against
//! the handler registry at dispatch time.

use serde::{Deserialize, Serialize};

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author (e.g. "system", "user", "assistant").
    pub role: String,

    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an arbitrary role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// A chat request addressed to a tutor persona.
///
/// `tutor_id` is looked up by id when the request is dispatched; an unknown
/// id falls back to the default tutor, so this reference is never dangling
/// from the caller's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered conversation history supplied by the caller.
    pub messages: Vec<ChatMessage>,

    /// The tutor persona to answer as (e.g. "math_solver").
    #[serde(alias = "tutorId")]
    pub tutor_id: String,
}
