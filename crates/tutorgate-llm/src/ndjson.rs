//! NDJSON line parser for streaming chat responses.
//!
//! The Ollama chat API streams newline-delimited JSON objects:
//!
//! ```text
//! {"message":{"role":"assistant","content":"Hel"},"done":false}
//! {"message":{"role":"assistant","content":"lo"},"done":false}
//! {"message":{"role":"assistant","content":""},"done":true}
//! ```
//!
//! A failing backend replaces the line with `{"error":"..."}` and ends the
//! stream.

use crate::error::{BackendError, Result};
use crate::types::ChatStreamLine;

/// A parsed unit of a streaming chat response.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatChunk {
    /// A piece of assistant output.
    Text {
        /// The partial text content.
        text: String,
    },

    /// The stream is complete.
    Done,
}

/// Parse a single NDJSON line into zero or more [`ChatChunk`] values.
///
/// Returns `Ok(vec![])` for blank lines. A line can produce both a text
/// chunk and a `Done` chunk when the backend sends the final token and the
/// completion marker together.
///
/// # Errors
///
/// Returns [`BackendError::Stream`] when the line carries an in-band
/// `error` field, and [`BackendError::InvalidResponse`] when the line is
/// not valid JSON for the stream schema.
pub fn parse_chat_line(line: &str) -> Result<Vec<ChatChunk>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(vec![]);
    }

    let parsed: ChatStreamLine = serde_json::from_str(line)
        .map_err(|e| BackendError::InvalidResponse(format!("failed to parse stream line: {e}")))?;

    if let Some(message) = parsed.error {
        return Err(BackendError::Stream(message));
    }

    let mut chunks = Vec::new();

    if let Some(message) = parsed.message {
        if !message.content.is_empty() {
            chunks.push(ChatChunk::Text {
                text: message.content,
            });
        }
    }

    if parsed.done {
        chunks.push(ChatChunk::Done);
    }

    Ok(chunks)
}
