//! Wire fragments for the newline-delimited chat stream.

use serde::{Deserialize, Serialize};

/// One line of the NDJSON chat stream.
///
/// A fragment is either a piece of model output (`{"text": ...}`) or a
/// terminal error (`{"error": ...}`). Consumers must treat an error
/// fragment as the end of the stream; the gateway never emits further
/// text after one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StreamFragment {
    /// An incremental piece of model output.
    Text {
        /// The partial text content.
        text: String,
    },

    /// A terminal error delivered in-band, after the HTTP response has
    /// already started.
    Error {
        /// Human-readable error message.
        error: String,
    },
}

impl StreamFragment {
    /// Create a text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an error fragment.
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    /// Whether this fragment terminates the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
