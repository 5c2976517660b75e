//! Error types for the gateway core.

use thiserror::Error;
use tutorgate_llm::BackendError;

/// Errors raised while loading a single handler manifest.
///
/// These are discovery errors: the registry scan logs them and moves on to
/// the next handler unit, so a broken plugin never aborts startup.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest was not valid JSON.
    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest parsed but failed validation.
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// Errors raised by an analysis handler while processing a request.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The generation backend call failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Errors surfaced by the dispatcher on the analysis path.
///
/// The chat path has no dispatch error: a hard-coded last-resort persona
/// always exists, and backend failures are delivered in-band as stream
/// fragments.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No handler covers the requested domain and no `general` fallback is
    /// registered.
    #[error("no analysis service available for domain '{domain}'")]
    NoServiceAvailable {
        /// The normalized domain that failed to resolve.
        domain: String,
    },

    /// The resolved handler failed; the message is safe to show to
    /// callers.
    #[error("analysis failed: {message}")]
    HandlerFailed {
        /// The handler's normalized domain.
        domain: String,
        /// Human-readable failure description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_error_display() {
        let err = ManifestError::Invalid("domain is required".into());
        assert_eq!(err.to_string(), "invalid manifest: domain is required");
    }

    #[test]
    fn handler_error_wraps_backend() {
        let err: HandlerError = BackendError::Timeout.into();
        assert_eq!(err.to_string(), "backend error: timeout");
    }

    #[test]
    fn dispatch_error_display() {
        let err = DispatchError::NoServiceAvailable {
            domain: "art_style".into(),
        };
        assert_eq!(
            err.to_string(),
            "no analysis service available for domain 'art_style'"
        );

        let err = DispatchError::HandlerFailed {
            domain: "math".into(),
            message: "backend error: timeout".into(),
        };
        assert_eq!(err.to_string(), "analysis failed: backend error: timeout");
    }
}
