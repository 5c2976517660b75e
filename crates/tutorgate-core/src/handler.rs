//! The [`AnalysisHandler`] trait.

use async_trait::async_trait;
use tutorgate_types::{AnalysisRequest, AnalysisResult};

use crate::error::HandlerError;

/// A domain-specific text analysis capability.
///
/// Handlers are registered under their normalized domain key and invoked
/// by the dispatcher after domain resolution. A handler owns its whole
/// pipeline -- domain classification included -- and returns "not in
/// domain" as a successful result, never as an error.
#[async_trait]
pub trait AnalysisHandler: Send + Sync {
    /// The normalized domain key this handler is registered under.
    fn domain(&self) -> &str;

    /// Analyze the request text and produce a result.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the generation backend fails during
    /// analysis. The dispatcher catches this at its boundary and converts
    /// it into a uniform internal-error condition.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, HandlerError>;
}
