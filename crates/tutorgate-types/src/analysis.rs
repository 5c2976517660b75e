//! Document analysis request and response types.
//!
//! Field names accept both snake_case and camelCase spellings via
//! `#[serde(alias)]` so existing frontends keep working unchanged.

use serde::{Deserialize, Serialize};

fn default_model_size() -> String {
    "8b".into()
}

/// Optional caller-supplied study context forwarded to the handler prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// A request to analyze a block of text against a domain handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// The text to analyze.
    pub text: String,

    /// Free-form label describing the kind of query (e.g. "cybersecurity").
    /// Defaults to the resolved handler's domain when absent.
    #[serde(default, alias = "queryType", skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,

    /// Backend model size suffix (e.g. "8b", "70b").
    #[serde(default = "default_model_size", alias = "modelSize")]
    pub model_size: String,

    /// When set, the handler extracts key concepts and a difficulty level
    /// in addition to the summary and roadmap.
    #[serde(default, alias = "advancedAnalysis")]
    pub advanced_analysis: bool,

    /// Requested domain (display form, e.g. "Art Style"). Normalized before
    /// registry lookup; absent means the general handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Optional study context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<AnalysisContext>,
}

impl AnalysisRequest {
    /// Minimal request for the given text, with every optional field at its
    /// default.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            query_type: None,
            model_size: default_model_size(),
            advanced_analysis: false,
            domain: None,
            context: None,
        }
    }
}

/// The result of a domain analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    /// Comprehensive summary of the analyzed text.
    pub summary: String,

    /// Suggested learning roadmap.
    pub roadmap: String,

    /// Ordered key concepts, present only for advanced analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_concepts: Option<Vec<String>>,

    /// Assessed difficulty, present only for advanced analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,

    /// Whether the text was judged to belong to the handler's domain.
    pub domain_match: bool,

    /// Classifier confidence in `[0, 1]`.
    pub domain_confidence: f32,
}
