//! Manifest-driven domain analyzer.
//!
//! [`DomainAnalyzer`] is the one concrete [`AnalysisHandler`]: every
//! analysis-capable manifest yields an instance parameterized by its
//! domain, model, and classifier settings. The analysis itself is two
//! generation calls -- a summary and a learning roadmap -- gated by the
//! domain classifier.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use tutorgate_llm::{GenerateOptions, GenerateRequest, GenerationBackend};
use tutorgate_types::{AnalysisContext, AnalysisRequest, AnalysisResult};

use crate::classifier::DomainClassifier;
use crate::error::HandlerError;
use crate::handler::AnalysisHandler;
use crate::manifest::AnalysisManifest;

/// Marker line the summary prompt asks for; advanced analysis extracts the
/// concept list from it.
const KEY_CONCEPTS_MARKER: &str = "Key Concepts:";

/// Marker line for the difficulty assessment.
const DIFFICULTY_MARKER: &str = "Difficulty Level:";

/// A domain analysis handler built from a manifest.
pub struct DomainAnalyzer {
    domain_key: String,
    display_domain: String,
    base_model: String,
    classifier: DomainClassifier,
    backend: Arc<dyn GenerationBackend>,
}

impl DomainAnalyzer {
    /// Build an analyzer for the given normalized key and display domain.
    pub fn new(
        domain_key: impl Into<String>,
        display_domain: impl Into<String>,
        manifest: &AnalysisManifest,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        let domain_key = domain_key.into();
        Self {
            classifier: DomainClassifier::new(domain_key.clone(), manifest),
            domain_key,
            display_domain: display_domain.into(),
            base_model: manifest.model.clone(),
            backend,
        }
    }

    /// Resolve the full model name for the request's size suffix.
    fn model_for(&self, size: &str) -> String {
        format!("{}:{}", self.base_model, size)
    }

    fn sampling_options() -> GenerateOptions {
        GenerateOptions {
            num_predict: Some(2000),
            temperature: Some(0.8),
            top_p: Some(0.95),
            top_k: Some(50),
            repeat_penalty: Some(1.2),
            presence_penalty: Some(0.1),
            frequency_penalty: Some(0.1),
        }
    }

    fn context_block(context: Option<&AnalysisContext>) -> String {
        let Some(context) = context else {
            return String::new();
        };
        format!(
            "Context information:\n\
             - Subject: {}\n\
             - Level: {}\n\
             - Format: {}\n",
            context.subject.as_deref().unwrap_or("Not specified"),
            context.level.as_deref().unwrap_or("Not specified"),
            context.format.as_deref().unwrap_or("Not specified"),
        )
    }

    fn summary_prompt(&self, request: &AnalysisRequest, query_type: &str) -> String {
        format!(
            "You are a {domain} domain expert. Analyze the following {domain} text and provide \
             a comprehensive analysis. The text is of type: {query_type}.\n\
             {context}\
             Please follow these steps:\n\
             1. Identify the different types of {domain} content in the text\n\
             2. For each type, provide a detailed overview highlighting the main points, key \
             information, and underlying themes\n\
             3. Provide an overall summary that ties everything together\n\
             {advanced}\
             \n\
             Text content:\n\
             {text}",
            domain = self.display_domain,
            query_type = query_type,
            context = Self::context_block(request.context.as_ref()),
            advanced = if request.advanced_analysis {
                format!(
                    "4. Also include a line '{KEY_CONCEPTS_MARKER}' followed by a comma-separated \
                     list of the main concepts, and a line '{DIFFICULTY_MARKER}' with a one-word \
                     complexity assessment\n"
                )
            } else {
                String::new()
            },
            text = request.text,
        )
    }

    fn roadmap_prompt(&self, request: &AnalysisRequest, query_type: &str) -> String {
        format!(
            "You are a {domain} education expert. Based on the following {domain} text, create \
             a detailed learning roadmap. The text is of type: {query_type}.\n\
             {context}\
             Please:\n\
             1. Identify the {domain} topics, their complexity, and the prerequisites\n\
             2. Create a learning path that starts with foundational concepts and progresses \
             through the content, with practice opportunities\n\
             3. Suggest a study schedule with milestones and recommended supplementary \
             resources\n\
             \n\
             Text content:\n\
             {text}",
            domain = self.display_domain,
            query_type = query_type,
            context = Self::context_block(request.context.as_ref()),
            text = request.text,
        )
    }

    /// The out-of-domain result shape: a successful response, not an
    /// error.
    fn out_of_domain_result(&self, confidence: f32) -> AnalysisResult {
        AnalysisResult {
            summary: format!(
                "This query appears to be outside the {} domain. This service is specialized in \
                 {}-related content only.",
                self.display_domain, self.display_domain
            ),
            roadmap: format!("N/A - Content is not {}-related", self.display_domain),
            key_concepts: Some(Vec::new()),
            difficulty_level: Some("N/A".into()),
            domain_match: false,
            domain_confidence: confidence,
        }
    }
}

/// Extract the remainder of the line following `marker`, if present.
fn extract_after_marker<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];
    let line = rest.lines().next().unwrap_or(rest);
    Some(line.trim())
}

/// Parse the comma-separated concept list from a summary.
fn extract_key_concepts(summary: &str) -> Vec<String> {
    extract_after_marker(summary, KEY_CONCEPTS_MARKER)
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|concept| !concept.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the difficulty assessment from a summary, defaulting to "Medium".
fn extract_difficulty(summary: &str) -> String {
    extract_after_marker(summary, DIFFICULTY_MARKER)
        .filter(|level| !level.is_empty())
        .map(String::from)
        .unwrap_or_else(|| "Medium".into())
}

#[async_trait]
impl AnalysisHandler for DomainAnalyzer {
    fn domain(&self) -> &str {
        &self.domain_key
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, HandlerError> {
        let verdict = self.classifier.classify(self.backend.as_ref(), &request.text).await;

        if !verdict.related {
            info!(
                domain = %self.domain_key,
                confidence = verdict.confidence,
                "text judged outside domain"
            );
            return Ok(self.out_of_domain_result(verdict.confidence));
        }

        let model = self.model_for(&request.model_size);
        let query_type = request.query_type.as_deref().unwrap_or(&self.domain_key);

        debug!(
            domain = %self.domain_key,
            model = %model,
            advanced = request.advanced_analysis,
            "running domain analysis"
        );

        let summary = self
            .backend
            .generate(
                &GenerateRequest::new(&model, self.summary_prompt(request, query_type))
                    .with_options(Self::sampling_options()),
            )
            .await?;

        let roadmap = self
            .backend
            .generate(
                &GenerateRequest::new(&model, self.roadmap_prompt(request, query_type))
                    .with_options(Self::sampling_options()),
            )
            .await?;

        let (key_concepts, difficulty_level) = if request.advanced_analysis {
            (
                Some(extract_key_concepts(&summary)),
                Some(extract_difficulty(&summary)),
            )
        } else {
            (None, None)
        };

        Ok(AnalysisResult {
            summary,
            roadmap,
            key_concepts,
            difficulty_level,
            domain_match: true,
            domain_confidence: verdict.confidence,
        })
    }
}

impl std::fmt::Debug for DomainAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainAnalyzer")
            .field("domain", &self.domain_key)
            .field("base_model", &self.base_model)
            .finish()
    }
}
