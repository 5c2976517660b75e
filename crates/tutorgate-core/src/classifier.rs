//! Model-assisted domain classification.
//!
//! A [`DomainClassifier`] asks the generation backend whether a piece of
//! text belongs to its domain, constraining the model to a two-field JSON
//! object. Model output is unreliable, so parsing degrades through a
//! ladder of fallbacks and a backend failure degrades to "not in domain".
//! Classification never returns an error.

use tracing::{debug, warn};
use tutorgate_llm::{GenerateOptions, GenerateRequest, GenerationBackend};

use crate::manifest::AnalysisManifest;

/// A classifier verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relatedness {
    /// Whether the text belongs to the domain.
    pub related: bool,

    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Relatedness {
    fn new(related: bool, confidence: f32) -> Self {
        Self {
            related,
            confidence,
        }
    }
}

/// Per-domain predicate over free text.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    domain_key: String,
    focus: String,
    keywords: Vec<String>,
    model: String,
}

impl DomainClassifier {
    /// Build a classifier for the given normalized domain key from its
    /// manifest analysis block.
    pub fn new(domain_key: impl Into<String>, manifest: &AnalysisManifest) -> Self {
        Self {
            domain_key: domain_key.into(),
            focus: manifest.focus.clone(),
            keywords: manifest.keywords.clone(),
            model: manifest.model.clone(),
        }
    }

    /// The JSON field the model is asked to set (e.g. "is_cybersecurity").
    fn flag_field(&self) -> String {
        format!("is_{}", self.domain_key)
    }

    fn prompt(&self, text: &str) -> String {
        format!(
            "You are a {domain} domain expert. Analyze if the following text is related to {focus}.\n\
             Respond with a JSON object containing two fields:\n\
             1. \"{flag}\": boolean (true/false)\n\
             2. \"confidence\": float (between 0 and 1)\n\
             \n\
             Text to analyze:\n\
             {text}\n\
             \n\
             Respond only with the JSON object, no other text.",
            domain = self.domain_key,
            focus = self.focus,
            flag = self.flag_field(),
        )
    }

    /// Decide whether `text` belongs to this classifier's domain.
    ///
    /// Issues one constrained generation call and runs the output through
    /// [`parse_verdict`](Self::parse_verdict). A backend failure yields
    /// `(false, 0.0)` rather than an error.
    pub async fn classify(&self, backend: &dyn GenerationBackend, text: &str) -> Relatedness {
        let request = GenerateRequest::new(&self.model, self.prompt(text)).with_options(
            GenerateOptions {
                num_predict: Some(100),
                temperature: Some(0.1),
                top_p: Some(0.95),
                top_k: Some(50),
                ..GenerateOptions::default()
            },
        );

        match backend.generate(&request).await {
            Ok(raw) => {
                let verdict = self.parse_verdict(&raw);
                debug!(
                    domain = %self.domain_key,
                    related = verdict.related,
                    confidence = verdict.confidence,
                    "classified text"
                );
                verdict
            }
            Err(e) => {
                warn!(
                    domain = %self.domain_key,
                    error = %e,
                    "classification call failed, treating as not in domain"
                );
                Relatedness::new(false, 0.0)
            }
        }
    }

    /// Parse a raw model output into a verdict.
    ///
    /// The ladder, in order:
    /// 1. JSON-shaped output is parsed; the flag field defaults to `false`
    ///    and confidence to `0.0` when absent.
    /// 2. Non-JSON output falls back to a token search: "true" anywhere
    ///    gives `(true, 0.8)`, "false" gives `(false, 0.2)`, neither gives
    ///    `(false, 0.0)`.
    /// 3. JSON-shaped but malformed output falls back to the domain
    ///    keyword heuristic: any keyword hit gives `(true, 0.7)`, none
    ///    gives `(false, 0.3)`.
    pub fn parse_verdict(&self, raw: &str) -> Relatedness {
        let trimmed = raw.trim();

        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            match serde_json::from_str::<serde_json::Value>(trimmed) {
                Ok(value) => {
                    let related = value
                        .get(self.flag_field())
                        .and_then(serde_json::Value::as_bool)
                        .unwrap_or(false);
                    let confidence = value
                        .get("confidence")
                        .and_then(serde_json::Value::as_f64)
                        .unwrap_or(0.0) as f32;
                    Relatedness::new(related, confidence.clamp(0.0, 1.0))
                }
                Err(_) => {
                    let lowered = trimmed.to_lowercase();
                    let hit = self
                        .keywords
                        .iter()
                        .any(|keyword| lowered.contains(&keyword.to_lowercase()));
                    if hit {
                        Relatedness::new(true, 0.7)
                    } else {
                        Relatedness::new(false, 0.3)
                    }
                }
            }
        } else {
            let lowered = trimmed.to_lowercase();
            if lowered.contains("true") {
                Relatedness::new(true, 0.8)
            } else if lowered.contains("false") {
                Relatedness::new(false, 0.2)
            } else {
                Relatedness::new(false, 0.0)
            }
        }
    }
}
