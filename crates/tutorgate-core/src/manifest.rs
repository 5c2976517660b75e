//! Handler manifest types.
//!
//! Defines [`HandlerManifest`] -- the plugin descriptor parsed from
//! `tutor.plugin.json` files found under the handler root directory. Each
//! manifest declares which capabilities its domain provides: a chat
//! persona, an analysis service, or both.

use serde::{Deserialize, Serialize};
use tutorgate_types::TutorProfile;

use crate::error::ManifestError;

/// File name the discovery scan looks for in each handler unit.
pub const MANIFEST_FILE_NAME: &str = "tutor.plugin.json";

/// Handler manifest parsed from `tutor.plugin.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerManifest {
    /// Display domain name (e.g. "Cybersecurity", "Art Style").
    pub domain: String,

    /// Capabilities this handler provides.
    pub capabilities: Vec<HandlerCapability>,

    /// Chat persona configuration; required for the `chat` capability.
    #[serde(default)]
    pub tutor: Option<TutorManifest>,

    /// Analysis configuration; required for the `analysis` capability.
    #[serde(default)]
    pub analysis: Option<AnalysisManifest>,
}

/// Handler capability types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerCapability {
    /// Provides a chat persona.
    Chat,
    /// Provides a domain analysis service.
    Analysis,
}

/// Chat persona block within a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorManifest {
    /// Unique tutor identifier (e.g. "math_solver").
    pub id: String,

    /// Human-readable name shown to the frontend.
    pub display_name: String,

    /// Model identifier passed to the generation backend.
    pub model: String,

    /// System prompt injected ahead of the caller's messages.
    pub system_prompt: String,

    /// Display subject (e.g. "Mathematics").
    #[serde(default)]
    pub topic: Option<String>,
}

/// Analysis block within a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisManifest {
    /// Base model name; the request's size suffix is appended at call time
    /// (e.g. "llama3" + "8b" -> "llama3:8b").
    pub model: String,

    /// Short description of what the domain covers, interpolated into the
    /// classifier prompt.
    pub focus: String,

    /// Keywords for the classifier's last-resort heuristic.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl HandlerManifest {
    /// Validate the manifest. Returns the first validation failure, or
    /// `Ok(())` if the manifest is usable.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.domain.trim().is_empty() {
            return Err(ManifestError::Invalid("domain is required".into()));
        }
        if self.capabilities.is_empty() {
            return Err(ManifestError::Invalid(
                "at least one capability is required".into(),
            ));
        }
        if self.capabilities.contains(&HandlerCapability::Chat) {
            let tutor = self.tutor.as_ref().ok_or_else(|| {
                ManifestError::Invalid("chat capability requires a tutor block".into())
            })?;
            if tutor.id.trim().is_empty() {
                return Err(ManifestError::Invalid("tutor: id is required".into()));
            }
            if tutor.model.trim().is_empty() {
                return Err(ManifestError::Invalid("tutor: model is required".into()));
            }
        }
        if self.capabilities.contains(&HandlerCapability::Analysis) {
            let analysis = self.analysis.as_ref().ok_or_else(|| {
                ManifestError::Invalid("analysis capability requires an analysis block".into())
            })?;
            if analysis.model.trim().is_empty() {
                return Err(ManifestError::Invalid("analysis: model is required".into()));
            }
        }
        Ok(())
    }

    /// Parse and validate a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Whether this manifest declares the given capability.
    pub fn has_capability(&self, capability: HandlerCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl TutorManifest {
    /// Build the registry profile for this persona.
    pub fn to_profile(&self) -> TutorProfile {
        TutorProfile {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            backend_model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            topic: self.topic.clone(),
        }
    }
}
