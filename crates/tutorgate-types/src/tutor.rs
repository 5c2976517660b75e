//! Tutor persona profiles.

use serde::{Deserialize, Serialize};

/// A named chat persona bound to a backend model and a system prompt.
///
/// Profiles are created once at registry build time from handler manifests
/// and are immutable afterwards. The `id` is the lookup key across the
/// whole registry; when two handlers declare the same id, the last one
/// registered wins (the registry logs the replacement).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TutorProfile {
    /// Unique tutor identifier (e.g. "math_solver").
    pub id: String,

    /// Human-readable name shown to the frontend.
    pub display_name: String,

    /// Model identifier passed to the generation backend.
    #[serde(alias = "ollama_model")]
    pub backend_model: String,

    /// System prompt injected ahead of the caller's messages.
    pub system_prompt: String,

    /// Display subject (e.g. "Mathematics").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl TutorProfile {
    /// The built-in last-resort profile used when neither the requested
    /// tutor nor the default tutor is registered. Chat resolution never
    /// fails because this profile always exists.
    pub fn fallback() -> Self {
        Self {
            id: "general_tutor".into(),
            display_name: "General Tutor".into(),
            backend_model: "llama3".into(),
            system_prompt: "You are a helpful AI assistant.".into(),
            topic: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_profile_is_generic() {
        let profile = TutorProfile::fallback();
        assert_eq!(profile.id, "general_tutor");
        assert_eq!(profile.backend_model, "llama3");
        assert!(profile.system_prompt.contains("helpful"));
        assert!(profile.topic.is_none());
    }

    #[test]
    fn topic_skipped_when_absent() {
        let profile = TutorProfile::fallback();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("topic"));
    }

    #[test]
    fn accepts_legacy_model_field_name() {
        let json = r#"{
            "id": "math_solver",
            "display_name": "Math Professor",
            "ollama_model": "llama3",
            "system_prompt": "Solve problems step-by-step."
        }"#;
        let profile: TutorProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.backend_model, "llama3");
    }

    #[test]
    fn serde_roundtrip_with_topic() {
        let profile = TutorProfile {
            id: "history_tutor".into(),
            display_name: "History Guide".into(),
            backend_model: "llama3:8b".into(),
            system_prompt: "Explain events in context.".into(),
            topic: Some("History".into()),
        };
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: TutorProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, parsed);
    }
}
