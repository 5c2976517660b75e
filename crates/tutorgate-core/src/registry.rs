//! Handler discovery and the frozen registry.
//!
//! [`HandlerRegistry::discover`] walks the handler root directory for
//! `tutor.plugin.json` manifests and builds two lookup maps: tutor id to
//! chat persona, and normalized domain to analysis handler. Discovery runs
//! exactly once at process start; the registry is then shared behind an
//! `Arc` and never mutated, so request handling reads it without locks.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tutorgate_llm::GenerationBackend;
use tutorgate_types::TutorProfile;
use walkdir::WalkDir;

use crate::analyzer::DomainAnalyzer;
use crate::domain::normalize_domain;
use crate::error::ManifestError;
use crate::handler::AnalysisHandler;
use crate::manifest::{HandlerCapability, HandlerManifest, MANIFEST_FILE_NAME};

/// The frozen maps of discovered handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    tutors: HashMap<String, TutorProfile>,
    analyzers: HashMap<String, Arc<dyn AnalysisHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry. Useful for tests; production registries
    /// come from [`discover`](Self::discover).
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` for handler manifests and build the registry.
    ///
    /// Each discovered manifest may contribute a tutor persona, an
    /// analysis handler, or both. A failure to load one manifest is logged
    /// and skipped; partial registries are valid. The walk order is sorted
    /// by file name, so the result is a pure function of the directory
    /// contents (with last-write-wins on key collisions).
    pub fn discover(root: &Path, backend: Arc<dyn GenerationBackend>) -> Self {
        info!(root = %root.display(), "loading handler manifests");

        let mut registry = Self::new();

        if !root.exists() {
            warn!(root = %root.display(), "handler directory not found");
            return registry;
        }

        let walk = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_name() == MANIFEST_FILE_NAME);

        for entry in walk {
            match load_manifest(entry.path()) {
                Ok(manifest) => registry.register(&manifest, backend.clone()),
                Err(e) => {
                    warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "failed to load handler manifest, skipping"
                    );
                }
            }
        }

        info!(
            tutors = registry.tutors.len(),
            analyzers = registry.analyzers.len(),
            "handler discovery complete"
        );

        registry
    }

    /// Register everything a manifest provides.
    fn register(&mut self, manifest: &HandlerManifest, backend: Arc<dyn GenerationBackend>) {
        if manifest.has_capability(HandlerCapability::Chat) {
            // Validation guarantees the block is present for the capability.
            if let Some(tutor) = &manifest.tutor {
                info!(
                    tutor_id = %tutor.id,
                    display_name = %tutor.display_name,
                    "loaded tutor"
                );
                self.register_tutor(tutor.to_profile());
            }
        }

        if manifest.has_capability(HandlerCapability::Analysis) {
            if let Some(analysis) = &manifest.analysis {
                let key = normalize_domain(Some(&manifest.domain));
                let analyzer =
                    DomainAnalyzer::new(key.clone(), manifest.domain.clone(), analysis, backend);
                info!(domain = %key, "loaded analysis handler");
                self.register_analyzer(Arc::new(analyzer));
            }
        }
    }

    /// Insert a tutor profile, replacing any previous holder of the id.
    pub fn register_tutor(&mut self, profile: TutorProfile) {
        if let Some(previous) = self.tutors.insert(profile.id.clone(), profile) {
            warn!(
                tutor_id = %previous.id,
                "replacing previously registered tutor"
            );
        }
    }

    /// Insert an analysis handler, replacing any previous holder of its
    /// domain key.
    pub fn register_analyzer(&mut self, handler: Arc<dyn AnalysisHandler>) {
        let key = handler.domain().to_string();
        if self.analyzers.insert(key.clone(), handler).is_some() {
            warn!(
                domain = %key,
                "replacing previously registered analysis handler"
            );
        }
    }

    /// Look up a tutor profile by id.
    pub fn tutor(&self, id: &str) -> Option<&TutorProfile> {
        self.tutors.get(id)
    }

    /// Look up an analysis handler by normalized domain key.
    pub fn analyzer(&self, domain: &str) -> Option<&Arc<dyn AnalysisHandler>> {
        self.analyzers.get(domain)
    }

    /// All registered tutor profiles, sorted by id.
    pub fn tutors(&self) -> Vec<TutorProfile> {
        let mut profiles: Vec<TutorProfile> = self.tutors.values().cloned().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        profiles
    }

    /// All registered analysis domain keys, sorted.
    pub fn analysis_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.analyzers.keys().cloned().collect();
        domains.sort();
        domains
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("tutors", &self.tutors.keys().collect::<Vec<_>>())
            .field("analyzers", &self.analyzers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Load and validate a manifest file.
fn load_manifest(path: &Path) -> Result<HandlerManifest, ManifestError> {
    let raw = std::fs::read_to_string(path)?;
    HandlerManifest::from_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_lookups() {
        let registry = HandlerRegistry::new();
        assert!(registry.tutor("anything").is_none());
        assert!(registry.analyzer("general").is_none());
        assert!(registry.tutors().is_empty());
        assert!(registry.analysis_domains().is_empty());
    }

    #[test]
    fn tutor_collision_last_write_wins() {
        let mut registry = HandlerRegistry::new();
        let mut first = TutorProfile::fallback();
        first.display_name = "First".into();
        let mut second = TutorProfile::fallback();
        second.display_name = "Second".into();

        registry.register_tutor(first);
        registry.register_tutor(second);

        assert_eq!(registry.tutors().len(), 1);
        assert_eq!(registry.tutor("general_tutor").unwrap().display_name, "Second");
    }

    #[test]
    fn tutors_sorted_by_id() {
        let mut registry = HandlerRegistry::new();
        for id in ["zeta", "alpha", "mid"] {
            let mut profile = TutorProfile::fallback();
            profile.id = id.into();
            registry.register_tutor(profile);
        }
        let ids: Vec<String> = registry.tutors().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }
}
