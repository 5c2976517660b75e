//! Handler registry and request dispatch for tutorgate.
//!
//! This crate is the gateway's core: it discovers domain handler plugins
//! from manifest files at startup, freezes them into a [`HandlerRegistry`],
//! and resolves incoming chat and analysis requests against that registry
//! with graceful fallback.
//!
//! # Architecture
//!
//! - [`HandlerManifest`] is the plugin descriptor parsed from
//!   `tutor.plugin.json` files
//! - [`HandlerRegistry`] holds the frozen tutor and analyzer maps
//! - [`DomainClassifier`] decides whether text belongs to a handler's
//!   domain, degrading gracefully under unreliable model output
//! - [`DomainAnalyzer`] is the manifest-driven [`AnalysisHandler`]
//! - [`Dispatcher`] resolves requests and isolates handler failures
//!
//! The registry is built fully before serving begins and never mutated
//! afterwards, so concurrent dispatch needs no synchronization.

pub mod analyzer;
pub mod classifier;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod handler;
pub mod manifest;
pub mod registry;

pub use analyzer::DomainAnalyzer;
pub use classifier::{DomainClassifier, Relatedness};
pub use dispatcher::{DEFAULT_TUTOR_ID, Dispatcher};
pub use domain::{DEFAULT_DOMAIN, normalize_domain};
pub use error::{DispatchError, HandlerError, ManifestError};
pub use handler::AnalysisHandler;
pub use manifest::{AnalysisManifest, HandlerCapability, HandlerManifest, TutorManifest};
pub use registry::HandlerRegistry;
