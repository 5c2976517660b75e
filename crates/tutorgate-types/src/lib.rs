//! Shared types for the tutorgate gateway.
//!
//! This crate holds the wire-level request/response types exchanged with
//! clients, the tutor profile model, and the gateway configuration schema.
//! It is a standalone library with no dependency on other tutorgate crates
//! and performs no I/O beyond reading a configuration file.

pub mod analysis;
pub mod chat;
pub mod config;
pub mod stream;
pub mod tutor;

pub use analysis::{AnalysisContext, AnalysisRequest, AnalysisResult};
pub use chat::{ChatMessage, ChatRequest};
pub use config::{BackendSettings, ConfigError, GatewayConfig};
pub use stream::StreamFragment;
pub use tutor::TutorProfile;
