//! Generation backend client for tutorgate.
//!
//! This crate provides the narrow interface between the gateway and the
//! text-generation service, plus the one concrete implementation used in
//! production: an [`OllamaClient`] speaking the Ollama HTTP API.
//!
//! # Architecture
//!
//! - [`GenerationBackend`] trait defines single-shot generation and
//!   streaming chat
//! - [`OllamaClient`] implements it over `POST /api/generate`,
//!   `POST /api/chat` (NDJSON streaming) and `GET /api/tags`
//! - [`ndjson`] parses the backend's streamed chat lines
//! - [`BackendError`] is the error taxonomy for all backend calls
//!
//! Sampling options are passed through opaquely; the gateway core never
//! interprets them.

pub mod backend;
pub mod config;
pub mod error;
pub mod ndjson;
pub mod ollama;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use backend::GenerationBackend;
pub use config::OllamaConfig;
pub use error::{BackendError, Result};
pub use ndjson::{ChatChunk, parse_chat_line};
pub use ollama::OllamaClient;
pub use types::{GenerateOptions, GenerateRequest, ModelInfo};
