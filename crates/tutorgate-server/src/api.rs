//! Router construction and shared handler state.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tutorgate_core::{Dispatcher, HandlerRegistry};
use tutorgate_llm::GenerationBackend;

use crate::handlers;

/// Shared state accessible by all API handlers.
///
/// Everything in here is built once at startup and read-only afterwards;
/// cloning the state clones a handful of `Arc`s.
#[derive(Clone)]
pub struct ApiState {
    /// Request dispatcher over the frozen registry.
    pub dispatcher: Arc<Dispatcher>,

    /// The registry, for listing endpoints.
    pub registry: Arc<HandlerRegistry>,

    /// Direct backend access, for the model listing endpoint.
    pub backend: Arc<dyn GenerationBackend>,
}

/// Build the API router with all routes and layers.
///
/// An empty `cors_origins` list yields permissive CORS; otherwise only the
/// given origins are allowed.
pub fn build_router(state: ApiState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    handlers::routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("registry", &self.registry)
            .finish()
    }
}
