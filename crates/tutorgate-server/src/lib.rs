//! HTTP surface for the tutorgate gateway.
//!
//! Exposes the REST endpoints and the NDJSON chat stream over an axum
//! router. All request semantics live in `tutorgate-core`; this crate only
//! translates between HTTP and the dispatcher.

pub mod api;
pub mod handlers;
pub mod stream;

pub use api::{ApiState, build_router};

use axum::Router;
use tracing::info;

/// Bind `host:port` and serve the router until the process exits.
pub async fn serve(host: &str, port: u16, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host = %host, port, "tutorgate listening");
    axum::serve(listener, router).await
}
