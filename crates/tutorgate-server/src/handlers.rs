//! HTTP request handlers for the gateway API.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::mpsc;
use tutorgate_core::DispatchError;
use tutorgate_llm::BackendError;
use tutorgate_types::{AnalysisRequest, AnalysisResult, ChatRequest, TutorProfile};

use crate::api::ApiState;
use crate::stream;

/// Build all routes.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/", get(root))
        .route("/api/tutors", get(list_tutors))
        .route("/api/chat", post(chat))
        .route("/api/models", get(list_models))
        .route("/analyze", post(analyze))
}

/// Errors returned to HTTP clients as `{"error": message}` bodies.
///
/// Only message strings cross this boundary; internal error structure
/// stays in the logs.
#[derive(Debug)]
pub enum ApiError {
    /// A dispatch failure; carries its own status semantics.
    Dispatch(DispatchError),

    /// A direct backend failure (model listing).
    Backend(BackendError),
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Dispatch(err @ DispatchError::NoServiceAvailable { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            Self::Dispatch(err @ DispatchError::HandlerFailed { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::Backend(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Liveness message.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "tutorgate is running (tutor + analysis)"
    }))
}

/// All registered tutor profiles.
async fn list_tutors(State(state): State<ApiState>) -> Json<Vec<TutorProfile>> {
    Json(state.registry.tutors())
}

/// Stream a chat response as newline-delimited JSON.
///
/// The dispatcher runs on its own task and feeds the response body through
/// a channel, so fragments reach the client as the backend produces them.
async fn chat(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    let (tx, rx) = mpsc::channel(32);
    let dispatcher = state.dispatcher.clone();

    tokio::spawn(async move {
        dispatcher.chat(request, tx).await;
    });

    stream::ndjson_response(rx)
}

/// Dispatch an analysis request.
async fn analyze(
    State(state): State<ApiState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let result = state.dispatcher.analyze(&request).await?;
    Ok(Json(result))
}

/// Models available on the generation backend.
async fn list_models(State(state): State<ApiState>) -> Result<Json<serde_json::Value>, ApiError> {
    let models = state.backend.list_models().await?;
    Ok(Json(serde_json::json!({ "models": models })))
}
