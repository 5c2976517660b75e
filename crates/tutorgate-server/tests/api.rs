//! End-to-end router tests.
//!
//! Drives the axum router with `tower::ServiceExt::oneshot` over a
//! scripted backend, covering every route: liveness, tutor listing, chat
//! streaming (success and mid-stream failure), analysis dispatch (success,
//! 404, 500), and model listing.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tutorgate_core::{
    AnalysisManifest, Dispatcher, DomainAnalyzer, HandlerRegistry,
};
use tutorgate_llm::BackendError;
use tutorgate_llm::testing::ScriptedBackend;
use tutorgate_server::{ApiState, build_router};
use tutorgate_types::{AnalysisResult, StreamFragment, TutorProfile};

fn cyber_manifest() -> AnalysisManifest {
    AnalysisManifest {
        model: "llama3".into(),
        focus: "cybersecurity and digital protection".into(),
        keywords: vec!["security".into(), "cyber".into()],
    }
}

/// Build a router over the given backend, with a math tutor and a
/// cybersecurity analyzer registered.
fn router_with(backend: ScriptedBackend) -> Router {
    let backend: Arc<ScriptedBackend> = Arc::new(backend);

    let mut registry = HandlerRegistry::new();
    registry.register_tutor(TutorProfile {
        id: "math_solver".into(),
        display_name: "Math Professor".into(),
        backend_model: "llama3".into(),
        system_prompt: "Solve problems step-by-step.".into(),
        topic: Some("Mathematics".into()),
    });
    registry.register_analyzer(Arc::new(DomainAnalyzer::new(
        "cybersecurity",
        "Cybersecurity",
        &cyber_manifest(),
        backend.clone(),
    )));

    let registry = Arc::new(registry);
    let dispatcher = Arc::new(Dispatcher::new(registry.clone(), backend.clone()));

    build_router(
        ApiState {
            dispatcher,
            registry,
            backend,
        },
        &[],
    )
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_lines(response: axum::response::Response) -> Vec<StreamFragment> {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn root_liveness() {
    let router = router_with(ScriptedBackend::new());

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("tutorgate is running")
    );
}

#[tokio::test]
async fn tutors_listing() {
    let router = router_with(ScriptedBackend::new());

    let response = router
        .oneshot(Request::get("/api/tutors").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let tutors = body.as_array().unwrap();
    assert_eq!(tutors.len(), 1);
    assert_eq!(tutors[0]["id"], "math_solver");
    assert_eq!(tutors[0]["display_name"], "Math Professor");
    assert_eq!(tutors[0]["topic"], "Mathematics");
}

#[tokio::test]
async fn chat_streams_ndjson() {
    let router = router_with(ScriptedBackend::new().with_stream(&["Hel", "lo", "!"]));

    let response = router
        .oneshot(json_post(
            "/api/chat",
            serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}],
                "tutor_id": "math_solver",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/x-ndjson"
    );

    let fragments = body_lines(response).await;
    assert_eq!(
        fragments,
        vec![
            StreamFragment::text("Hel"),
            StreamFragment::text("lo"),
            StreamFragment::text("!"),
        ]
    );
}

#[tokio::test]
async fn chat_unknown_tutor_still_streams() {
    let router = router_with(ScriptedBackend::new().with_stream(&["ok"]));

    let response = router
        .oneshot(json_post(
            "/api/chat",
            serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}],
                "tutor_id": "no_such_tutor",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fragments = body_lines(response).await;
    assert_eq!(fragments, vec![StreamFragment::text("ok")]);
}

#[tokio::test]
async fn chat_backend_failure_ends_with_error_fragment() {
    let router = router_with(
        ScriptedBackend::new()
            .with_stream(&["partial"])
            .failing_stream(BackendError::Stream("model runner stopped".into())),
    );

    let response = router
        .oneshot(json_post(
            "/api/chat",
            serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}],
                "tutor_id": "math_solver",
            }),
        ))
        .await
        .unwrap();

    // The HTTP status is already committed; the failure arrives in-band.
    assert_eq!(response.status(), StatusCode::OK);
    let fragments = body_lines(response).await;
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0], StreamFragment::text("partial"));
    assert!(fragments[1].is_terminal());
}

#[tokio::test]
async fn analyze_success() {
    let router = router_with(
        ScriptedBackend::new()
            .push_generation(r#"{"is_cybersecurity": true, "confidence": 0.9}"#)
            .push_generation("Summary of the incident report.")
            .push_generation("Roadmap for learning incident response."),
    );

    let response = router
        .oneshot(json_post(
            "/analyze",
            serde_json::json!({
                "text": "A phishing campaign targeted the VPN.",
                "domain": "CYBERSECURITY",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: AnalysisResult = serde_json::from_value(body_json(response).await).unwrap();
    assert!(result.domain_match);
    assert_eq!(result.domain_confidence, 0.9);
    assert_eq!(result.summary, "Summary of the incident report.");
    assert_eq!(result.roadmap, "Roadmap for learning incident response.");
}

#[tokio::test]
async fn analyze_unknown_domain_is_404() {
    // No "art_style" handler and no "general" fallback registered.
    let router = router_with(ScriptedBackend::new());

    let response = router
        .oneshot(json_post(
            "/analyze",
            serde_json::json!({
                "text": "impressionist brush techniques",
                "domain": "Art Style",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("no analysis service available"),
    );
}

#[tokio::test]
async fn analyze_handler_failure_is_500() {
    // Classifier passes, then the summary generation fails.
    let router = router_with(
        ScriptedBackend::new()
            .push_generation(r#"{"is_cybersecurity": true, "confidence": 0.9}"#)
            .push_generation_error(BackendError::Timeout),
    );

    let response = router
        .oneshot(json_post(
            "/analyze",
            serde_json::json!({
                "text": "A phishing campaign targeted the VPN.",
                "domain": "cybersecurity",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("analysis failed"), "got: {message}");
    // Operators get structure in the logs; clients get a message string.
    assert!(!message.contains("backtrace"));
}

#[tokio::test]
async fn models_listing() {
    let router = router_with(ScriptedBackend::new().with_models(&["llama3:8b", "llama3:70b"]));

    let response = router
        .oneshot(Request::get("/api/models").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0]["name"], "llama3:8b");
}
