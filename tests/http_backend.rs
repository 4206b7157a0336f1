use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use healthdialog::config::{BackendConfig, UiConfig};
use healthdialog::events::HallucinationRisk;
use healthdialog::ui::conversation::ConversationManager;
use healthdialog::{BackendError, HttpTriageBackend, TriageBackend};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Seen {
    queries: Arc<Mutex<Vec<String>>>,
    accept: Arc<Mutex<Vec<String>>>,
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn backend(base_url: String) -> HttpTriageBackend {
    HttpTriageBackend::new(&BackendConfig {
        base_url,
        request_timeout_secs: Some(5),
    })
    .unwrap()
}

async fn answer_handler(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.queries
        .lock()
        .unwrap()
        .push(params.get("query").cloned().unwrap_or_default());
    seen.accept.lock().unwrap().push(
        headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string(),
    );

    Json(json!({
        "answer": "Seek care.",
        "confidence": 0.8,
        "hallucination_risk": "low",
        "sources": [{"title": "Guideline A", "snippet": "Chest pain", "url": "https://g.example/a"}]
    }))
}

#[tokio::test]
async fn ask_sends_encoded_query_and_decodes_answer() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/ask", get(answer_handler))
        .with_state(seen.clone());
    let base = serve(app).await;

    let response = backend(base)
        .ask("chest pain & shortness of breath?")
        .await
        .expect("ask succeeds");

    assert_eq!(response.answer, "Seek care.");
    assert_eq!(response.meta.confidence, Some(0.8));
    assert_eq!(response.meta.hallucination_risk, Some(HallucinationRisk::Low));
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].url.as_deref(), Some("https://g.example/a"));

    assert_eq!(
        seen.queries.lock().unwrap().as_slice(),
        ["chest pain & shortness of breath?"]
    );
    assert_eq!(seen.accept.lock().unwrap().as_slice(), ["application/json"]);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/ask", get(answer_handler))
        .with_state(seen.clone());
    let base = serve(app).await;

    let response = backend(format!("{base}/api/")).ask("fever").await.unwrap();
    assert_eq!(response.answer, "Seek care.");
    assert_eq!(seen.queries.lock().unwrap().as_slice(), ["fever"]);
}

#[tokio::test]
async fn non_success_status_is_an_error_regardless_of_body() {
    let app = Router::new().route(
        "/ask",
        get(|| async { (StatusCode::TOO_MANY_REQUESTS, Json(json!({"answer": "ignored"}))) }),
    );
    let base = serve(app).await;

    let err = backend(base).ask("q").await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 429 }));
    assert_eq!(err.to_string(), "Backend error: 429");
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let app = Router::new().route("/ask", get(|| async { "<html>oops</html>".into_response() }));
    let base = serve(app).await;

    let err = backend(base).ask("q").await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn missing_answer_falls_back_to_body() {
    let app = Router::new().route("/ask", get(|| async { Json(json!({"detail": "busy"})) }));
    let base = serve(app).await;

    let response = backend(base).ask("q").await.unwrap();
    assert_eq!(response.answer, r#"{"detail":"busy"}"#);
    assert!(response.sources.is_empty());
}

#[tokio::test]
async fn null_body_is_malformed() {
    let app = Router::new().route("/ask", get(|| async { Json(Value::Null) }));
    let base = serve(app).await;

    let err = backend(base).ask("q").await.unwrap_err();
    assert!(matches!(err, BackendError::Malformed { kind: "null" }));
}

#[tokio::test]
async fn numeric_answer_is_shown_as_text() {
    let app = Router::new().route("/ask", get(|| async { Json(json!({"answer": 42})) }));
    let base = serve(app).await;

    let response = backend(base).ask("q").await.unwrap();
    assert_eq!(response.answer, "42");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(format!("http://{addr}")).ask("q").await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}

#[tokio::test]
async fn manager_round_trip_over_http() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/ask", get(answer_handler))
        .with_state(seen.clone());
    let base = serve(app).await;

    let mut manager = ConversationManager::new(Arc::new(backend(base)), &UiConfig::default());
    manager.session_mut().set_input("  chest pain ");
    assert!(manager.submit());
    assert!(manager.wait_for_outcome().await);

    let session = manager.session();
    assert!(!session.is_pending());
    assert!(session.error().is_none());
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.messages()[2].content, "Seek care.");
    assert_eq!(session.sources()[0].title.as_deref(), Some("Guideline A"));
    assert_eq!(seen.queries.lock().unwrap().as_slice(), ["chest pain"]);
}

#[tokio::test]
async fn manager_surfaces_http_failure_as_banner() {
    let app = Router::new().route("/ask", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = serve(app).await;

    let mut manager = ConversationManager::new(Arc::new(backend(base)), &UiConfig::default());
    manager.session_mut().set_input("q");
    manager.submit();
    manager.wait_for_outcome().await;

    let session = manager.session();
    assert!(!session.is_pending());
    assert_eq!(session.messages().len(), 2);
    assert_eq!(
        session.error(),
        Some("Something went wrong talking to the triage backend. Please try again.")
    );
}

#[tokio::test]
async fn manager_treats_null_body_as_failure() {
    let app = Router::new().route("/ask", get(|| async { "null" }));
    let base = serve(app).await;

    let mut manager = ConversationManager::new(Arc::new(backend(base)), &UiConfig::default());
    manager.session_mut().set_input("q");
    manager.submit();
    manager.wait_for_outcome().await;

    let session = manager.session();
    assert!(!session.is_pending());
    assert_eq!(session.messages().len(), 2);
    assert!(session.error().is_some());
}
