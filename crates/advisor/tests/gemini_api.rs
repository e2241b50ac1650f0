//! Integration tests for the Gemini client and the fallback policy, run
//! against a local stand-in for the generative API.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use pulseguard_advisor::{
    AdvisoryError, AdvisoryTextProvider, Advisor, ChatContext, ChatService, GeminiClient,
    GeminiConfig, TextGenerator,
};
use pulseguard_core::advisory::{AdvisoryTemplate, CHAT_FALLBACK, HIGH_PULSE_FALLBACK};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// How the stand-in server answers.
#[derive(Clone, Copy)]
enum Mode {
    Reply,
    ServerError,
    Garbage,
}

#[derive(Clone)]
struct Stub {
    mode: Mode,
    seen: Arc<Mutex<Vec<(String, String, serde_json::Value)>>>,
    queries: Arc<Mutex<Vec<Option<String>>>>,
}

async fn generate(
    State(stub): State<Stub>,
    Path(rest): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    stub.seen.lock().unwrap().push((rest, key, body));
    stub.queries.lock().unwrap().push(query);

    match stub.mode {
        Mode::Reply => Json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Sit down and breathe slowly." }] }
            }]
        }))
        .into_response(),
        Mode::ServerError => (StatusCode::TOO_MANY_REQUESTS, "quota exceeded").into_response(),
        Mode::Garbage => (StatusCode::OK, "not json at all").into_response(),
    }
}

async fn spawn_stub(mode: Mode) -> (String, Stub) {
    let stub = Stub {
        mode,
        seen: Arc::new(Mutex::new(Vec::new())),
        queries: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/models/{*rest}", post(generate))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), stub)
}

fn client_for(base: &str) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: Some("test-key".into()),
        api_url: base.to_string(),
        ..Default::default()
    })
    .expect("build client")
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sends_prompt_model_and_key() {
    let (base, stub) = spawn_stub(Mode::Reply).await;
    let client = client_for(&base);

    let text = client.generate("How do I calm down?").await.unwrap();
    assert_eq!(text, "Sit down and breathe slowly.");

    let seen = stub.seen.lock().unwrap();
    let (path, key, body) = &seen[0];
    assert_eq!(path, "gemini-pro:generateContent");
    assert_eq!(key, "test-key");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "How do I calm down?");
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let (base, _stub) = spawn_stub(Mode::ServerError).await;
    let err = client_for(&base).generate("hi").await.unwrap_err();
    assert_matches!(err, AdvisoryError::Api { status: 429, ref body } if body == "quota exceeded");
}

#[tokio::test]
async fn garbage_body_is_malformed() {
    let (base, _stub) = spawn_stub(Mode::Garbage).await;
    assert_matches!(
        client_for(&base).generate("hi").await,
        Err(AdvisoryError::Malformed(_))
    );
}

#[tokio::test]
async fn request_errors_never_contain_the_api_key() {
    let client = GeminiClient::new(GeminiConfig {
        api_key: Some("SECRET-KEY-123".into()),
        api_url: "http://127.0.0.1:1".into(),
        ..Default::default()
    })
    .expect("build client");

    let err = client.generate("hi").await.unwrap_err();
    assert_matches!(err, AdvisoryError::Request(_));
    assert!(!err.to_string().contains("SECRET-KEY-123"));
    assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn key_is_sent_as_header_not_query() {
    let (base, stub) = spawn_stub(Mode::Reply).await;
    client_for(&base).generate("hi").await.unwrap();

    assert_eq!(stub.seen.lock().unwrap()[0].1, "test-key");
    assert_eq!(stub.queries.lock().unwrap()[0], None);
}

#[tokio::test]
async fn unreachable_host_is_request_error() {
    // Port 1 on loopback refuses connections.
    let client = client_for("http://127.0.0.1:1");
    assert_matches!(client.generate("hi").await, Err(AdvisoryError::Request(_)));
}

// ---------------------------------------------------------------------------
// Fallback policy end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn advisor_returns_live_text_when_service_answers() {
    let (base, _stub) = spawn_stub(Mode::Reply).await;
    let advisor = Advisor::new(Arc::new(client_for(&base)));

    let text = advisor.advise(AdvisoryTemplate::HighPulse { bpm: 135 }).await;
    assert_eq!(text, "Sit down and breathe slowly.");
}

#[tokio::test]
async fn advisor_falls_back_exactly_on_service_error() {
    let (base, _stub) = spawn_stub(Mode::ServerError).await;
    let advisor = Advisor::new(Arc::new(client_for(&base)));

    let text = advisor.advise(AdvisoryTemplate::HighPulse { bpm: 135 }).await;
    assert_eq!(text, HIGH_PULSE_FALLBACK);
}

#[tokio::test]
async fn chat_falls_back_on_garbage() {
    let (base, _stub) = spawn_stub(Mode::Garbage).await;
    let chat = ChatService::new(Arc::new(client_for(&base)));

    let reply = chat.respond("hello", &[], &ChatContext::default()).await;
    assert_eq!(reply, CHAT_FALLBACK);
}
