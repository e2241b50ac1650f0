//! Integration tests for webhook alert delivery against a local HTTP server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pulseguard_core::{Coordinates, EmergencyContact, EmergencyTrigger};
use pulseguard_events::{ContactForwarder, EmergencyAlert, ForwardError, WebhookForwarder};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn accept(State(rec): State<Recorder>, Json(body): Json<serde_json::Value>) -> StatusCode {
    rec.hits.fetch_add(1, Ordering::SeqCst);
    rec.bodies.lock().unwrap().push(body);
    StatusCode::OK
}

async fn reject(State(rec): State<Recorder>) -> StatusCode {
    rec.hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::SERVICE_UNAVAILABLE
}

/// Start a server and return its base URL plus the shared recorder.
async fn spawn_server() -> (String, Recorder) {
    let rec = Recorder::default();
    let app = Router::new()
        .route("/ok", post(accept))
        .route("/down", post(reject))
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), rec)
}

fn sample_alert() -> EmergencyAlert {
    EmergencyAlert::new(
        &EmergencyContact {
            name: Some("Tolu".to_string()),
            number: "+2348000000000".to_string(),
        },
        EmergencyTrigger::HighPulse,
        Some(150),
        Coordinates::new(6.5244, 3.3792).with_accuracy(12.0),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delivers_alert_payload() {
    let (base, rec) = spawn_server().await;
    let forwarder = WebhookForwarder::new(format!("{base}/ok")).unwrap();

    forwarder
        .forward(&sample_alert())
        .await
        .expect("delivery should succeed");

    assert_eq!(rec.hits.load(Ordering::SeqCst), 1);
    let bodies = rec.bodies.lock().unwrap();
    let body = &bodies[0];
    assert_eq!(body["contact_number"], "+2348000000000");
    assert_eq!(body["contact_name"], "Tolu");
    assert_eq!(body["trigger"], "high_pulse");
    assert_eq!(body["bpm"], 150);
    assert_eq!(body["location"]["accuracy"], 12.0);
    assert_eq!(body["maps_url"], "https://maps.google.com/?q=6.524400,3.379200");
}

#[tokio::test]
async fn retries_then_reports_status() {
    let (base, rec) = spawn_server().await;
    let forwarder = WebhookForwarder::new(format!("{base}/down"))
        .unwrap()
        .with_retry_delays(vec![Duration::from_millis(10), Duration::from_millis(10)]);

    let err = forwarder
        .forward(&sample_alert())
        .await
        .expect_err("delivery should fail");

    assert!(matches!(err, ForwardError::HttpStatus(503)));
    // Two retried attempts plus the final one.
    assert_eq!(rec.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn no_retry_delays_means_single_attempt() {
    let (base, rec) = spawn_server().await;
    let forwarder = WebhookForwarder::new(format!("{base}/down"))
        .unwrap()
        .with_retry_delays(Vec::new());

    assert!(forwarder.forward(&sample_alert()).await.is_err());
    assert_eq!(rec.hits.load(Ordering::SeqCst), 1);
}
