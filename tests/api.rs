use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use futures::StreamExt;
use tower::ServiceExt;

use countdown_timer::{create_router, spawn_countdown, AppState};

fn setup(duration: u64) -> Router {
    let (countdown, _task) = spawn_countdown(duration);
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string(), countdown));
    create_router(state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test(start_paused = true)]
async fn health_reports_ok() {
    let app = setup(60);
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn status_starts_in_initial_layout() {
    let app = setup(60);
    let (status, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["run_state"], "finished");
    assert_eq!(body["timer"]["pending_duration_seconds"], 60);
    assert_eq!(body["display"], Value::Null);
    assert_eq!(body["view"]["duration_picker_visible"], true);
    assert_eq!(body["view"]["toggle_title"], "Start");
    assert_eq!(body["last_action"], Value::Null);
}

#[tokio::test(start_paused = true)]
async fn selected_duration_is_used_by_next_run() {
    let app = setup(60);
    let (status, body) = call(&app, "POST", "/duration", Some(json!({"minutes": 1, "seconds": 30}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "finished");
    assert_eq!(body["timer"]["pending_duration_seconds"], 90);

    let (status, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["duration_seconds"], 90);
    assert_eq!(body["timer"]["remaining_seconds"], 90);
    assert_eq!(body["timer"]["view_mode"], "active");
}

#[tokio::test(start_paused = true)]
async fn duration_is_ignored_during_a_run() {
    let app = setup(60);
    call(&app, "POST", "/toggle", None).await;

    let (status, body) = call(&app, "POST", "/duration", Some(json!({"seconds": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["pending_duration_seconds"], 60);
    assert_eq!(body["timer"]["duration_seconds"], 60);
}

#[tokio::test(start_paused = true)]
async fn toggle_pauses_and_resumes() {
    let app = setup(60);
    call(&app, "POST", "/toggle", None).await;

    let (_, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["message"], "Countdown paused");

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["view"]["cancel_enabled"], true);
    assert_eq!(body["last_action"], "toggle");

    let (_, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(body["status"], "running");
}

#[tokio::test(start_paused = true)]
async fn cancel_returns_to_initial_layout() {
    let app = setup(60);
    call(&app, "POST", "/toggle", None).await;

    let (status, body) = call(&app, "POST", "/cancel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "finished");
    assert_eq!(body["timer"]["remaining_seconds"], Value::Null);
    assert_eq!(body["timer"]["view_mode"], "initial");

    let (status, body) = call(&app, "POST", "/cancel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "finished");
}

#[tokio::test(start_paused = true)]
async fn malformed_duration_is_rejected() {
    let app = setup(60);
    let (status, _) = call(&app, "POST", "/duration", Some(json!({"seconds": -1}))).await;
    assert!(status.is_client_error());

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["timer"]["pending_duration_seconds"], 60);
}

#[tokio::test(start_paused = true)]
async fn events_stream_view_signals() {
    let app = setup(5);

    let request = Request::builder()
        .uri("/events")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let (status, _) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(status, StatusCode::OK);

    let mut body = response.into_body().into_data_stream();
    let mut text = String::new();
    for _ in 0..20 {
        if text.contains("event: display_update") {
            break;
        }
        let chunk = body.next().await.expect("event chunk").expect("chunk bytes");
        text.push_str(&String::from_utf8_lossy(&chunk));
    }

    assert!(text.contains("event: view_config"), "stream: {}", text);
    assert!(text.contains(r#""mode":"active""#), "stream: {}", text);
    assert!(text.contains("event: display_update"), "stream: {}", text);
    assert!(text.contains(r#""seconds":4"#), "stream: {}", text);
}
