use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, router, MockApp, MockConfig, DEFAULT_API_KEY};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, DEFAULT_API_KEY)
        .body(String::new())
        .unwrap()
}

async fn send(app: &Router, request: Request<String>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

// --- auth ---

#[tokio::test]
async fn missing_key_is_access_denied() {
    let app = app();
    let request = Request::builder()
        .uri("/v1/public/status/app-1")
        .body(String::new())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "ACCESS_DENIED");
}

// --- status ---

#[tokio::test]
async fn status_reports_running_flag() {
    let app = app();
    let (status, body) = send(&app, authed("GET", "/v1/public/status/app-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["running"], false);
    assert_eq!(body["response"]["status"], "exited");
}

#[tokio::test]
async fn unknown_app_is_not_found() {
    let app = app();
    for uri in [
        "/v1/public/status/nope",
        "/v1/public/logs/nope",
        "/v1/public/logs-complete/nope",
        "/v1/public/backup/nope",
    ] {
        let (status, body) = send(&app, authed("GET", uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], "APP_NOT_FOUND", "{uri}");
    }
}

// --- logs ---

#[tokio::test]
async fn logs_return_configured_text() {
    let app = router(MockConfig {
        apps: vec![MockApp::new("bot", true, "line1\nline2")],
        ..MockConfig::default()
    });
    let (status, body) = send(&app, authed("GET", "/v1/public/logs/bot")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["logs"], "line1\nline2");
}

#[tokio::test]
async fn logs_complete_returns_url() {
    let app = app();
    let (_, body) = send(&app, authed("GET", "/v1/public/logs-complete/app-1")).await;
    let url = body["response"]["logs"].as_str().unwrap();
    assert!(url.starts_with("https://"));
    assert!(url.ends_with("app-1.txt"));
}

// --- backup ---

#[tokio::test]
async fn backup_returns_download_url() {
    let app = app();
    let (status, body) = send(&app, authed("GET", "/v1/public/backup/app-1")).await;

    assert_eq!(status, StatusCode::OK);
    let url = body["response"]["downloadURL"].as_str().unwrap();
    assert!(url.contains("/backups/app-1-"));
    assert!(url.ends_with(".zip"));
}

// --- start / stop ---

#[tokio::test]
async fn start_then_stop_flips_running() {
    let app = app();

    let (status, body) = send(&app, authed("POST", "/v1/public/start/app-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert!(body.get("response").is_some());

    let (_, body) = send(&app, authed("GET", "/v1/public/status/app-1")).await;
    assert_eq!(body["response"]["running"], true);

    send(&app, authed("POST", "/v1/public/stop/app-1")).await;
    let (_, body) = send(&app, authed("GET", "/v1/public/status/app-1")).await;
    assert_eq!(body["response"]["running"], false);
}

#[tokio::test]
async fn start_requires_post() {
    let app = app();
    let resp = app
        .oneshot(authed("GET", "/v1/public/start/app-1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- user ---

#[tokio::test]
async fn user_lists_applications() {
    let app = app();
    let (status, body) = send(&app, authed("GET", "/v1/public/user")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["user"]["id"], "mock-user");
    assert_eq!(body["response"]["applications"][0]["id"], "app-1");
}
