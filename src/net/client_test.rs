use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

use super::*;
use crate::state::session::Role;
use crate::state::storage::MemoryStorage;

// =============================================================================
// Stub backend
// =============================================================================

async fn echo_token(headers: HeaderMap) -> Json<Value> {
    let token = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()).map(str::to_owned);
    Json(json!({ "token": token }))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!([]))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("admin@example.test"), Some("secret")) => (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful!",
                "token": "tok-admin",
                "roles": ["admin", "auditor"]
            })),
        ),
        (Some("admin@example.test"), _) => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid password" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Invalid email" }))),
    }
}

async fn service(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == 1 {
        (
            StatusCode::OK,
            Json(json!({ "id": 1, "name": "Plumbing", "base_price": 250.0, "time_required": 60, "description": null })),
        )
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "Service not found" })))
    }
}

async fn create_service(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get(AUTH_HEADER).is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" })));
    }
    assert_eq!(body["name"], "Cleaning");
    (StatusCode::CREATED, Json(json!({ "message": "Service added successfully" })))
}

fn stub_app() -> Router {
    Router::new()
        .route("/echo", get(echo_token))
        .route("/slow", get(slow))
        .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
        .route("/not-json", get(|| async { "plain text" }))
        .route("/login", post(login))
        .route("/services", post(create_service))
        .route("/services/{id}", get(service))
}

async fn spawn_stub() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub_app()).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str, timeout: Duration) -> ApiClient {
    let session = Arc::new(SessionState::load(Arc::new(MemoryStorage::new())));
    let config = ClientConfig { base_url: base_url.to_owned(), timeout, ..ClientConfig::default() };
    ApiClient::new(&config, session).unwrap()
}

// =============================================================================
// Credential header
// =============================================================================

#[tokio::test]
async fn anonymous_request_has_no_token_header() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    let body: Value = client.get_json("/echo").await.unwrap();
    assert_eq!(body["token"], Value::Null);
}

#[tokio::test]
async fn token_header_follows_session() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));

    client.session().login("abc", vec![Role::Customer]);
    let body: Value = client.get_json("/echo").await.unwrap();
    assert_eq!(body["token"], "abc");

    client.session().logout();
    let body: Value = client.get_json("echo").await.unwrap();
    assert_eq!(body["token"], Value::Null);
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let client = client_for("http://127.0.0.1:5000/", Duration::from_secs(1));
    assert_eq!(client.base_url(), "http://127.0.0.1:5000");
    assert_eq!(client.url("/services"), "http://127.0.0.1:5000/services");
}

// =============================================================================
// Failure classification
// =============================================================================

#[tokio::test]
async fn non_success_status_is_surfaced() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    let err = client.get_json::<Value>("/broken").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(matches!(err, ApiError::Status { ref body, .. } if body == "boom"));
}

#[tokio::test]
async fn slow_response_times_out() {
    let client = client_for(&spawn_stub().await, Duration::from_millis(100));
    let err = client.get_json::<Value>("/slow").await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"), Duration::from_secs(1));
    let err = client.get_json::<Value>("/services").await.unwrap_err();
    assert!(matches!(err, ApiError::Request { .. } | ApiError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn invalid_json_is_decode_error() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    let err = client.get_json::<Value>("/not-json").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

// =============================================================================
// Endpoints
// =============================================================================

#[tokio::test]
async fn login_stores_token_and_known_roles() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    let response = client.login("admin@example.test", "secret").await.unwrap();
    assert_eq!(response.message, "Login successful!");
    assert_eq!(client.session().token().as_deref(), Some("tok-admin"));
    assert_eq!(client.session().roles(), vec![Role::Admin]);
}

#[tokio::test]
async fn failed_login_leaves_session_untouched() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    let err = client.login("admin@example.test", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.backend_message().as_deref(), Some("Invalid password"));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn logout_clears_session() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    client.login("admin@example.test", "secret").await.unwrap();
    client.logout();
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn fetch_service_by_id() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    let service = client.fetch_service(1).await.unwrap();
    assert_eq!(service.name, "Plumbing");
    assert_eq!(service.description, None);

    let err = client.fetch_service(9).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn create_service_requires_token() {
    let client = client_for(&spawn_stub().await, Duration::from_secs(1));
    let new = NewService { name: "Cleaning".into(), base_price: 99.5, time_required: 30, description: None };

    let err = client.create_service(&new).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    client.session().login("tok-admin", vec![Role::Admin]);
    let created = client.create_service(&new).await.unwrap();
    assert_eq!(created.message, "Service added successfully");
}
