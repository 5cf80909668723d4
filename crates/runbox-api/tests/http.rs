//! End-to-end tests over the API router: real handlers, in-memory
//! SQLite, real tokens. The execution provider is the one thing not
//! exercised for real; the gateway points at an unroutable endpoint,
//! which is enough to prove validation happens before any network call.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use runbox_api::auth::{AppState, AppStateInner};
use runbox_db::Database;
use runbox_gateway::ExecutionGateway;

fn test_app() -> Router {
    let state: AppState = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        jwt_secret: "test-secret".into(),
        gateway: ExecutionGateway::new(
            Some("http://127.0.0.1:1/execute".into()),
            "client-id".into(),
            "client-secret".into(),
        )
        .unwrap(),
    });

    runbox_api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn register_and_login(app: &Router, username: &str, email: &str, password: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());
    token
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let app = test_app();
    let token = register_and_login(&app, "a", "a@x.com", "p").await;

    // The token authenticates protected routes and echoes the identity.
    let (status, body) = send(&app, "GET", "/api/protected", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello user 1, you accessed a protected route!");
}

#[tokio::test]
async fn bad_logins_are_indistinguishable() {
    let app = test_app();
    register_and_login(&app, "a", "a@x.com", "p").await;

    let wrong_password = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong" })),
    )
    .await;
    let unknown_email = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ghost@x.com", "password": "p" })),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.1, json!({ "error": "Invalid email or password" }));
    // Identical status and body; no account probing via the login form.
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn registration_validates_and_hides_conflicts() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username, email, and password are required");

    register_and_login(&app, "a", "a@x.com", "p").await;

    // Re-registering the same email fails with the generic message.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "b", "email": "a@x.com", "password": "q" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Registration failed" }));
}

#[tokio::test]
async fn save_list_get_scoped_by_owner() {
    let app = test_app();
    let ana = register_and_login(&app, "ana", "ana@x.com", "pw").await;
    let bob = register_and_login(&app, "bob", "bob@x.com", "pw").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/code/save",
        Some(&ana),
        Some(json!({ "filename": "main.py", "language": "python3", "code": "print(1)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let id = body["id"].as_i64().unwrap();

    // Listing shows metadata only.
    let (status, body) = send(&app, "GET", "/api/code", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["filename"], "main.py");
    assert_eq!(list[0]["language"], "python3");
    assert!(list[0].get("code").is_none());

    // The owner gets the full snippet back.
    let (status, body) = send(&app, "GET", &format!("/api/code/{id}"), Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "print(1)");

    // A different user's token sees a plain 404, same as a missing id.
    let (status, body) = send(&app, "GET", &format!("/api/code/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Code not found" }));

    let (status, _) = send(&app, "GET", "/api/code/99999", Some(&ana), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob's listing is empty.
    let (_, body) = send(&app, "GET", "/api/code", Some(&bob), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn snippet_routes_require_a_token() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/code/save",
        None,
        Some(json!({ "filename": "a.py", "language": "python3", "code": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or missing token");

    let (status, _) = send(&app, "GET", "/api/code", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn save_rejects_missing_fields() {
    let app = test_app();
    let token = register_and_login(&app, "a", "a@x.com", "p").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/code/save",
        Some(&token),
        Some(json!({ "filename": "main.py", "language": "python3" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields" }));
}

#[tokio::test]
async fn run_validates_before_any_network_call() {
    let app = test_app();

    // language present, code missing; must fail fast with a 400, not a
    // 500 from the unroutable provider endpoint.
    let (status, body) = send(
        &app,
        "POST",
        "/api/compiler/run",
        None,
        Some(json!({ "language": "python3", "versionIndex": "3" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("code"));
}

#[tokio::test]
async fn run_surfaces_provider_failure_with_detail() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/compiler/run",
        None,
        Some(json!({ "language": "python3", "versionIndex": "3", "code": "print(1)" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Code execution failed.");
    assert!(body["details"].as_str().is_some());
}

#[tokio::test]
async fn ping_reports_database_time() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");
    assert!(!body["db_time"].as_str().unwrap().is_empty());
}
