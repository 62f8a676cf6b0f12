//! Tests for [`HubClient`] against a stub JupyterHub bound to an ephemeral
//! port. The stub mimics the status codes and bodies of the real hub API.

use assert_matches::assert_matches;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};

use hubgate_hub::{HubClient, HubError};

/// Spawn a stub hub on 127.0.0.1 and return its base URL.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub serve");
    });
    format!("http://{addr}")
}

/// The happy-path stub: user creation, spawn/stop, and token minting all work.
fn happy_hub() -> Router {
    Router::new()
        .route(
            "/hub/api/users/{name}",
            post(|| async { StatusCode::CREATED }),
        )
        .route(
            "/hub/api/users/{name}/server",
            post(|| async { StatusCode::ACCEPTED }).delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/hub/api/users/{name}/tokens",
            post(|Path(name): Path<String>| async move {
                Json(serde_json::json!({ "token": format!("hub-token-{name}") }))
            }),
        )
}

#[tokio::test]
async fn test_ensure_user_and_start_stop() {
    let url = spawn_stub(happy_hub()).await;
    let hub = HubClient::new(url, "service-token".to_string());

    hub.ensure_user("alice").await.expect("ensure_user");
    hub.start_server("alice").await.expect("start_server");
    hub.stop_server("alice").await.expect("stop_server");
}

#[tokio::test]
async fn test_create_user_token() {
    let url = spawn_stub(happy_hub()).await;
    let hub = HubClient::new(url, "service-token".to_string());

    let token = hub.create_user_token("alice").await.expect("token");
    assert_eq!(token, "hub-token-alice");
}

/// Creating a user that already exists (hub answers 409) is not an error.
#[tokio::test]
async fn test_ensure_user_tolerates_existing_user() {
    let router = Router::new().route(
        "/hub/api/users/{name}",
        post(|| async { (StatusCode::CONFLICT, "User already exists") }),
    );
    let url = spawn_stub(router).await;
    let hub = HubClient::new(url, "service-token".to_string());

    hub.ensure_user("alice")
        .await
        .expect("existing user must not fail ensure_user");
}

/// A 400 on spawn means the server is already running; that is success.
#[tokio::test]
async fn test_start_server_tolerates_already_running() {
    let router = Router::new().route(
        "/hub/api/users/{name}/server",
        post(|| async { (StatusCode::BAD_REQUEST, "server is already running") }),
    );
    let url = spawn_stub(router).await;
    let hub = HubClient::new(url, "service-token".to_string());

    hub.start_server("alice").await.expect("already running is ok");
}

/// Stopping a server that is not running (400/404) is success.
#[tokio::test]
async fn test_stop_server_tolerates_not_running() {
    let router = Router::new().route(
        "/hub/api/users/{name}/server",
        delete(|| async { (StatusCode::NOT_FOUND, "no server running") }),
    );
    let url = spawn_stub(router).await;
    let hub = HubClient::new(url, "service-token".to_string());

    hub.stop_server("alice").await.expect("not running is ok");
}

/// An auth failure on spawn surfaces as an Api error and is not transient.
#[tokio::test]
async fn test_start_server_surfaces_auth_failure() {
    let router = Router::new().route(
        "/hub/api/users/{name}/server",
        post(|| async { (StatusCode::FORBIDDEN, "action is not authorized") }),
    );
    let url = spawn_stub(router).await;
    let hub = HubClient::new(url, "service-token".to_string());

    let err = hub.start_server("alice").await.expect_err("403 must fail");
    assert_matches!(&err, HubError::Api { status: 403, body } if body.contains("not authorized"));
    assert!(!err.is_transient());
}

/// Token minting propagates the upstream status and body on ≥400.
#[tokio::test]
async fn test_create_user_token_api_error() {
    let router = Router::new().route(
        "/hub/api/users/{name}/tokens",
        post(|| async { (StatusCode::FORBIDDEN, "requires admin rights") }),
    );
    let url = spawn_stub(router).await;
    let hub = HubClient::new(url, "service-token".to_string());

    let err = hub
        .create_user_token("alice")
        .await
        .expect_err("403 must fail");
    assert_matches!(err, HubError::Api { status: 403, body } if body.contains("admin rights"));
}

/// A 2xx token response without a `token` field is malformed.
#[tokio::test]
async fn test_create_user_token_missing_token_field() {
    let router = Router::new().route(
        "/hub/api/users/{name}/tokens",
        post(|| async { Json(serde_json::json!({ "id": "t1" })) }),
    );
    let url = spawn_stub(router).await;
    let hub = HubClient::new(url, "service-token".to_string());

    let err = hub
        .create_user_token("alice")
        .await
        .expect_err("tokenless body must fail");
    assert_matches!(err, HubError::MalformedResponse(_));
}

/// An unreachable hub is a transport error, classified as transient.
#[tokio::test]
async fn test_unreachable_hub_is_transient() {
    // Nothing listens on this port (bound then immediately dropped).
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let hub = HubClient::new(format!("http://{addr}"), "service-token".to_string());
    let err = hub.start_server("alice").await.expect_err("must fail");
    assert_matches!(&err, HubError::Transport(_));
    assert!(err.is_transient());
}

/// 5xx responses are transient; the orchestrator may carry on after logging.
#[tokio::test]
async fn test_server_error_is_transient() {
    let router = Router::new().route(
        "/hub/api/users/{name}/server",
        post(|| async { (StatusCode::BAD_GATEWAY, "proxy error") }),
    );
    let url = spawn_stub(router).await;
    let hub = HubClient::new(url, "service-token".to_string());

    let err = hub.start_server("alice").await.expect_err("502 must fail");
    assert!(err.is_transient());
}
