//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the application router exactly as `main.rs` does (same middleware
//! stack via `build_app_router`) and provides oneshot request helpers plus a
//! stub JupyterHub server for exercising the session endpoints.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use hubgate_api::auth::jwt::JwtConfig;
use hubgate_api::config::{HubConfig, ServerConfig};
use hubgate_api::router::build_app_router;
use hubgate_api::state::AppState;
use hubgate_hub::HubClient;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config(hub_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_expiry_hours: 24,
        },
        hub: HubConfig {
            api_url: hub_url.to_string(),
            api_token: "stub-admin-token".to_string(),
            public_url: hub_url.to_string(),
        },
    }
}

/// Build the full application router against the given pool and stub hub URL.
///
/// Mirrors the router construction in `main.rs` so integration tests exercise
/// the same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool, hub_url: &str) -> Router {
    let config = test_config(hub_url);
    let hub = Arc::new(HubClient::new(
        config.hub.api_url.clone(),
        config.hub.api_token.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        hub,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Stub JupyterHub
// ---------------------------------------------------------------------------

/// Spawn a stub JupyterHub on an ephemeral port and return its base URL.
///
/// Accepts user creation, server start/stop, and token minting with the
/// responses a healthy hub would give.
pub async fn spawn_stub_hub() -> String {
    let app = Router::new()
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
            post(|| async { Json(serde_json::json!({ "token": "hub-access-token" })) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub hub bind should succeed");
    let addr: SocketAddr = listener.local_addr().expect("stub hub local_addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub hub serve");
    });
    format!("http://{addr}")
}

/// Spawn a stub hub whose spawner is broken: user creation and token minting
/// work, but server start answers 502.
pub async fn spawn_flaky_spawner_hub() -> String {
    let app = Router::new()
        .route(
            "/hub/api/users/{name}",
            post(|| async { StatusCode::CREATED }),
        )
        .route(
            "/hub/api/users/{name}/server",
            post(|| async { (StatusCode::BAD_GATEWAY, "proxy error") }),
        )
        .route(
            "/hub/api/users/{name}/tokens",
            post(|| async { Json(serde_json::json!({ "token": "hub-access-token" })) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub hub bind should succeed");
    let addr: SocketAddr = listener.local_addr().expect("stub hub local_addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub hub serve");
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request should not fail at transport level")
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request should not fail at transport level")
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request should not fail at transport level")
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request should not fail at transport level")
}

/// Send a POST request with an empty body and a bearer token.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request should not fail at transport level")
}

/// Send a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request should not fail at transport level")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Collect a response body as a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be valid UTF-8")
}
