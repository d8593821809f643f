//! Shared helpers for the API integration tests.
//!
//! Builds the full application router over the in-memory store so the
//! suites exercise the same middleware stack as production, without an
//! external database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use demandas_api::config::ServerConfig;
use demandas_api::routes::build_router;
use demandas_api::state::AppState;
use demandas_db::MemoryStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router backed by a fresh in-memory store.
pub fn build_test_app() -> Router {
    let state = AppState {
        store: Arc::new(MemoryStore::default()),
        config: Arc::new(test_config()),
    };
    build_router(state)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a request with a JSON body.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST a JSON body and return the created entity from the `data` envelope.
pub async fn create_entity(app: Router, uri: &str, body: serde_json::Value) -> serde_json::Value {
    let response = send_json(app, Method::POST, uri, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
