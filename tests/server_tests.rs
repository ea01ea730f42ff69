//! Router tests for the HTTP surface

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use lendlens_server::graphql::HttpGraphQLClient;
use lendlens_server::server::{router, AppState};

fn test_router() -> axum::Router {
    // The upstream client is only exercised by /health, which these tests
    // do not hit.
    let upstream = Arc::new(HttpGraphQLClient::new("http://127.0.0.1:1/graphql"));
    router(AppState::new(upstream))
}

#[tokio::test]
async fn test_hello_world_returns_plain_text() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/hello-world")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Hello World");
}

#[tokio::test]
async fn test_root_banner() {
    let response = test_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"LendLens API Server");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_degraded_when_upstream_unreachable() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "degraded");
    assert!(health["upstream"].as_str().unwrap().starts_with("error:"));
}
