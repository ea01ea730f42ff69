//! HTTP surface of the LendLens backend
//!
//! The backend itself is deliberately tiny: a hello-world endpoint, a
//! service banner and a health check that probes the upstream GraphQL API.
//! Loan browsing happens client-side through [`crate::loan::LoanSession`].

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::graphql::{GraphQLTransport, HttpGraphQLClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Client for the upstream Kiva GraphQL endpoint, used by the health probe
    pub upstream: Arc<HttpGraphQLClient>,
}

impl AppState {
    pub fn new(upstream: Arc<HttpGraphQLClient>) -> Self {
        Self { upstream }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/hello-world", get(hello_world))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn root() -> &'static str {
    "LendLens API Server"
}

/// The one business endpoint the original backend exposes
async fn hello_world() -> &'static str {
    "Hello World"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    upstream: String,
    version: String,
}

/// Health check endpoint; probes the upstream GraphQL API with a trivial query
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let upstream = match state
        .upstream
        .execute("query { __typename }", json!({}))
        .await
    {
        Ok(_) => "reachable".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if upstream == "reachable" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        upstream,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// CORS layer from the `CORS_ALLOWED_ORIGINS` setting
pub fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins = allowed_origins.unwrap_or_default();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
