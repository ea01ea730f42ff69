//! GraphQL client for the Kiva marketplace API
//!
//! The marketplace endpoint takes a POST with a `{query, variables}` body and
//! answers `{data, errors?}`. We classify every failure into the [`ApiError`]
//! taxonomy here so callers never have to look at reqwest types.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiError;

/// Placeholder when a failed response's body cannot be read
const UNREADABLE_BODY: &str = "<unreadable response body>";

/// Transport seam for executing GraphQL queries
///
/// The HTTP client implements this for real traffic; tests substitute mocks.
#[async_trait]
pub trait GraphQLTransport: Send + Sync {
    /// Execute a query and return the `data` field of the response
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ApiError>;
}

#[async_trait]
impl<T: GraphQLTransport + ?Sized> GraphQLTransport for std::sync::Arc<T> {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ApiError> {
        (**self).execute(query, variables).await
    }
}

/// Wire shape of a GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQLResponseError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponseError {
    message: String,
}

/// HTTP GraphQL client backed by reqwest
///
/// Single attempt per call, no retries. Timeouts are whatever the underlying
/// client defaults to.
pub struct HttpGraphQLClient {
    client: Client,
    endpoint: String,
}

impl HttpGraphQLClient {
    /// Create a client for the given GraphQL endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphQLTransport for HttpGraphQLClient {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ApiError> {
        debug!(endpoint = %self.endpoint, "Executing GraphQL query");

        // Lower-level transport failures (DNS, refused connection) come out
        // of send() and are rewrapped as Network via From<reqwest::Error>.
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            );
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            return Err(ApiError::Network {
                status: Some(status.as_u16()),
                reason,
                body: Some(body),
            });
        }

        let envelope: GraphQLResponse = response
            .json()
            .await
            .map_err(|e| ApiError::data_format(format!("Invalid GraphQL response body: {}", e)))?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ApiError::data_format(format!("GraphQL errors: {}", joined)));
            }
        }

        envelope
            .data
            .ok_or_else(|| ApiError::data_format("GraphQL response is missing the data field"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::net::SocketAddr;

    /// Serve a canned handler on an ephemeral port and return its address
    async fn spawn_stub(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        addr
    }

    fn client_for(addr: SocketAddr) -> HttpGraphQLClient {
        HttpGraphQLClient::new(format!("http://{}/graphql", addr))
    }

    #[tokio::test]
    async fn test_success_returns_data_only() {
        let router = Router::new().route(
            "/graphql",
            post(|| async {
                Json(json!({
                    "data": { "lend": { "loans": { "totalCount": 0, "values": [] } } }
                }))
            }),
        );
        let addr = spawn_stub(router).await;

        let data = client_for(addr)
            .execute("query GetLoans { lend }", json!({}))
            .await
            .expect("query should succeed");
        assert_eq!(data["lend"]["loans"]["totalCount"], 0);
    }

    #[tokio::test]
    async fn test_http_500_is_a_network_error_with_status_and_reason() {
        let router = Router::new().route(
            "/graphql",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let addr = spawn_stub(router).await;

        let err = client_for(addr)
            .execute("query GetLoans { lend }", json!({}))
            .await
            .expect_err("500 must fail");

        match &err {
            ApiError::Network { status, body, .. } => {
                assert_eq!(*status, Some(500));
                assert_eq!(body.as_deref(), Some("upstream exploded"));
            }
            other => panic!("expected Network error, got {:?}", other),
        }
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_graphql_errors_become_data_format_error() {
        let router = Router::new().route(
            "/graphql",
            post(|| async {
                Json(json!({
                    "data": null,
                    "errors": [ { "message": "X" }, { "message": "Y" } ]
                }))
            }),
        );
        let addr = spawn_stub(router).await;

        let err = client_for(addr)
            .execute("query GetLoans { lend }", json!({}))
            .await
            .expect_err("errors array must fail");

        match &err {
            ApiError::DataFormat { message } => {
                assert!(message.contains("X"));
                assert!(message.contains("X, Y"));
            }
            other => panic!("expected DataFormat error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_data_format_error() {
        let router = Router::new().route(
            "/graphql",
            post(|| async { "not json at all".into_response() }),
        );
        let addr = spawn_stub(router).await;

        let err = client_for(addr)
            .execute("query GetLoans { lend }", json!({}))
            .await
            .expect_err("garbage body must fail");
        assert!(matches!(err, ApiError::DataFormat { .. }));
    }

    #[tokio::test]
    async fn test_missing_data_field_is_a_data_format_error() {
        let router = Router::new().route("/graphql", post(|| async { Json(json!({})) }));
        let addr = spawn_stub(router).await;

        let err = client_for(addr)
            .execute("query GetLoans { lend }", json!({}))
            .await
            .expect_err("missing data must fail");
        assert!(matches!(err, ApiError::DataFormat { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_network_error() {
        // Bind to grab a free port, then drop the listener before connecting.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(addr)
            .execute("query GetLoans { lend }", json!({}))
            .await
            .expect_err("refused connection must fail");
        assert!(err.is_network());
    }
}
