//! Mock Telerivet API server.
//!
//! Provides an axum-based HTTP server that simulates the Telerivet API.

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// A mock Telerivet API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be inspected or modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with the default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL as the API URL when creating a `TelerivetClient`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Number of API requests served so far.
    pub async fn request_count(&self) -> u64 {
        self.state.read().await.requests
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/*path", any(handlers::dispatch))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::PROJECT_ID;
    use crate::{QueryOptions, TelerivetClient, TelerivetError};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_project_with_client() {
        let server = MockServer::start().await;
        let client = TelerivetClient::new("test-key", server.url()).unwrap();

        let mut project = client
            .get_project_by_id(PROJECT_ID)
            .await
            .expect("Failed to get project");

        assert_eq!(
            project.name().await.unwrap().as_deref(),
            Some("Clinic Reminders")
        );
        assert_eq!(server.request_count().await, 1);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server_not_found() {
        let server = MockServer::start_empty().await;
        let client = TelerivetClient::new("test-key", server.url()).unwrap();

        let result = client.get_project_by_id("PJ404").await;

        assert!(matches!(result, Err(TelerivetError::NotFound { .. })));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_invalid_parameter() {
        let server = MockServer::start().await;
        let client = TelerivetClient::new("test-key", server.url()).unwrap();
        let project = client.init_project_by_id(PROJECT_ID);

        let mut cursor = project
            .query_contacts(&QueryOptions::new().page_size(900))
            .unwrap();
        let err = cursor.next().await.unwrap_err();

        match err {
            TelerivetError::InvalidParameter { param, .. } => {
                assert_eq!(param, "page_size");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        server.shutdown().await;
    }
}
