//! Mock Telerivet API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Telerivet
//! REST API for integration and end-to-end testing. Unlike wiremock, which
//! mocks at the HTTP level per-test, this server keeps state across requests:
//! records created or updated through the client can be read back, list
//! endpoints paginate with markers, and custom variables merge on save.
//!
//! # Example
//!
//! ```ignore
//! use telerivet::mock_server::{Fixtures, MockServer, PROJECT_ID};
//! use telerivet::TelerivetClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = TelerivetClient::new("test-key", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let mut project = client.get_project_by_id(PROJECT_ID).await.unwrap();
//!     assert_eq!(project.name().await.unwrap().as_deref(), Some("Clinic Reminders"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{Fixtures, ORGANIZATION_ID, PROJECT_ID};
pub use server::MockServer;
pub use state::MockState;
