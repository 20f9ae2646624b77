//! E2E tests using the mock Telerivet server.
//!
//! These tests exercise full workflows against the stateful mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use serde_json::json;
use telerivet::mock_server::{Fixtures, MockServer, ORGANIZATION_ID, PROJECT_ID};
use telerivet::{QueryOptions, TelerivetClient, TelerivetError};
use tokio_test::{assert_err, assert_ok};

async fn start() -> (MockServer, TelerivetClient) {
    let server = MockServer::start().await;
    let client = TelerivetClient::new("test-key", server.url()).unwrap();
    (server, client)
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Entity Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_reference_loads_once_then_saves_diff() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);
    let mut contact = project.init_contact_by_id("CT000002");

    assert_eq!(
        assert_ok!(contact.name().await).as_deref(),
        Some("Contact 2")
    );
    assert_ok!(contact.phone_number().await);
    assert_eq!(server.request_count().await, 1);

    contact.set_name("Bob");
    assert_ok!(contact.vars().await).set("index", serde_json::Value::Null);
    assert_ok!(contact.vars().await).set("nickname", "Bobby");
    assert_ok!(contact.save().await);

    // Read back through a fresh reference
    let mut reloaded = assert_ok!(project.get_contact_by_id("CT000002").await);
    assert_eq!(assert_ok!(reloaded.name().await).as_deref(), Some("Bob"));
    let vars = assert_ok!(reloaded.vars().await).all();
    assert_eq!(serde_json::Value::Object(vars), json!({"nickname": "Bobby"}));

    server.shutdown().await;
}

#[tokio::test]
async fn test_get_or_create_contact_is_idempotent() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);

    let created = assert_ok!(
        project
            .get_or_create_contact(&json!({"phone_number": "+15555550100", "name": "New"}))
            .await
    );
    let found = assert_ok!(
        project
            .get_or_create_contact(&json!({"phone_number": "+15555550100"}))
            .await
    );

    assert_eq!(created.id(), found.id());

    server.shutdown().await;
}

#[tokio::test]
async fn test_deleted_contact_is_not_found() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);
    let contact = project.init_contact_by_id("CT000003");

    assert_ok!(contact.delete().await);

    let err = assert_err!(project.get_contact_by_id("CT000003").await);
    assert!(matches!(err, TelerivetError::NotFound { .. }));

    server.shutdown().await;
}

// =============================================================================
// Pagination Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_cursor_walks_every_page() {
    let state = Fixtures::with_contacts(Fixtures::default_state(), 450);
    let server = MockServer::with_state(state).await;
    let client = TelerivetClient::new("test-key", server.url()).unwrap();
    let project = client.init_project_by_id(PROJECT_ID);

    let mut cursor = assert_ok!(project.query_contacts(&QueryOptions::new()));
    assert_eq!(assert_ok!(cursor.count().await), 450);

    let contacts = assert_ok!(cursor.all().await);
    assert_eq!(contacts.len(), 450);

    // One count request plus nine pages of the server default size
    assert_eq!(server.request_count().await, 10);

    server.shutdown().await;
}

#[tokio::test]
async fn test_limit_with_filter() {
    let state = Fixtures::with_contacts(Fixtures::default_state(), 450);
    let server = MockServer::with_state(state).await;
    let client = TelerivetClient::new("test-key", server.url()).unwrap();
    let project = client.init_project_by_id(PROJECT_ID);

    let contacts = assert_ok!(
        project
            .query_contacts(&QueryOptions::new().filter("name[prefix]", "Contact 1"))
            .unwrap()
            .limit(30)
            .all()
            .await
    );

    assert_eq!(contacts.len(), 30);
    assert_eq!(server.request_count().await, 1);

    server.shutdown().await;
}

// =============================================================================
// Project Action Tests
// =============================================================================

#[tokio::test]
async fn test_group_membership_workflow() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);

    let group = assert_ok!(project.get_or_create_group("Volunteers").await);
    let mut contact = assert_ok!(project.get_contact_by_id("CT000002").await);

    assert_ok!(contact.add_to_group(&group).await);
    assert!(assert_ok!(contact.is_in_group(&group).await));

    let members = assert_ok!(
        group
            .query_contacts(&QueryOptions::new())
            .unwrap()
            .all()
            .await
    );
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id(), Some("CT000002"));

    assert_ok!(contact.remove_from_group(&group).await);
    let members = assert_ok!(
        group
            .query_contacts(&QueryOptions::new())
            .unwrap()
            .all()
            .await
    );
    assert!(members.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_send_message_and_label_it() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);

    let mut message = assert_ok!(
        project
            .send_message(&json!({"to_number": "+254711000001", "content": "Reminder"}))
            .await
    );
    assert_eq!(assert_ok!(message.status().await).as_deref(), Some("queued"));
    assert_eq!(
        assert_ok!(message.contact_id().await).as_deref(),
        Some("CT000001")
    );

    let label = project.init_label_by_id("LB000001");
    assert_ok!(message.add_label(&label).await);

    let labelled = assert_ok!(
        label
            .query_messages(&QueryOptions::new())
            .unwrap()
            .all()
            .await
    );
    assert_eq!(labelled.len(), 1);
    assert_eq!(labelled[0].id(), message.id());

    server.shutdown().await;
}

#[tokio::test]
async fn test_send_message_requires_recipient() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);

    let err = assert_err!(project.send_message(&json!({"content": "hi"})).await);

    assert!(matches!(
        err,
        TelerivetError::InvalidParameter { ref param, .. } if param == "to_number"
    ));

    server.shutdown().await;
}

#[tokio::test]
async fn test_data_table_rows() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);
    let table = assert_ok!(project.get_data_table_by_id("DT000001").await);

    let row = assert_ok!(
        table
            .create_row(&json!({"contact_id": "CT000003", "vars": {"q1": "yes"}}))
            .await
    );
    let mut fetched = assert_ok!(table.get_row_by_id(row.id().unwrap_or_default()).await);
    assert_eq!(
        assert_ok!(fetched.vars().await).get("q1"),
        Some(&json!("yes"))
    );

    let yes_rows = assert_ok!(
        table
            .query_rows(&QueryOptions::new().filter("contact_id", "CT000003"))
            .unwrap()
            .all()
            .await
    );
    assert_eq!(yes_rows.len(), 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_contact_service_state_reset_by_null_id() {
    let (server, client) = start().await;
    let project = client.init_project_by_id(PROJECT_ID);
    let service = project.init_service_by_id("SV000001");
    let contact = project.init_contact_by_id("CT000001");

    let mut state = assert_ok!(
        service
            .set_contact_state(&contact, &json!({"id": "q1", "vars": {"answer": "yes"}}))
            .await
    );
    assert_eq!(assert_ok!(state.state_id().await).as_deref(), Some("q1"));

    // Saving a null state id resets the state and drops its variables
    state.set_state_id(None);
    assert_ok!(state.save().await);

    let mut reset = assert_ok!(service.get_contact_state(&contact).await);
    assert_eq!(assert_ok!(reset.state_id().await), None);
    assert!(assert_ok!(reset.vars().await).is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_organization_projects() {
    let (server, client) = start().await;
    let organization = client.init_organization_by_id(ORGANIZATION_ID);

    let projects = assert_ok!(
        organization
            .query_projects(&QueryOptions::new())
            .unwrap()
            .all()
            .await
    );

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id(), Some(PROJECT_ID));

    server.shutdown().await;
}
