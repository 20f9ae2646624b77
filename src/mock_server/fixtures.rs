//! Test data fixtures for the mock server.
//!
//! Provides a small but realistic organization, project and its records.

use serde_json::json;

use super::state::MockState;

/// ID of the organization in the default scenario.
pub const ORGANIZATION_ID: &str = "OR000001";

/// ID of the project in the default scenario.
pub const PROJECT_ID: &str = "PJ000001";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Path of a record inside the default project.
    pub fn project_path(suffix: &str) -> String {
        format!("/projects/{}{}", PROJECT_ID, suffix)
    }

    /// The default scenario: one project with contacts, a group, a label,
    /// a phone, a message, a data table and a poll service.
    pub fn default_state() -> MockState {
        let state = MockState::new()
            .with_record(
                &format!("/organizations/{}", ORGANIZATION_ID),
                json!({"name": "Acme Health", "timezone_id": "Africa/Nairobi"}),
            )
            .with_record(
                &format!("/projects/{}", PROJECT_ID),
                json!({
                    "name": "Clinic Reminders",
                    "timezone_id": "Africa/Nairobi",
                    "url_slug": "clinic",
                    "organization_id": ORGANIZATION_ID,
                    "vars": {}
                }),
            )
            .with_record(
                &Self::project_path("/groups/CG000001"),
                json!({"name": "Staff", "dynamic": false, "num_members": 1, "vars": {}}),
            )
            .with_record(
                &Self::project_path("/labels/LB000001"),
                json!({"name": "Important", "vars": {}}),
            )
            .with_record(
                &Self::project_path("/phones/PN000001"),
                json!({
                    "name": "Android 1",
                    "phone_number": "+254700000001",
                    "phone_type": "android",
                    "country": "KE",
                    "send_paused": false,
                    "battery": 87,
                    "vars": {}
                }),
            )
            .with_record(
                &Self::project_path("/tables/DT000001"),
                json!({"name": "Survey", "num_rows": 2, "vars": {}}),
            )
            .with_record(
                &Self::project_path("/tables/DT000001/rows/DR000001"),
                json!({
                    "contact_id": "CT000001",
                    "from_number": "+254711000001",
                    "vars": {"q1": "yes"}
                }),
            )
            .with_record(
                &Self::project_path("/tables/DT000001/rows/DR000002"),
                json!({
                    "contact_id": "CT000002",
                    "from_number": "+254711000002",
                    "vars": {"q1": "no"}
                }),
            )
            .with_record(
                &Self::project_path("/services/SV000001"),
                json!({"name": "Survey Poll", "active": true, "service_type": "poll", "vars": {}}),
            )
            .with_record(
                &Self::project_path("/messages/SM000001"),
                json!({
                    "direction": "incoming",
                    "status": "received",
                    "message_type": "sms",
                    "content": "hello",
                    "from_number": "+254711000001",
                    "to_number": "+254700000001",
                    "contact_id": "CT000001",
                    "phone_id": "PN000001",
                    "starred": false,
                    "label_ids": [],
                    "vars": {}
                }),
            );

        Self::with_contacts(state, 3)
    }

    /// Add `count` contacts to the default project.
    ///
    /// The first contact belongs to the `Staff` group.
    pub fn with_contacts(mut state: MockState, count: usize) -> MockState {
        for n in 1..=count {
            let group_ids = if n == 1 { json!(["CG000001"]) } else { json!([]) };
            state = state.with_record(
                &Self::project_path(&format!("/contacts/CT{:06}", n)),
                json!({
                    "name": format!("Contact {}", n),
                    "phone_number": format!("+2547110{:05}", n),
                    "send_blocked": false,
                    "conversation_status": "active",
                    "message_count": 0,
                    "group_ids": group_ids,
                    "vars": {"index": n}
                }),
            );
        }
        state
    }
}
