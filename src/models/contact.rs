//! Contact kind.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entity::Entity;
use crate::error::Result;
use crate::models::{ContactServiceState, DataRow, Group, Message, ScheduledMessage};
use crate::pagination::Cursor;
use crate::params::{Params, QueryOptions};
use crate::traits::{path_segment, Deletable, HasCustomVars, Resource};

/// A contact in a project.
///
/// Canonical path: `/projects/{project_id}/contacts/{id}`.
pub enum Contact {}

impl Resource for Contact {
    const KIND: &'static str = "Contact";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/contacts/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Contact {}
impl Deletable for Contact {}

const GROUP_IDS: &str = "group_ids";

impl Entity<Contact> {
    /// Display name of the contact.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the contact on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Phone number of the contact.
    pub async fn phone_number(&mut self) -> Result<Option<String>> {
        self.get_as("phone_number").await
    }

    /// Change the phone number on the next save.
    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.set_raw("phone_number", phone_number.into());
    }

    /// Whether Telerivet is blocked from sending messages to this contact.
    pub async fn send_blocked(&mut self) -> Result<Option<bool>> {
        self.get_as("send_blocked").await
    }

    /// Block or allow outgoing messages to the contact on the next save.
    pub fn set_send_blocked(&mut self, send_blocked: bool) {
        self.set_raw("send_blocked", send_blocked);
    }

    /// `active`, `handled` or `closed`.
    pub async fn conversation_status(&mut self) -> Result<Option<String>> {
        self.get_as("conversation_status").await
    }

    /// Change the conversation status (`active`, `handled` or `closed`) on the next save.
    pub fn set_conversation_status(&mut self, status: impl Into<String>) {
        self.set_raw("conversation_status", status.into());
    }

    /// Number of messages sent to or received from the contact.
    pub async fn message_count(&mut self) -> Result<Option<u64>> {
        self.get_as("message_count").await
    }

    /// Time the contact was created.
    pub async fn time_created(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("time_created").await
    }

    /// Time the contact was last updated.
    pub async fn time_updated(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("time_updated").await
    }

    /// Time of the last message sent to or received from the contact.
    pub async fn last_message_time(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("last_message_time").await
    }

    /// IDs of the groups this contact belongs to.
    pub async fn group_ids(&mut self) -> Result<Vec<String>> {
        Ok(self.get_as(GROUP_IDS).await?.unwrap_or_default())
    }

    /// Whether the contact belongs to `group`, from the cached `group_ids`.
    pub async fn is_in_group(&mut self, group: &Entity<Group>) -> Result<bool> {
        let Some(group_id) = group.id() else {
            return Ok(false);
        };
        Ok(self.group_ids().await?.iter().any(|id| id == group_id))
    }

    /// Add this contact to a group.
    pub async fn add_to_group(&mut self, group: &Entity<Group>) -> Result<()> {
        let path = format!("{}/contacts/{}", group.api_path()?, self.id_segment()?);
        self.client().put(&path, None).await?;
        if let Some(group_id) = group.id() {
            self.update_group_ids(|ids| {
                if !ids.iter().any(|id| id == group_id) {
                    ids.push(group_id.to_string());
                }
            });
        }
        Ok(())
    }

    /// Remove this contact from a group.
    pub async fn remove_from_group(&mut self, group: &Entity<Group>) -> Result<()> {
        let path = format!("{}/contacts/{}", group.api_path()?, self.id_segment()?);
        self.client().delete(&path, None).await?;
        if let Some(group_id) = group.id() {
            self.update_group_ids(|ids| ids.retain(|id| id != group_id));
        }
        Ok(())
    }

    /// Keep a locally known membership list in step; unknown lists stay unknown.
    fn update_group_ids(&mut self, update: impl FnOnce(&mut Vec<String>)) {
        let Some(Value::Array(values)) = self.peek(GROUP_IDS) else {
            return;
        };
        let mut ids: Vec<String> = values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        update(&mut ids);
        self.replace_field(GROUP_IDS, Value::from(ids));
    }

    fn id_segment(&self) -> Result<String> {
        let fields = self.data();
        path_segment::<Contact>(fields, "id")
    }

    /// Query messages sent to or received from this contact.
    pub fn query_messages(&self, options: &QueryOptions) -> Result<Cursor<Message>> {
        self.query_child("/messages", options)
    }

    /// Query groups this contact belongs to.
    pub fn query_groups(&self, options: &QueryOptions) -> Result<Cursor<Group>> {
        self.query_child("/groups", options)
    }

    /// Query scheduled messages addressed to this contact.
    pub fn query_scheduled_messages(
        &self,
        options: &QueryOptions,
    ) -> Result<Cursor<ScheduledMessage>> {
        self.query_child("/scheduled", options)
    }

    /// Query data table rows linked to this contact.
    pub fn query_data_rows(&self, options: &QueryOptions) -> Result<Cursor<DataRow>> {
        self.query_child("/rows", options)
    }

    /// Query this contact's states across services.
    pub fn query_service_states(
        &self,
        options: &QueryOptions,
    ) -> Result<Cursor<ContactServiceState>> {
        self.query_child("/states", options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fields, scripted_client};
    use crate::traits::Method;
    use serde_json::json;

    fn contact_json() -> Value {
        json!({
            "id": "CT1",
            "project_id": "PJ1",
            "name": "Alice",
            "phone_number": "+16505550001",
            "group_ids": ["CG1"],
            "vars": {"birthdate": "1990-04-01"}
        })
    }

    #[tokio::test]
    async fn test_group_membership_roundtrip() {
        let (client, log) = scripted_client(|_, _, _| Ok(json!({})));
        let mut contact = Entity::<Contact>::from_data(client.clone(), fields(contact_json()));
        let staff = client.init_project_by_id("PJ1").init_group_by_id("CG2");
        let existing = client.init_project_by_id("PJ1").init_group_by_id("CG1");

        assert!(contact.is_in_group(&existing).await.unwrap());
        assert!(!contact.is_in_group(&staff).await.unwrap());

        contact.add_to_group(&staff).await.unwrap();
        let call = log.last();
        assert_eq!(call.method, Method::Put);
        assert_eq!(call.path, "/projects/PJ1/groups/CG2/contacts/CT1");
        assert!(contact.is_in_group(&staff).await.unwrap());

        contact.remove_from_group(&existing).await.unwrap();
        assert_eq!(log.last().method, Method::Delete);
        assert_eq!(contact.group_ids().await.unwrap(), vec!["CG2".to_string()]);

        // Membership bookkeeping is not a pending write
        assert!(contact.dirty_fields().is_empty());
    }

    #[tokio::test]
    async fn test_save_contact_with_vars() {
        let (client, log) = scripted_client(|_, _, _| Ok(json!({})));
        let mut contact = Entity::<Contact>::from_data(client, fields(contact_json()));

        contact.set_name("Alice B.");
        contact.vars().await.unwrap().set("nickname", "Ali");
        contact.save().await.unwrap();

        let call = log.last();
        assert_eq!(call.path, "/projects/PJ1/contacts/CT1");
        assert_eq!(
            call.params,
            Some(fields(json!({"name": "Alice B.", "vars": {"nickname": "Ali"}})))
        );
    }

    #[tokio::test]
    async fn test_query_service_states_path() {
        let (client, _) = scripted_client(|_, _, _| Ok(json!({})));
        let contact = Entity::<Contact>::from_data(client, fields(contact_json()));

        let cursor = contact.query_service_states(&QueryOptions::new()).unwrap();
        assert_eq!(cursor.path(), "/projects/PJ1/contacts/CT1/states");
    }
}
