//! Project kind and the project-scoped operations.

use serde::Serialize;
use serde_json::Value;

use crate::client::TelerivetClient;
use crate::entity::Entity;
use crate::error::Result;
use crate::models::{
    key_fields, query_cursor, AirtimeTransaction, Broadcast, Contact, DataTable, Group, Label,
    Message, Phone, Route, ScheduledMessage, Service,
};
use crate::pagination::Cursor;
use crate::params::{Params, QueryOptions};
use crate::traits::{path_segment, HasCustomVars, Resource};

/// A Telerivet project: the container for contacts, messages, phones and services.
///
/// Canonical path: `/projects/{id}`.
pub enum Project {}

impl Resource for Project {
    const KIND: &'static str = "Project";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!("/projects/{}", path_segment::<Self>(fields, "id")?))
    }
}

impl HasCustomVars for Project {}

impl TelerivetClient {
    /// Retrieve the project with the given ID.
    pub async fn get_project_by_id(&self, id: &str) -> Result<Entity<Project>> {
        let response = self
            .get(&format!("/projects/{}", urlencoding::encode(id)), None)
            .await?;
        Entity::from_response(self.clone(), response)
    }

    /// Reference the project with the given ID without a request.
    pub fn init_project_by_id(&self, id: &str) -> Entity<Project> {
        Entity::reference(self.clone(), key_fields(&[("id", Value::from(id))]))
    }

    /// Query projects accessible to the current API key.
    pub fn query_projects(&self, options: &QueryOptions) -> Result<Cursor<Project>> {
        query_cursor(self, "/projects".to_string(), options)
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

impl Entity<Project> {
    /// Display name of the project.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the project on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Default TZ database timezone ID, e.g. `Africa/Nairobi`.
    pub async fn timezone_id(&mut self) -> Result<Option<String>> {
        self.get_as("timezone_id").await
    }

    /// Change the project time zone on the next save.
    pub fn set_timezone_id(&mut self, timezone_id: impl Into<String>) {
        self.set_raw("timezone_id", timezone_id.into());
    }

    /// Unique slug used in the project's web URLs.
    pub async fn url_slug(&mut self) -> Result<Option<String>> {
        self.get_as("url_slug").await
    }

    /// Organization owning the project.
    pub async fn organization_id(&mut self) -> Result<Option<String>> {
        self.get_as("organization_id").await
    }

    // --- Sending ---

    /// Send one message; returns the created message.
    pub async fn send_message<O: Serialize + ?Sized>(
        &self,
        options: &O,
    ) -> Result<Entity<Message>> {
        self.post_child("/messages/send", options).await
    }

    /// Send a message to a group or list of numbers.
    pub async fn send_broadcast<O: Serialize + ?Sized>(
        &self,
        options: &O,
    ) -> Result<Entity<Broadcast>> {
        self.post_child("/send_broadcast", options).await
    }

    /// Send up to 100 different messages in one request.
    pub async fn send_multi<O: Serialize + ?Sized>(&self, options: &O) -> Result<Value> {
        self.post_value("/send_multi", options).await
    }

    /// Send messages to a list of numbers in one request.
    pub async fn send_messages<O: Serialize + ?Sized>(&self, options: &O) -> Result<Value> {
        self.post_value("/messages/send_batch", options).await
    }

    /// Schedule a message for later, optionally recurring.
    pub async fn schedule_message<O: Serialize + ?Sized>(
        &self,
        options: &O,
    ) -> Result<Entity<ScheduledMessage>> {
        self.post_child("/scheduled", options).await
    }

    /// Add an incoming message as if it had been received by a phone.
    pub async fn receive_message<O: Serialize + ?Sized>(
        &self,
        options: &O,
    ) -> Result<Entity<Message>> {
        self.post_child("/messages/receive", options).await
    }

    // --- Contacts ---

    /// Find a contact by ID or phone number, creating it if needed.
    pub async fn get_or_create_contact<O: Serialize + ?Sized>(
        &self,
        options: &O,
    ) -> Result<Entity<Contact>> {
        self.post_child("/contacts", options).await
    }

    /// Create or update up to 200 contacts in one request.
    pub async fn import_contacts<O: Serialize + ?Sized>(&self, options: &O) -> Result<Value> {
        self.post_value("/import_contacts", options).await
    }

    /// Query contacts in this project.
    pub fn query_contacts(&self, options: &QueryOptions) -> Result<Cursor<Contact>> {
        self.query_child("/contacts", options)
    }

    /// Retrieve the contact with the given ID.
    pub async fn get_contact_by_id(&self, id: &str) -> Result<Entity<Contact>> {
        self.get_child(&format!("/contacts/{}", segment(id))).await
    }

    /// Reference the contact with the given ID without a request.
    pub fn init_contact_by_id(&self, id: &str) -> Entity<Contact> {
        self.init_in_project("id", id)
    }

    // --- Phones ---

    /// Query phones in this project.
    pub fn query_phones(&self, options: &QueryOptions) -> Result<Cursor<Phone>> {
        self.query_child("/phones", options)
    }

    /// Retrieve the phone with the given ID.
    pub async fn get_phone_by_id(&self, id: &str) -> Result<Entity<Phone>> {
        self.get_child(&format!("/phones/{}", segment(id))).await
    }

    /// Reference the phone with the given ID without a request.
    pub fn init_phone_by_id(&self, id: &str) -> Entity<Phone> {
        self.init_in_project("id", id)
    }

    // --- Messages ---

    /// Query messages in this project.
    pub fn query_messages(&self, options: &QueryOptions) -> Result<Cursor<Message>> {
        self.query_child("/messages", options)
    }

    /// Retrieve the message with the given ID.
    pub async fn get_message_by_id(&self, id: &str) -> Result<Entity<Message>> {
        self.get_child(&format!("/messages/{}", segment(id))).await
    }

    /// Reference the message with the given ID without a request.
    pub fn init_message_by_id(&self, id: &str) -> Entity<Message> {
        self.init_in_project("id", id)
    }

    // --- Broadcasts ---

    /// Query broadcasts in this project.
    pub fn query_broadcasts(&self, options: &QueryOptions) -> Result<Cursor<Broadcast>> {
        self.query_child("/broadcasts", options)
    }

    /// Retrieve the broadcast with the given ID.
    pub async fn get_broadcast_by_id(&self, id: &str) -> Result<Entity<Broadcast>> {
        self.get_child(&format!("/broadcasts/{}", segment(id))).await
    }

    /// Reference the broadcast with the given ID without a request.
    pub fn init_broadcast_by_id(&self, id: &str) -> Entity<Broadcast> {
        self.init_in_project("id", id)
    }

    // --- Groups ---

    /// Query groups in this project.
    pub fn query_groups(&self, options: &QueryOptions) -> Result<Cursor<Group>> {
        self.query_child("/groups", options)
    }

    /// Find a group by name, creating it if needed.
    pub async fn get_or_create_group(&self, name: &str) -> Result<Entity<Group>> {
        self.post_child("/groups", &serde_json::json!({ "name": name }))
            .await
    }

    /// Retrieve the group with the given ID.
    pub async fn get_group_by_id(&self, id: &str) -> Result<Entity<Group>> {
        self.get_child(&format!("/groups/{}", segment(id))).await
    }

    /// Reference the group with the given ID without a request.
    pub fn init_group_by_id(&self, id: &str) -> Entity<Group> {
        self.init_in_project("id", id)
    }

    // --- Labels ---

    /// Query labels in this project.
    pub fn query_labels(&self, options: &QueryOptions) -> Result<Cursor<Label>> {
        self.query_child("/labels", options)
    }

    /// Find a label by name, creating it if needed.
    pub async fn get_or_create_label(&self, name: &str) -> Result<Entity<Label>> {
        self.post_child("/labels", &serde_json::json!({ "name": name }))
            .await
    }

    /// Retrieve the label with the given ID.
    pub async fn get_label_by_id(&self, id: &str) -> Result<Entity<Label>> {
        self.get_child(&format!("/labels/{}", segment(id))).await
    }

    /// Reference the label with the given ID without a request.
    pub fn init_label_by_id(&self, id: &str) -> Entity<Label> {
        self.init_in_project("id", id)
    }

    // --- Data tables ---

    /// Query data tables in this project.
    pub fn query_data_tables(&self, options: &QueryOptions) -> Result<Cursor<DataTable>> {
        self.query_child("/tables", options)
    }

    /// Find a data table by name, creating it if needed.
    pub async fn get_or_create_data_table(&self, name: &str) -> Result<Entity<DataTable>> {
        self.post_child("/tables", &serde_json::json!({ "name": name }))
            .await
    }

    /// Retrieve the data table with the given ID.
    pub async fn get_data_table_by_id(&self, id: &str) -> Result<Entity<DataTable>> {
        self.get_child(&format!("/tables/{}", segment(id))).await
    }

    /// Reference the data table with the given ID without a request.
    pub fn init_data_table_by_id(&self, id: &str) -> Entity<DataTable> {
        self.init_in_project("id", id)
    }

    // --- Scheduled messages ---

    /// Query scheduled messages in this project.
    pub fn query_scheduled_messages(
        &self,
        options: &QueryOptions,
    ) -> Result<Cursor<ScheduledMessage>> {
        self.query_child("/scheduled", options)
    }

    /// Retrieve the scheduled message with the given ID.
    pub async fn get_scheduled_message_by_id(&self, id: &str) -> Result<Entity<ScheduledMessage>> {
        self.get_child(&format!("/scheduled/{}", segment(id))).await
    }

    /// Reference the scheduled message with the given ID without a request.
    pub fn init_scheduled_message_by_id(&self, id: &str) -> Entity<ScheduledMessage> {
        self.init_in_project("id", id)
    }

    // --- Services ---

    /// Query services in this project.
    pub fn query_services(&self, options: &QueryOptions) -> Result<Cursor<Service>> {
        self.query_child("/services", options)
    }

    /// Retrieve the service with the given ID.
    pub async fn get_service_by_id(&self, id: &str) -> Result<Entity<Service>> {
        self.get_child(&format!("/services/{}", segment(id))).await
    }

    /// Reference the service with the given ID without a request.
    pub fn init_service_by_id(&self, id: &str) -> Entity<Service> {
        self.init_in_project("id", id)
    }

    // --- Routes ---

    /// Query custom routes in this project.
    pub fn query_routes(&self, options: &QueryOptions) -> Result<Cursor<Route>> {
        self.query_child("/routes", options)
    }

    /// Retrieve the route with the given ID.
    pub async fn get_route_by_id(&self, id: &str) -> Result<Entity<Route>> {
        self.get_child(&format!("/routes/{}", segment(id))).await
    }

    /// Reference the route with the given ID without a request.
    pub fn init_route_by_id(&self, id: &str) -> Entity<Route> {
        self.init_in_project("id", id)
    }

    // --- Airtime transactions ---

    /// Query airtime transactions in this project.
    pub fn query_airtime_transactions(
        &self,
        options: &QueryOptions,
    ) -> Result<Cursor<AirtimeTransaction>> {
        self.query_child("/airtime_transactions", options)
    }

    /// Retrieve the airtime transaction with the given ID.
    pub async fn get_airtime_transaction_by_id(
        &self,
        id: &str,
    ) -> Result<Entity<AirtimeTransaction>> {
        self.get_child(&format!("/airtime_transactions/{}", segment(id))).await
    }

    /// Reference the airtime transaction with the given ID without a request.
    pub fn init_airtime_transaction_by_id(&self, id: &str) -> Entity<AirtimeTransaction> {
        self.init_in_project("id", id)
    }

    /// Users with access to this project.
    pub async fn get_users(&self) -> Result<Value> {
        self.get_value("/users", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fields, scripted_client};
    use crate::traits::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_init_contact_by_id_is_reference() {
        let (client, log) = scripted_client(|_, _, _| Ok(json!({})));
        let project = client.init_project_by_id("PJ1");
        let contact = project.init_contact_by_id("CT1");

        assert!(!contact.is_loaded());
        assert_eq!(contact.api_path().unwrap(), "/projects/PJ1/contacts/CT1");
        assert_eq!(log.len(), 0);
    }

    #[tokio::test]
    async fn test_send_message_hydrates_result() {
        let (client, log) = scripted_client(|_, _, _| {
            Ok(json!({
                "id": "SM1",
                "project_id": "PJ1",
                "status": "queued",
                "content": "hello"
            }))
        });
        let project = client.init_project_by_id("PJ1");

        let mut message = project
            .send_message(&json!({"to_number": "+16505550123", "content": "hello"}))
            .await
            .unwrap();

        let call = log.last();
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.path, "/projects/PJ1/messages/send");
        assert_eq!(call.params.unwrap()["to_number"], "+16505550123");

        assert!(message.is_loaded());
        assert_eq!(message.status().await.unwrap().as_deref(), Some("queued"));
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_query_contacts_uses_resource_page_cap() {
        let (client, log) = scripted_client(|_, _, _| {
            Ok(json!({"data": [], "truncated": false, "next_marker": null}))
        });
        let project = client.init_project_by_id("PJ1");

        let contacts = project
            .query_contacts(&QueryOptions::new().filter("name", "Alice"))
            .unwrap()
            .limit(1000)
            .all()
            .await
            .unwrap();

        assert!(contacts.is_empty());
        let call = log.last();
        assert_eq!(call.path, "/projects/PJ1/contacts");
        let params = call.params.unwrap();
        assert_eq!(params["page_size"], 500);
        assert_eq!(params["name"], "Alice");
    }

    #[tokio::test]
    async fn test_get_or_create_group_posts_name() {
        let (client, log) = scripted_client(|_, _, _| {
            Ok(json!({"id": "CG1", "project_id": "PJ1", "name": "Staff"}))
        });
        let project = Entity::<Project>::from_data(client, fields(json!({"id": "PJ1"})));

        let group = project.get_or_create_group("Staff").await.unwrap();

        assert_eq!(group.id(), Some("CG1"));
        assert_eq!(log.last().params, Some(fields(json!({"name": "Staff"}))));
    }
}
