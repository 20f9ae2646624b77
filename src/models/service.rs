//! Automated service kind and per-contact service state.

use serde::Serialize;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::Result;
use crate::models::{Contact, Message};
use crate::pagination::Cursor;
use crate::params::{Params, QueryOptions};
use crate::traits::{path_segment, HasCustomVars, Resource};

/// An automated service, e.g. a poll, auto-reply or custom script.
///
/// Canonical path: `/projects/{project_id}/services/{id}`.
pub enum Service {}

impl Resource for Service {
    const KIND: &'static str = "Service";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/services/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Service {}

/// The state of one contact within a stateful service such as a poll.
///
/// Unlike other kinds, `id` here is the state name (e.g. `q2`), not a
/// unique identifier; many contacts may share it. Saving with a `null` id
/// resets the state and drops its variables.
///
/// Canonical path: `/projects/{project_id}/services/{service_id}/states/{contact_id}`.
pub enum ContactServiceState {}

impl Resource for ContactServiceState {
    const KIND: &'static str = "ContactServiceState";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/services/{}/states/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "service_id")?,
            path_segment::<Self>(fields, "contact_id")?
        ))
    }
}

impl HasCustomVars for ContactServiceState {}

/// Outcome of [`Entity::<Service>::invoke`].
#[derive(Debug)]
pub struct InvokeResult {
    /// Messages sent by the service; absent for asynchronous invocations.
    pub sent_messages: Option<Vec<Entity<Message>>>,
    /// Remaining response fields, e.g. `return_value` and `log_entries`.
    pub data: Params,
}

impl Entity<Service> {
    /// Display name of the service.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the service on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Whether the service is active.
    pub async fn active(&mut self) -> Result<Option<bool>> {
        self.get_as("active").await
    }

    /// Activate or deactivate the service on the next save.
    pub fn set_active(&mut self, active: bool) {
        self.set_raw("active", active);
    }

    /// Type of the service, e.g. `poll` or `custom_actions`.
    pub async fn service_type(&mut self) -> Result<Option<String>> {
        self.get_as("service_type").await
    }

    /// Run the service against a context such as a contact or message.
    pub async fn invoke<O: Serialize + ?Sized>(&self, options: &O) -> Result<InvokeResult> {
        let response = self.post_value("/invoke", options).await?;
        let mut data: Params = serde_json::from_value(response)?;

        let sent_messages = match data.remove("sent_messages") {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .map(|item| Entity::from_response(self.client().clone(), item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            _ => None,
        };

        Ok(InvokeResult {
            sent_messages,
            data,
        })
    }

    /// Current state of `contact` in this service.
    pub async fn get_contact_state(
        &self,
        contact: &Entity<Contact>,
    ) -> Result<Entity<ContactServiceState>> {
        self.get_child(&state_suffix(contact)?).await
    }

    /// Set `contact`'s state; `options` carries `id` and optionally `vars`.
    pub async fn set_contact_state<O: Serialize + ?Sized>(
        &self,
        contact: &Entity<Contact>,
        options: &O,
    ) -> Result<Entity<ContactServiceState>> {
        self.post_child(&state_suffix(contact)?, options).await
    }

    /// Reset `contact`'s state; returns the state as it now stands.
    pub async fn reset_contact_state(
        &self,
        contact: &Entity<Contact>,
    ) -> Result<Entity<ContactServiceState>> {
        let path = self.sub_path(&state_suffix(contact)?)?;
        let response = self.client().delete(&path, None).await?;
        Entity::from_response(self.client().clone(), response)
    }

    /// Query contact states stored by this service.
    pub fn query_contact_states(
        &self,
        options: &QueryOptions,
    ) -> Result<Cursor<ContactServiceState>> {
        self.query_child("/states", options)
    }
}

fn state_suffix(contact: &Entity<Contact>) -> Result<String> {
    Ok(format!("/states/{}", path_segment::<Contact>(contact.data(), "id")?))
}

impl Entity<ContactServiceState> {
    /// Current state name, `None` if the contact has no state.
    pub async fn state_id(&mut self) -> Result<Option<String>> {
        self.get_as("id").await
    }

    /// Set the state name; `None` resets the state on save.
    pub fn set_state_id(&mut self, state_id: Option<&str>) {
        self.set_raw("id", state_id.map_or(Value::Null, Value::from));
    }

    /// Contact the state belongs to.
    pub async fn contact_id(&mut self) -> Result<Option<String>> {
        self.get_as("contact_id").await
    }

    /// Service storing the state.
    pub async fn service_id(&mut self) -> Result<Option<String>> {
        self.get_as("service_id").await
    }

    /// Reset this state on the server.
    pub async fn reset(&self) -> Result<()> {
        let path = self.api_path()?;
        self.client().delete(&path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fields, scripted_client};
    use crate::traits::Method;
    use serde_json::json;

    fn service(client: crate::TelerivetClient) -> Entity<Service> {
        Entity::from_data(
            client,
            fields(json!({"id": "SV1", "project_id": "PJ1", "name": "Poll"})),
        )
    }

    fn state_json(id: Value) -> Value {
        json!({
            "id": id,
            "contact_id": "CT1",
            "service_id": "SV1",
            "project_id": "PJ1",
            "vars": {"answer": "yes"}
        })
    }

    #[tokio::test]
    async fn test_invoke_hydrates_sent_messages() {
        let (client, log) = scripted_client(|_, _, _| {
            Ok(json!({
                "return_value": 42,
                "sent_messages": [
                    {"id": "SM1", "project_id": "PJ1", "content": "hi"},
                    {"id": "SM2", "project_id": "PJ1", "content": "bye"}
                ]
            }))
        });

        let result = service(client)
            .invoke(&json!({"context": "contact", "contact_id": "CT1"}))
            .await
            .unwrap();

        assert_eq!(log.last().path, "/projects/PJ1/services/SV1/invoke");
        let sent = result.sent_messages.unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].is_loaded());
        assert_eq!(sent[1].id(), Some("SM2"));
        assert_eq!(result.data["return_value"], 42);
    }

    #[tokio::test]
    async fn test_async_invoke_has_no_messages() {
        let (client, _) = scripted_client(|_, _, _| Ok(json!({"return_value": null})));

        let result = service(client).invoke(&json!({"async": true})).await.unwrap();

        assert!(result.sent_messages.is_none());
    }

    #[tokio::test]
    async fn test_contact_state_paths() {
        let (client, log) = scripted_client(|_, _, _| Ok(state_json(json!("q1"))));
        let service = service(client.clone());
        let contact = client.init_project_by_id("PJ1").init_contact_by_id("CT1");

        let mut state = service.get_contact_state(&contact).await.unwrap();
        assert_eq!(log.last().path, "/projects/PJ1/services/SV1/states/CT1");
        assert_eq!(state.state_id().await.unwrap().as_deref(), Some("q1"));
        assert_eq!(
            state.api_path().unwrap(),
            "/projects/PJ1/services/SV1/states/CT1"
        );

        service.reset_contact_state(&contact).await.unwrap();
        assert_eq!(log.last().method, Method::Delete);
    }

    #[tokio::test]
    async fn test_saving_null_state_id_resets() {
        let (client, log) = scripted_client(|_, _, _| Ok(json!({})));
        let mut state =
            Entity::<ContactServiceState>::from_data(client, fields(state_json(json!("q2"))));

        state.set_state_id(None);
        state.save().await.unwrap();

        let call = log.last();
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.path, "/projects/PJ1/services/SV1/states/CT1");
        assert_eq!(call.params, Some(fields(json!({"id": null}))));
    }
}
