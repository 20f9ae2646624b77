//! Phone kind.

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::error::Result;
use crate::models::Message;
use crate::pagination::Cursor;
use crate::params::{Params, QueryOptions};
use crate::traits::{path_segment, HasCustomVars, Resource};

/// A basic route (Android phone or virtual number) that sends and receives messages.
///
/// Canonical path: `/projects/{project_id}/phones/{id}`.
pub enum Phone {}

impl Resource for Phone {
    const KIND: &'static str = "Phone";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/phones/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Phone {}

impl Entity<Phone> {
    /// Display name of the phone.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the phone on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Phone number of the phone.
    pub async fn phone_number(&mut self) -> Result<Option<String>> {
        self.get_as("phone_number").await
    }

    /// `android`, `twilio`, `nexmo`, ...
    pub async fn phone_type(&mut self) -> Result<Option<String>> {
        self.get_as("phone_type").await
    }

    /// ISO 3166-1 country code of the phone number.
    pub async fn country(&mut self) -> Result<Option<String>> {
        self.get_as("country").await
    }

    /// Whether sending is paused on this phone.
    pub async fn send_paused(&mut self) -> Result<Option<bool>> {
        self.get_as("send_paused").await
    }

    /// Pause or resume sending on the next save.
    pub fn set_send_paused(&mut self, paused: bool) {
        self.set_raw("send_paused", paused);
    }

    /// Battery percentage reported by an Android phone.
    pub async fn battery(&mut self) -> Result<Option<u8>> {
        self.get_as("battery").await
    }

    /// Time the phone last contacted the server.
    pub async fn last_active_time(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("last_active_time").await
    }

    /// Query messages sent or received by this phone.
    pub fn query_messages(&self, options: &QueryOptions) -> Result<Cursor<Message>> {
        self.query_child("/messages", options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fields, scripted_client};
    use serde_json::json;

    #[tokio::test]
    async fn test_send_paused_is_saved() {
        let (client, log) = scripted_client(|_, _, _| Ok(json!({})));
        let mut phone = Entity::<Phone>::from_data(
            client,
            fields(json!({"id": "PN1", "project_id": "PJ1", "send_paused": false})),
        );

        phone.set_send_paused(true);
        phone.save().await.unwrap();

        let call = log.last();
        assert_eq!(call.path, "/projects/PJ1/phones/PN1");
        assert_eq!(call.params, Some(fields(json!({"send_paused": true}))));
    }
}
