//! Message kind.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entity::Entity;
use crate::error::Result;
use crate::models::Label;
use crate::params::Params;
use crate::traits::{path_segment, Deletable, HasCustomVars, Resource};

/// A message sent or received in a project.
///
/// Canonical path: `/projects/{project_id}/messages/{id}`.
pub enum Message {}

impl Resource for Message {
    const KIND: &'static str = "Message";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/messages/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Message {}
impl Deletable for Message {}

const LABEL_IDS: &str = "label_ids";

impl Entity<Message> {
    /// `incoming` or `outgoing`.
    pub async fn direction(&mut self) -> Result<Option<String>> {
        self.get_as("direction").await
    }

    /// Delivery status, e.g. `queued`, `sent`, `delivered`, `failed`.
    pub async fn status(&mut self) -> Result<Option<String>> {
        self.get_as("status").await
    }

    /// `sms`, `mms`, `ussd`, `call`, ...
    pub async fn message_type(&mut self) -> Result<Option<String>> {
        self.get_as("message_type").await
    }

    /// Text of the message.
    pub async fn content(&mut self) -> Result<Option<String>> {
        self.get_as("content").await
    }

    /// Sender phone number.
    pub async fn from_number(&mut self) -> Result<Option<String>> {
        self.get_as("from_number").await
    }

    /// Recipient phone number.
    pub async fn to_number(&mut self) -> Result<Option<String>> {
        self.get_as("to_number").await
    }

    /// Whether the message is starred.
    pub async fn starred(&mut self) -> Result<Option<bool>> {
        self.get_as("starred").await
    }

    /// Star or unstar the message on the next save.
    pub fn set_starred(&mut self, starred: bool) {
        self.set_raw("starred", starred);
    }

    /// Delivery error reported for the message, if any.
    pub async fn error_message(&mut self) -> Result<Option<String>> {
        self.get_as("error_message").await
    }

    /// Contact the message was sent to or received from.
    pub async fn contact_id(&mut self) -> Result<Option<String>> {
        self.get_as("contact_id").await
    }

    /// Phone that sent or received the message.
    pub async fn phone_id(&mut self) -> Result<Option<String>> {
        self.get_as("phone_id").await
    }

    /// Time the message was created.
    pub async fn time_created(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("time_created").await
    }

    /// Time the message was sent.
    pub async fn time_sent(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("time_sent").await
    }

    /// IDs of the labels applied to the message.
    pub async fn label_ids(&mut self) -> Result<Vec<String>> {
        Ok(self.get_as(LABEL_IDS).await?.unwrap_or_default())
    }

    /// Whether `label` is applied, from the cached `label_ids`.
    pub async fn has_label(&mut self, label: &Entity<Label>) -> Result<bool> {
        let Some(label_id) = label.id() else {
            return Ok(false);
        };
        Ok(self.label_ids().await?.iter().any(|id| id == label_id))
    }

    /// Add a label to this message.
    pub async fn add_label(&mut self, label: &Entity<Label>) -> Result<()> {
        let path = format!(
            "{}/messages/{}",
            label.api_path()?,
            path_segment::<Message>(self.data(), "id")?
        );
        self.client().put(&path, None).await?;
        if let Some(label_id) = label.id() {
            self.update_label_ids(|ids| {
                if !ids.iter().any(|id| id == label_id) {
                    ids.push(label_id.to_string());
                }
            });
        }
        Ok(())
    }

    /// Remove a label from this message.
    pub async fn remove_label(&mut self, label: &Entity<Label>) -> Result<()> {
        let path = format!(
            "{}/messages/{}",
            label.api_path()?,
            path_segment::<Message>(self.data(), "id")?
        );
        self.client().delete(&path, None).await?;
        if let Some(label_id) = label.id() {
            self.update_label_ids(|ids| ids.retain(|id| id != label_id));
        }
        Ok(())
    }

    fn update_label_ids(&mut self, update: impl FnOnce(&mut Vec<String>)) {
        let Some(Value::Array(values)) = self.peek(LABEL_IDS) else {
            return;
        };
        let mut ids: Vec<String> = values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        update(&mut ids);
        self.replace_field(LABEL_IDS, Value::from(ids));
    }

    /// Media parts of an MMS message.
    pub async fn get_mms_parts(&self) -> Result<Value> {
        self.get_value("/mms_parts", None).await
    }

    /// Resend a failed or cancelled outgoing message.
    ///
    /// Returns the message that was queued, which may be a new record.
    pub async fn resend(&self) -> Result<Entity<Message>> {
        self.post_child("/resend", &Params::new()).await
    }
}
