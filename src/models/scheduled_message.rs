//! Scheduled message kind.

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::error::Result;
use crate::params::Params;
use crate::traits::{path_segment, Deletable, HasCustomVars, Resource};

/// A message scheduled to be sent later, possibly recurring.
///
/// Canonical path: `/projects/{project_id}/scheduled/{id}`.
pub enum ScheduledMessage {}

impl Resource for ScheduledMessage {
    const KIND: &'static str = "ScheduledMessage";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/scheduled/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for ScheduledMessage {}
impl Deletable for ScheduledMessage {}

impl Entity<ScheduledMessage> {
    /// Text of the scheduled message.
    pub async fn content(&mut self) -> Result<Option<String>> {
        self.get_as("content").await
    }

    /// Change the text on the next save.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.set_raw("content", content.into());
    }

    /// Recipient phone number, for messages sent to one contact.
    pub async fn to_number(&mut self) -> Result<Option<String>> {
        self.get_as("to_number").await
    }

    /// Recipient group, for messages sent to a group.
    pub async fn group_id(&mut self) -> Result<Option<String>> {
        self.get_as("group_id").await
    }

    /// RRULE-style recurrence, if any.
    pub async fn rrule(&mut self) -> Result<Option<String>> {
        self.get_as("rrule").await
    }

    /// Change the iCalendar recurrence rule on the next save.
    pub fn set_rrule(&mut self, rrule: impl Into<String>) {
        self.set_raw("rrule", rrule.into());
    }

    /// Time zone used to interpret the recurrence rule.
    pub async fn timezone_id(&mut self) -> Result<Option<String>> {
        self.get_as("timezone_id").await
    }

    /// Time of the next occurrence.
    pub async fn next_time(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("next_time").await
    }

    /// Move the next send time.
    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) {
        self.set_raw("start_time", start_time.timestamp());
    }

    /// Number of times the message has been sent.
    pub async fn occurrences(&mut self) -> Result<Option<u64>> {
        self.get_as("occurrences").await
    }
}
