//! Group kind.

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::error::Result;
use crate::models::{Contact, ScheduledMessage};
use crate::pagination::Cursor;
use crate::params::{Params, QueryOptions};
use crate::traits::{path_segment, Deletable, HasCustomVars, Resource};

/// A named group of contacts; dynamic groups are defined by a filter.
///
/// Canonical path: `/projects/{project_id}/groups/{id}`.
pub enum Group {}

impl Resource for Group {
    const KIND: &'static str = "Group";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/groups/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Group {}
impl Deletable for Group {}

impl Entity<Group> {
    /// Display name of the group.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the group on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Whether membership is computed from a filter.
    pub async fn dynamic(&mut self) -> Result<Option<bool>> {
        self.get_as("dynamic").await
    }

    /// Number of contacts in the group.
    pub async fn num_members(&mut self) -> Result<Option<u64>> {
        self.get_as("num_members").await
    }

    /// Time the group was created.
    pub async fn time_created(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("time_created").await
    }

    /// Query contacts in this group.
    pub fn query_contacts(&self, options: &QueryOptions) -> Result<Cursor<Contact>> {
        self.query_child("/contacts", options)
    }

    /// Query scheduled messages addressed to this group.
    pub fn query_scheduled_messages(
        &self,
        options: &QueryOptions,
    ) -> Result<Cursor<ScheduledMessage>> {
        self.query_child("/scheduled", options)
    }
}
