//! Label kind.

use crate::entity::Entity;
use crate::error::Result;
use crate::models::Message;
use crate::pagination::Cursor;
use crate::params::{Params, QueryOptions};
use crate::traits::{path_segment, Deletable, HasCustomVars, Resource};

/// A label that can be applied to messages.
///
/// Canonical path: `/projects/{project_id}/labels/{id}`.
pub enum Label {}

impl Resource for Label {
    const KIND: &'static str = "Label";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/labels/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Label {}
impl Deletable for Label {}

impl Entity<Label> {
    /// Display name of the label.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the label on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Messages carrying this label.
    pub fn query_messages(&self, options: &QueryOptions) -> Result<Cursor<Message>> {
        self.query_child("/messages", options)
    }
}
