//! Organization kind.

use serde::Serialize;
use serde_json::Value;

use crate::client::TelerivetClient;
use crate::entity::Entity;
use crate::error::Result;
use crate::models::{key_fields, query_cursor, Project};
use crate::pagination::Cursor;
use crate::params::{to_params, Params, QueryOptions};
use crate::traits::{path_segment, Resource};

/// An organization owning one or more projects.
///
/// Canonical path: `/organizations/{id}`. Organizations carry no custom
/// variables.
pub enum Organization {}

impl Resource for Organization {
    const KIND: &'static str = "Organization";

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/organizations/{}",
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl TelerivetClient {
    /// Retrieve the organization with the given ID.
    pub async fn get_organization_by_id(&self, id: &str) -> Result<Entity<Organization>> {
        let response = self
            .get(&format!("/organizations/{}", urlencoding::encode(id)), None)
            .await?;
        Entity::from_response(self.clone(), response)
    }

    /// Reference the organization with the given ID without a request.
    pub fn init_organization_by_id(&self, id: &str) -> Entity<Organization> {
        Entity::reference(self.clone(), key_fields(&[("id", Value::from(id))]))
    }

    /// Query organizations accessible to the current API key.
    pub fn query_organizations(&self, options: &QueryOptions) -> Result<Cursor<Organization>> {
        query_cursor(self, "/organizations".to_string(), options)
    }
}

impl Entity<Organization> {
    /// Display name of the organization.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the organization on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Default time zone of the organization.
    pub async fn timezone_id(&mut self) -> Result<Option<String>> {
        self.get_as("timezone_id").await
    }

    /// Current balance, plan and billing settings.
    pub async fn get_billing_details(&self) -> Result<Value> {
        self.get_value("/billing", None).await
    }

    /// Current usage for one metered resource, e.g. `phones` or `projects`.
    pub async fn get_usage(&self, usage_type: &str) -> Result<Value> {
        self.get_value(&format!("/usage/{}", urlencoding::encode(usage_type)), None)
            .await
    }

    /// Aggregate message statistics over a time range.
    pub async fn get_message_stats<O: Serialize + ?Sized>(&self, options: &O) -> Result<Value> {
        let params = to_params(options)?;
        self.get_value("/message_stats", Some(&params)).await
    }

    /// Query projects owned by this organization.
    pub fn query_projects(&self, options: &QueryOptions) -> Result<Cursor<Project>> {
        self.query_child("/projects", options)
    }
}
