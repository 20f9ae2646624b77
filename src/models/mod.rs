//! Telerivet resource kinds and their operations.
//!
//! Each kind is a marker type implementing [`Resource`]; records are held in
//! [`Entity`] values and operations are inherent methods on `Entity<Kind>`.

mod airtime_transaction;
mod broadcast;
mod contact;
mod data_table;
mod group;
mod label;
mod message;
mod organization;
mod phone;
mod project;
mod route;
mod scheduled_message;
mod service;

pub use airtime_transaction::*;
pub use broadcast::*;
pub use contact::*;
pub use data_table::*;
pub use group::*;
pub use label::*;
pub use message::*;
pub use organization::*;
pub use phone::*;
pub use project::*;
pub use route::*;
pub use scheduled_message::*;
pub use service::*;

use serde::Serialize;
use serde_json::Value;

use crate::client::TelerivetClient;
use crate::entity::Entity;
use crate::error::Result;
use crate::pagination::{Cursor, RESOURCE_MAX_PAGE_SIZE};
use crate::params::{to_params, Params, QueryOptions};
use crate::traits::Resource;

/// Cursor over a resource list endpoint, with the endpoint's page-size cap.
pub(crate) fn query_cursor<C: Resource>(
    client: &TelerivetClient,
    path: String,
    options: &QueryOptions,
) -> Result<Cursor<C>> {
    Ok(Cursor::new(client.clone(), path, options.to_params()?)?
        .max_page_size(RESOURCE_MAX_PAGE_SIZE))
}

/// Identifying fields for a reference entity.
pub(crate) fn key_fields(pairs: &[(&str, Value)]) -> Params {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

impl<R: Resource> Entity<R> {
    /// A path below this record's canonical path.
    pub(crate) fn sub_path(&self, suffix: &str) -> Result<String> {
        Ok(format!("{}{}", self.api_path()?, suffix))
    }

    /// A locally known field, or `null`, for building child references.
    pub(crate) fn key(&self, name: &str) -> Value {
        self.peek(name).cloned().unwrap_or(Value::Null)
    }

    pub(crate) fn query_child<C: Resource>(
        &self,
        suffix: &str,
        options: &QueryOptions,
    ) -> Result<Cursor<C>> {
        query_cursor(self.client(), self.sub_path(suffix)?, options)
    }

    pub(crate) async fn get_child<C: Resource>(&self, suffix: &str) -> Result<Entity<C>> {
        let response = self.client().get(&self.sub_path(suffix)?, None).await?;
        Entity::from_response(self.client().clone(), response)
    }

    pub(crate) async fn post_child<C: Resource, O: Serialize + ?Sized>(
        &self,
        suffix: &str,
        options: &O,
    ) -> Result<Entity<C>> {
        let params = to_params(options)?;
        let response = self
            .client()
            .post(&self.sub_path(suffix)?, Some(&params))
            .await?;
        Entity::from_response(self.client().clone(), response)
    }

    pub(crate) async fn get_value(&self, suffix: &str, params: Option<&Params>) -> Result<Value> {
        self.client().get(&self.sub_path(suffix)?, params).await
    }

    pub(crate) async fn post_value<O: Serialize + ?Sized>(
        &self,
        suffix: &str,
        options: &O,
    ) -> Result<Value> {
        let params = to_params(options)?;
        self.client()
            .post(&self.sub_path(suffix)?, Some(&params))
            .await
    }

    /// Reference to a record owned by this project-scoped record.
    pub(crate) fn init_in_project<C: Resource>(&self, project_field: &str, id: &str) -> Entity<C> {
        Entity::reference(
            self.client().clone(),
            key_fields(&[
                ("project_id", self.key(project_field)),
                ("id", Value::from(id)),
            ]),
        )
    }
}
