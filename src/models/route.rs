//! Route kind.

use crate::entity::Entity;
use crate::error::Result;
use crate::params::Params;
use crate::traits::{path_segment, HasCustomVars, Resource};

/// A custom route that chooses a phone or service provider for outgoing messages.
///
/// Canonical path: `/projects/{project_id}/routes/{id}`.
pub enum Route {}

impl Resource for Route {
    const KIND: &'static str = "Route";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/routes/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Route {}

impl Entity<Route> {
    /// Display name of the route.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the route on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }
}
