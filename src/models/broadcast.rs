//! Broadcast kind.

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::error::Result;
use crate::params::Params;
use crate::traits::{path_segment, HasCustomVars, Resource};

/// A message sent to many recipients at once.
///
/// Canonical path: `/projects/{project_id}/broadcasts/{id}`.
pub enum Broadcast {}

impl Resource for Broadcast {
    const KIND: &'static str = "Broadcast";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/broadcasts/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for Broadcast {}

impl Entity<Broadcast> {
    /// `queuing`, `sending`, `complete` or `cancelled`.
    pub async fn status(&mut self) -> Result<Option<String>> {
        self.get_as("status").await
    }

    /// Text of the broadcast message.
    pub async fn content(&mut self) -> Result<Option<String>> {
        self.get_as("content").await
    }

    /// Number of contacts the broadcast was sent to.
    pub async fn num_recipients(&mut self) -> Result<Option<u64>> {
        self.get_as("num_recipients").await
    }

    /// Number of messages the broadcast created.
    pub async fn num_messages(&mut self) -> Result<Option<u64>> {
        self.get_as("num_messages").await
    }

    /// Time the broadcast was created.
    pub async fn time_created(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("time_created").await
    }

    /// Cancel sending; returns the broadcast as updated by the server.
    pub async fn cancel(&self) -> Result<Entity<Broadcast>> {
        self.post_child("/cancel", &Params::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fields, scripted_client};
    use crate::traits::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_cancel() {
        let (client, log) = scripted_client(|_, _, _| {
            Ok(json!({"id": "BR1", "project_id": "PJ1", "status": "cancelled"}))
        });
        let broadcast = Entity::<Broadcast>::from_data(
            client,
            fields(json!({"id": "BR1", "project_id": "PJ1", "status": "sending"})),
        );

        let mut cancelled = broadcast.cancel().await.unwrap();

        assert_eq!(log.last().method, Method::Post);
        assert_eq!(log.last().path, "/projects/PJ1/broadcasts/BR1/cancel");
        assert_eq!(cancelled.status().await.unwrap().as_deref(), Some("cancelled"));
    }
}
