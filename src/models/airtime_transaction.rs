//! Airtime transaction kind.

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::error::Result;
use crate::params::Params;
use crate::traits::{path_segment, HasCustomVars, Resource};

/// A transfer of mobile airtime to a phone number.
///
/// Canonical path: `/projects/{project_id}/airtime_transactions/{id}`.
pub enum AirtimeTransaction {}

impl Resource for AirtimeTransaction {
    const KIND: &'static str = "AirtimeTransaction";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/airtime_transactions/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for AirtimeTransaction {}

impl Entity<AirtimeTransaction> {
    /// Phone number that received the airtime.
    pub async fn to_number(&mut self) -> Result<Option<String>> {
        self.get_as("to_number").await
    }

    /// Mobile operator of the recipient.
    pub async fn operator_name(&mut self) -> Result<Option<String>> {
        self.get_as("operator_name").await
    }

    /// ISO 3166-1 country code of the recipient.
    pub async fn country(&mut self) -> Result<Option<String>> {
        self.get_as("country").await
    }

    /// `pending_approval`, `queued`, `processing`, `successful`, `failed`, ...
    pub async fn status(&mut self) -> Result<Option<String>> {
        self.get_as("status").await
    }

    /// Error or status detail from the airtime provider.
    pub async fn status_text(&mut self) -> Result<Option<String>> {
        self.get_as("status_text").await
    }

    /// Amount of airtime sent, in `value_currency`.
    pub async fn value(&mut self) -> Result<Option<f64>> {
        self.get_as("value").await
    }

    /// Currency of `value`.
    pub async fn value_currency(&mut self) -> Result<Option<String>> {
        self.get_as("value_currency").await
    }

    /// Amount charged, in `price_currency`.
    pub async fn price(&mut self) -> Result<Option<f64>> {
        self.get_as("price").await
    }

    /// Currency of `price`.
    pub async fn price_currency(&mut self) -> Result<Option<String>> {
        self.get_as("price_currency").await
    }

    /// Contact that received the airtime.
    pub async fn contact_id(&mut self) -> Result<Option<String>> {
        self.get_as("contact_id").await
    }

    /// Service that sent the airtime, if any.
    pub async fn service_id(&mut self) -> Result<Option<String>> {
        self.get_as("service_id").await
    }

    /// Transaction ID at the airtime provider.
    pub async fn external_id(&mut self) -> Result<Option<String>> {
        self.get_as("external_id").await
    }

    /// Time the transaction was created.
    pub async fn time_created(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.get_time("time_created").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::QueryOptions;
    use crate::testing::scripted_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_airtime_transaction_paths() {
        let (client, log) = scripted_client(|_, _, _| {
            Ok(json!({
                "id": "AT1",
                "project_id": "PJ1",
                "to_number": "+254711000001",
                "status": "successful",
                "value": 50.0,
                "value_currency": "KES"
            }))
        });
        let project = client.init_project_by_id("PJ1");

        let reference = project.init_airtime_transaction_by_id("AT1");
        assert_eq!(
            reference.api_path().unwrap(),
            "/projects/PJ1/airtime_transactions/AT1"
        );
        assert_eq!(log.len(), 0);

        let cursor = project
            .query_airtime_transactions(&QueryOptions::new())
            .unwrap();
        assert_eq!(cursor.path(), "/projects/PJ1/airtime_transactions");

        let mut transaction = project.get_airtime_transaction_by_id("AT1").await.unwrap();
        assert_eq!(log.last().path, "/projects/PJ1/airtime_transactions/AT1");
        assert_eq!(transaction.value().await.unwrap(), Some(50.0));
        assert_eq!(
            transaction.status().await.unwrap().as_deref(),
            Some("successful")
        );
        assert_eq!(log.len(), 1);
    }
}
